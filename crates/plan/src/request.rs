// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use reifydb_type::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{PlanNode, Scannable};

/// One result row of a pushed down query, keyed by output column.
pub type Document = Map<String, Value>;

/// Query an external subtree asks its source to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushdownRequest {
	pub relation: String,
	/// Fields the scan reads, in native order.
	pub projection: Vec<String>,
	/// Stages applied in order to the scanned rows.
	pub pipeline: Vec<Value>,
}

impl PushdownRequest {
	/// Collects the stages of an external subtree, optionally below its
	/// `ToEnumerable` converter. Returns `None` when the subtree contains a
	/// node the source cannot evaluate.
	pub fn implement(node: &PlanNode) -> Option<Self> {
		let mut current = match node {
			PlanNode::ToEnumerable(converter) => converter.input.as_ref(),
			node => node,
		};

		let mut stages: Vec<&[Value]> = Vec::new();
		let scan = loop {
			match current {
				PlanNode::Scan(scan) => break scan,
				PlanNode::ExternalFilter(external) => {
					stages.push(&external.stages);
					current = &external.node.input;
				}
				PlanNode::ExternalProject(external) => {
					stages.push(&external.stages);
					current = &external.node.input;
				}
				PlanNode::ExternalAggregate(external) => {
					stages.push(&external.stages);
					current = &external.node.input;
				}
				_ => return None,
			}
		};

		Some(Self {
			relation: scan.table().name().to_string(),
			projection: scan.derive_row_type().names().into_iter().map(str::to_string).collect(),
			pipeline: stages.into_iter().rev().flatten().cloned().collect(),
		})
	}

	pub fn to_json(&self) -> Value {
		let mut document = Map::new();
		document.insert("relation".to_string(), Value::String(self.relation.clone()));
		document.insert(
			"projection".to_string(),
			Value::Array(self.projection.iter().cloned().map(Value::String).collect()),
		);
		document.insert("pipeline".to_string(), Value::Array(self.pipeline.clone()));
		Value::Object(document)
	}
}

/// Evaluates pushdown requests at, or on behalf of, the external source.
pub trait PushdownExecutor {
	fn execute(&self, request: &PushdownRequest) -> Result<Vec<Document>>;
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use serde_json::json;

	use super::*;
	use crate::{PlanContext, RowShape, ScanNode, Table, expr::Expr};

	#[derive(Debug)]
	struct Emps(RowShape);

	impl Table for Emps {
		fn name(&self) -> &str {
			"EMPS"
		}

		fn shape(&self) -> &RowShape {
			&self.0
		}
	}

	fn scan(projection: Option<&[&str]>) -> PlanNode {
		let table: Arc<dyn Table> = Arc::new(Emps(RowShape::text(&["EMPNO", "NAME", "DEPTNO"])));
		let projection = projection.map(|names| table.shape().project(names).unwrap());
		PlanNode::Scan(ScanNode::create(PlanContext::external(), table, projection))
	}

	#[test]
	fn test_bare_scan() {
		let request = PushdownRequest::implement(&scan(Some(&["NAME"]))).unwrap();
		assert_eq!(
			request.to_json(),
			json!({"relation": "EMPS", "projection": ["NAME"], "pipeline": []})
		);
	}

	#[test]
	fn test_generic_node_cannot_be_implemented() {
		let plan = PlanNode::filter(scan(None), Expr::eq(Expr::field("NAME"), Expr::text("Fred")));
		assert!(PushdownRequest::implement(&plan).is_none());
	}

	#[test]
	fn test_serde() {
		let request = PushdownRequest::implement(&scan(None)).unwrap();
		let text = serde_json::to_string(&request).unwrap();
		assert_eq!(serde_json::from_str::<PushdownRequest>(&text).unwrap(), request);
	}
}
