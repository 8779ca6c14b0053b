// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use reifydb_plan::{
	Document, PlanNode, PushdownExecutor, PushdownRequest,
	expr::{AggregateCall, AggregateFunction, Expr},
	node::{AggregateNode, FilterNode, ProjectNode},
};
use reifydb_type::{Error, Result};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::evaluate::{Accumulator, AccumulatorKind, satisfies, truthy};

/// Runs an optimized plan. Subtrees the source can evaluate are sent to
/// `executor` as one request; generic nodes above them run locally.
#[instrument(name = "adapter::run", level = "debug", skip_all)]
pub fn execute(plan: &PlanNode, executor: &dyn PushdownExecutor) -> Result<Vec<Document>> {
	if let Some(request) = PushdownRequest::implement(plan) {
		debug!(relation = %request.relation, stages = request.pipeline.len(), "pushing down");
		return executor.execute(&request);
	}

	match plan {
		PlanNode::ToEnumerable(node) => execute(&node.input, executor),
		PlanNode::Filter(node) => filter(node, executor),
		PlanNode::Project(node) => project(node, executor),
		PlanNode::Aggregate(node) => aggregate(node, executor),
		other => Err(Error::unsupported(
			other.row_type().names().join(", "),
			format!("no local evaluation for {}", other.explain().trim_end()),
		)),
	}
}

fn filter(node: &FilterNode, executor: &dyn PushdownExecutor) -> Result<Vec<Document>> {
	let rows = execute(&node.input, executor)?;
	Ok(rows.into_iter().filter(|row| truthy(&evaluate(&node.condition, row))).collect())
}

fn project(node: &ProjectNode, executor: &dyn PushdownExecutor) -> Result<Vec<Document>> {
	let rows = execute(&node.input, executor)?;
	Ok(rows
		.iter()
		.map(|row| {
			node.projections
				.iter()
				.map(|projection| (projection.name(), evaluate(&projection.expr, row)))
				.collect()
		})
		.collect())
}

fn aggregate(node: &AggregateNode, executor: &dyn PushdownExecutor) -> Result<Vec<Document>> {
	let rows = execute(&node.input, executor)?;
	let fresh = || node.aggregates.iter().map(|call| Accumulator::new(kind_of(call))).collect::<Vec<_>>();

	let mut groups: IndexMap<String, (Vec<Value>, Vec<Accumulator>)> = IndexMap::new();
	for row in &rows {
		let key: Vec<Value> =
			node.group_by.iter().map(|field| row.get(field).cloned().unwrap_or(Value::Null)).collect();
		let (_, state) = groups.entry(Value::Array(key.clone()).to_string()).or_insert_with(|| (key, fresh()));
		for (accumulator, call) in state.iter_mut().zip(&node.aggregates) {
			let value = match &call.field {
				Some(field) => row.get(field).cloned().unwrap_or(Value::Null),
				None => Value::Bool(true),
			};
			accumulator.update(&value);
		}
	}

	if groups.is_empty() && node.group_by.is_empty() {
		groups.insert(String::new(), (Vec::new(), fresh()));
	}

	Ok(groups
		.into_values()
		.map(|(key, state)| {
			let mut document = Map::new();
			for (field, value) in node.group_by.iter().zip(key) {
				document.insert(field.clone(), value);
			}
			for (call, accumulator) in node.aggregates.iter().zip(&state) {
				document.insert(call.alias.clone(), accumulator.finish());
			}
			document
		})
		.collect())
}

fn kind_of(call: &AggregateCall) -> AccumulatorKind {
	match call.function {
		AggregateFunction::Count => AccumulatorKind::Count,
		AggregateFunction::Sum => AccumulatorKind::Sum,
		AggregateFunction::Min => AccumulatorKind::Min,
		AggregateFunction::Max => AccumulatorKind::Max,
		AggregateFunction::Avg => AccumulatorKind::Avg,
	}
}

fn evaluate(expr: &Expr, row: &Document) -> Value {
	match expr {
		Expr::Field(name) => row.get(name).cloned().unwrap_or(Value::Null),
		Expr::Literal(literal) => literal.to_json(),
		Expr::Compare {
			op,
			left,
			right,
		} => Value::Bool(satisfies(*op, &evaluate(left, row), &evaluate(right, row))),
		Expr::And(terms) => Value::Bool(terms.iter().all(|term| truthy(&evaluate(term, row)))),
		Expr::Or(terms) => Value::Bool(terms.iter().any(|term| truthy(&evaluate(term, row)))),
		Expr::Not(inner) => Value::Bool(!truthy(&evaluate(inner, row))),
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, Mutex};

	use reifydb_plan::{
		PlanContext, RowShape, ScanNode, Table,
		expr::{CompareOp, Projection},
	};
	use serde_json::json;

	use super::*;

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

	/// Returns fixed rows and records every request it receives.
	#[derive(Default)]
	struct Recording {
		requests: Mutex<Vec<PushdownRequest>>,
	}

	impl PushdownExecutor for Recording {
		fn execute(&self, request: &PushdownRequest) -> Result<Vec<Document>> {
			self.requests.lock().unwrap().push(request.clone());
			Ok([
				json!({"NAME": "Fred", "DEPTNO": 10}),
				json!({"NAME": "Eric", "DEPTNO": 20}),
				json!({"NAME": "Wilma", "DEPTNO": 20}),
			]
			.into_iter()
			.filter_map(|row| row.as_object().cloned())
			.collect())
		}
	}

	fn scan() -> PlanNode {
		let table: Arc<dyn Table> = Arc::new(Emps(RowShape::text(&["NAME", "DEPTNO"])));
		PlanNode::Scan(ScanNode::create(PlanContext::external(), table, None))
	}

	#[test]
	fn test_scan_is_pushed_down() {
		let executor = Recording::default();
		let rows = execute(&scan(), &executor).unwrap();
		assert_eq!(rows.len(), 3);

		let requests = executor.requests.lock().unwrap();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].relation, "EMPS");
		assert!(requests[0].pipeline.is_empty());
	}

	#[test]
	fn test_generic_nodes_run_locally() {
		let plan = PlanNode::project(
			PlanNode::filter(
				scan(),
				Expr::compare(CompareOp::Ge, Expr::field("DEPTNO"), Expr::int(20)),
			),
			vec![Projection::aliased(Expr::field("NAME"), "WHO")],
		);
		let rows = execute(&plan, &Recording::default()).unwrap();
		assert_eq!(rows.into_iter().map(Value::Object).collect::<Vec<_>>(), vec![
			json!({"WHO": "Eric"}),
			json!({"WHO": "Wilma"})
		]);
	}

	#[test]
	fn test_local_aggregate() {
		let plan = PlanNode::aggregate(scan(), &["DEPTNO"], vec![AggregateCall::count("C")]);
		let rows = execute(&plan, &Recording::default()).unwrap();
		assert_eq!(rows.into_iter().map(Value::Object).collect::<Vec<_>>(), vec![
			json!({"DEPTNO": 10, "C": 1}),
			json!({"DEPTNO": 20, "C": 2})
		]);
	}

	#[test]
	fn test_empty_input_without_groups() {
		let plan = PlanNode::aggregate(
			PlanNode::filter(scan(), Expr::eq(Expr::field("NAME"), Expr::text("Nobody"))),
			&[],
			vec![AggregateCall::count("C"), AggregateCall::new(AggregateFunction::Max, Some("DEPTNO"), "M")],
		);
		let rows = execute(&plan, &Recording::default()).unwrap();
		assert_eq!(rows.into_iter().map(Value::Object).collect::<Vec<_>>(), vec![json!({"C": 0, "M": null})]);
	}
}
