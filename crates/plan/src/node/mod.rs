// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod scan;

use std::fmt::Write;

pub use scan::ScanNode;
use serde_json::Value;

use crate::{
	Convention, Field, FieldKind, RowShape, Scannable,
	expr::{AggregateCall, AggregateFunction, Expr, Projection},
};

#[derive(Debug, Clone)]
pub enum PlanNode {
	Scan(ScanNode),
	// Generic
	Filter(FilterNode),
	Project(ProjectNode),
	Aggregate(AggregateNode),
	// Pushed down to the external source
	ExternalFilter(ExternalNode<FilterNode>),
	ExternalProject(ExternalNode<ProjectNode>),
	ExternalAggregate(ExternalNode<AggregateNode>),
	// Converter to local iteration
	ToEnumerable(ToEnumerableNode),
}

#[derive(Debug, Clone)]
pub struct FilterNode {
	pub input: Box<PlanNode>,
	pub condition: Expr,
}

#[derive(Debug, Clone)]
pub struct ProjectNode {
	pub input: Box<PlanNode>,
	pub projections: Vec<Projection>,
}

#[derive(Debug, Clone)]
pub struct AggregateNode {
	pub input: Box<PlanNode>,
	pub group_by: Vec<String>,
	pub aggregates: Vec<AggregateCall>,
}

/// A generic node together with the pipeline stages that evaluate it at
/// the source.
#[derive(Debug, Clone)]
pub struct ExternalNode<T> {
	pub node: T,
	pub stages: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct ToEnumerableNode {
	pub input: Box<PlanNode>,
}

impl PlanNode {
	pub fn filter(input: PlanNode, condition: Expr) -> Self {
		PlanNode::Filter(FilterNode {
			input: Box::new(input),
			condition,
		})
	}

	pub fn project(input: PlanNode, projections: Vec<Projection>) -> Self {
		PlanNode::Project(ProjectNode {
			input: Box::new(input),
			projections,
		})
	}

	pub fn aggregate(input: PlanNode, group_by: &[&str], aggregates: Vec<AggregateCall>) -> Self {
		PlanNode::Aggregate(AggregateNode {
			input: Box::new(input),
			group_by: group_by.iter().map(|name| name.to_string()).collect(),
			aggregates,
		})
	}

	pub fn convention(&self) -> Convention {
		match self {
			PlanNode::Scan(scan) => scan.context().traits().convention(),
			PlanNode::Filter(_) | PlanNode::Project(_) | PlanNode::Aggregate(_) => Convention::NONE,
			PlanNode::ExternalFilter(_) | PlanNode::ExternalProject(_) | PlanNode::ExternalAggregate(_) => {
				Convention::EXTERNAL
			}
			PlanNode::ToEnumerable(_) => Convention::ENUMERABLE,
		}
	}

	pub fn inputs(&self) -> Vec<&PlanNode> {
		match self {
			PlanNode::Scan(_) => vec![],
			PlanNode::Filter(node) => vec![node.input.as_ref()],
			PlanNode::Project(node) => vec![node.input.as_ref()],
			PlanNode::Aggregate(node) => vec![node.input.as_ref()],
			PlanNode::ExternalFilter(external) => vec![external.node.input.as_ref()],
			PlanNode::ExternalProject(external) => vec![external.node.input.as_ref()],
			PlanNode::ExternalAggregate(external) => vec![external.node.input.as_ref()],
			PlanNode::ToEnumerable(node) => vec![node.input.as_ref()],
		}
	}

	/// Replaces every input with `f(input)`.
	pub fn map_inputs(self, mut f: impl FnMut(PlanNode) -> PlanNode) -> PlanNode {
		let mut map = |input: Box<PlanNode>| Box::new(f(*input));
		match self {
			PlanNode::Scan(scan) => PlanNode::Scan(scan),
			PlanNode::Filter(mut node) => {
				node.input = map(node.input);
				PlanNode::Filter(node)
			}
			PlanNode::Project(mut node) => {
				node.input = map(node.input);
				PlanNode::Project(node)
			}
			PlanNode::Aggregate(mut node) => {
				node.input = map(node.input);
				PlanNode::Aggregate(node)
			}
			PlanNode::ExternalFilter(mut external) => {
				external.node.input = map(external.node.input);
				PlanNode::ExternalFilter(external)
			}
			PlanNode::ExternalProject(mut external) => {
				external.node.input = map(external.node.input);
				PlanNode::ExternalProject(external)
			}
			PlanNode::ExternalAggregate(mut external) => {
				external.node.input = map(external.node.input);
				PlanNode::ExternalAggregate(external)
			}
			PlanNode::ToEnumerable(mut node) => {
				node.input = map(node.input);
				PlanNode::ToEnumerable(node)
			}
		}
	}

	pub fn row_type(&self) -> RowShape {
		match self {
			PlanNode::Scan(scan) => scan.derive_row_type(),
			PlanNode::Filter(node) => node.input.row_type(),
			PlanNode::ExternalFilter(external) => external.node.input.row_type(),
			PlanNode::Project(node) => project_shape(node),
			PlanNode::ExternalProject(external) => project_shape(&external.node),
			PlanNode::Aggregate(node) => aggregate_shape(node),
			PlanNode::ExternalAggregate(external) => aggregate_shape(&external.node),
			PlanNode::ToEnumerable(node) => node.input.row_type(),
		}
	}

	/// One line per node, inputs indented below their parent.
	pub fn explain(&self) -> String {
		let mut out = String::new();
		self.explain_into(&mut out, 0);
		out
	}

	fn explain_into(&self, out: &mut String, depth: usize) {
		let _ = writeln!(out, "{}{}", "  ".repeat(depth), self.label());
		for input in self.inputs() {
			input.explain_into(out, depth + 1);
		}
	}

	fn label(&self) -> String {
		match self {
			PlanNode::Scan(scan) => format!("Scan {} {:?}", scan.table().name(), scan.derive_row_type().names()),
			PlanNode::Filter(node) => format!("Filter {}", node.condition),
			PlanNode::Project(node) => format!("Project {:?}", projection_names(&node.projections)),
			PlanNode::Aggregate(node) => format!("Aggregate {:?}", node.group_by),
			PlanNode::ExternalFilter(external) => format!("ExternalFilter {}", external.node.condition),
			PlanNode::ExternalProject(external) => {
				format!("ExternalProject {:?}", projection_names(&external.node.projections))
			}
			PlanNode::ExternalAggregate(external) => format!("ExternalAggregate {:?}", external.node.group_by),
			PlanNode::ToEnumerable(_) => "ToEnumerable".to_string(),
		}
	}
}

fn projection_names(projections: &[Projection]) -> Vec<String> {
	projections.iter().map(Projection::name).collect()
}

fn project_shape(node: &ProjectNode) -> RowShape {
	let input = node.input.row_type();
	RowShape::new(
		node.projections
			.iter()
			.map(|projection| {
				let kind = match &projection.expr {
					Expr::Field(name) => input.field(name).map(|field| field.kind).unwrap_or(FieldKind::Text),
					Expr::Literal(_) => FieldKind::Text,
					_ => FieldKind::Boolean,
				};
				Field::new(projection.name(), kind)
			})
			.collect(),
	)
}

fn aggregate_shape(node: &AggregateNode) -> RowShape {
	let input = node.input.row_type();
	let kind_of = |name: &str| input.field(name).map(|field| field.kind).unwrap_or(FieldKind::Text);

	let groups = node.group_by.iter().map(|name| Field::new(name.clone(), kind_of(name)));
	let aggregates = node.aggregates.iter().map(|call| {
		let kind = match call.function {
			AggregateFunction::Count => FieldKind::Integer,
			AggregateFunction::Avg => FieldKind::Float,
			_ => call.field.as_deref().map(kind_of).unwrap_or(FieldKind::Text),
		};
		Field::new(call.alias.clone(), kind)
	});
	RowShape::new(groups.chain(aggregates).collect())
}
