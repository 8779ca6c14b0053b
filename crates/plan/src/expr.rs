// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Scalar expressions of generic plan nodes.

use std::fmt::{Display, Formatter};

use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
}

impl Literal {
	pub fn to_json(&self) -> Value {
		match self {
			Literal::Null => Value::Null,
			Literal::Bool(value) => Value::Bool(*value),
			Literal::Int(value) => Value::from(*value),
			Literal::Float(value) => Number::from_f64(*value).map(Value::Number).unwrap_or(Value::Null),
			Literal::Text(value) => Value::String(value.clone()),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	Ne,
	Lt,
	Le,
	Gt,
	Ge,
}

impl CompareOp {
	/// Operator with swapped operands, so `1 < a` becomes `a > 1`.
	pub fn flip(self) -> Self {
		match self {
			CompareOp::Eq => CompareOp::Eq,
			CompareOp::Ne => CompareOp::Ne,
			CompareOp::Lt => CompareOp::Gt,
			CompareOp::Le => CompareOp::Ge,
			CompareOp::Gt => CompareOp::Lt,
			CompareOp::Ge => CompareOp::Le,
		}
	}

	/// Query operator name of the pipeline language.
	pub fn operator(self) -> &'static str {
		match self {
			CompareOp::Eq => "$eq",
			CompareOp::Ne => "$ne",
			CompareOp::Lt => "$lt",
			CompareOp::Le => "$lte",
			CompareOp::Gt => "$gt",
			CompareOp::Ge => "$gte",
		}
	}

	pub fn from_operator(operator: &str) -> Option<Self> {
		match operator {
			"$eq" => Some(CompareOp::Eq),
			"$ne" => Some(CompareOp::Ne),
			"$lt" => Some(CompareOp::Lt),
			"$lte" => Some(CompareOp::Le),
			"$gt" => Some(CompareOp::Gt),
			"$gte" => Some(CompareOp::Ge),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Field(String),
	Literal(Literal),
	Compare {
		op: CompareOp,
		left: Box<Expr>,
		right: Box<Expr>,
	},
	And(Vec<Expr>),
	Or(Vec<Expr>),
	Not(Box<Expr>),
}

impl Expr {
	pub fn field(name: impl Into<String>) -> Self {
		Expr::Field(name.into())
	}

	pub fn text(value: impl Into<String>) -> Self {
		Expr::Literal(Literal::Text(value.into()))
	}

	pub fn int(value: i64) -> Self {
		Expr::Literal(Literal::Int(value))
	}

	pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Self {
		Expr::Compare {
			op,
			left: Box::new(left),
			right: Box::new(right),
		}
	}

	pub fn eq(left: Expr, right: Expr) -> Self {
		Self::compare(CompareOp::Eq, left, right)
	}

	pub fn gt(left: Expr, right: Expr) -> Self {
		Self::compare(CompareOp::Gt, left, right)
	}

	pub fn lt(left: Expr, right: Expr) -> Self {
		Self::compare(CompareOp::Lt, left, right)
	}

	pub fn not(expr: Expr) -> Self {
		Expr::Not(Box::new(expr))
	}
}

impl Display for Expr {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Expr::Field(name) => f.write_str(name),
			Expr::Literal(literal) => write!(f, "{}", literal.to_json()),
			Expr::Compare {
				op,
				left,
				right,
			} => write!(f, "{} {} {}", left, op.operator(), right),
			Expr::And(terms) => write_joined(f, terms, " and "),
			Expr::Or(terms) => write_joined(f, terms, " or "),
			Expr::Not(expr) => write!(f, "not ({})", expr),
		}
	}
}

fn write_joined(f: &mut Formatter<'_>, terms: &[Expr], separator: &str) -> std::fmt::Result {
	f.write_str("(")?;
	for (i, term) in terms.iter().enumerate() {
		if i > 0 {
			f.write_str(separator)?;
		}
		write!(f, "{}", term)?;
	}
	f.write_str(")")
}

/// One output column of a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
	pub expr: Expr,
	pub alias: Option<String>,
}

impl Projection {
	pub fn field(name: impl Into<String>) -> Self {
		Self {
			expr: Expr::field(name),
			alias: None,
		}
	}

	pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
		Self {
			expr,
			alias: Some(alias.into()),
		}
	}

	/// Output column name: the alias, the field name, or the rendered
	/// expression.
	pub fn name(&self) -> String {
		match (&self.alias, &self.expr) {
			(Some(alias), _) => alias.clone(),
			(None, Expr::Field(name)) => name.clone(),
			(None, expr) => expr.to_string(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
	Count,
	Sum,
	Min,
	Max,
	Avg,
}

impl AggregateFunction {
	pub fn accumulator(self) -> &'static str {
		match self {
			AggregateFunction::Count | AggregateFunction::Sum => "$sum",
			AggregateFunction::Min => "$min",
			AggregateFunction::Max => "$max",
			AggregateFunction::Avg => "$avg",
		}
	}
}

/// `function(field) as alias`; a `Count` without field counts rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
	pub function: AggregateFunction,
	pub field: Option<String>,
	pub alias: String,
}

impl AggregateCall {
	pub fn new(function: AggregateFunction, field: Option<&str>, alias: impl Into<String>) -> Self {
		Self {
			function,
			field: field.map(str::to_string),
			alias: alias.into(),
		}
	}

	pub fn count(alias: impl Into<String>) -> Self {
		Self::new(AggregateFunction::Count, None, alias)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display() {
		let expr = Expr::And(vec![
			Expr::gt(Expr::field("DEPTNO"), Expr::int(10)),
			Expr::not(Expr::eq(Expr::field("NAME"), Expr::text("Sales"))),
		]);
		assert_eq!(expr.to_string(), r#"(DEPTNO $gt 10 and not (NAME $eq "Sales"))"#);
	}

	#[test]
	fn test_flip_round_trips() {
		for op in [CompareOp::Eq, CompareOp::Ne, CompareOp::Lt, CompareOp::Le, CompareOp::Gt, CompareOp::Ge] {
			assert_eq!(op.flip().flip(), op);
			assert_eq!(CompareOp::from_operator(op.operator()), Some(op));
		}
	}

	#[test]
	fn test_projection_name() {
		assert_eq!(Projection::field("NAME").name(), "NAME");
		assert_eq!(Projection::aliased(Expr::field("NAME"), "N").name(), "N");
		assert_eq!(Projection::aliased(Expr::int(1), "one").name(), "one");
	}

	#[test]
	fn test_nan_literal_is_null() {
		assert_eq!(Literal::Float(f64::NAN).to_json(), Value::Null);
	}
}
