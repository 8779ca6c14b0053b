// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Value semantics shared by the pushdown executor and local evaluation.

use std::cmp::Ordering;

use reifydb_plan::{Document, expr::CompareOp};
use serde_json::{Number, Value};

/// Orders two values. Numbers, and text that reads as a number, compare
/// numerically; null only equals null. Unrelated values do not compare.
pub(crate) fn compare(left: &Value, right: &Value) -> Option<Ordering> {
	match (left, right) {
		(Value::Null, Value::Null) => Some(Ordering::Equal),
		(Value::Null, _) | (_, Value::Null) => None,
		(Value::Bool(left), Value::Bool(right)) => Some(left.cmp(right)),
		(Value::String(left), Value::String(right)) => match (number(left), number(right)) {
			(Some(left), Some(right)) => left.partial_cmp(&right),
			_ => Some(left.cmp(right)),
		},
		_ => match (as_f64(left), as_f64(right)) {
			(Some(left), Some(right)) => left.partial_cmp(&right),
			_ => None,
		},
	}
}

pub(crate) fn satisfies(op: CompareOp, left: &Value, right: &Value) -> bool {
	match (op, compare(left, right)) {
		(CompareOp::Ne, None) => !left.is_null() && !right.is_null(),
		(_, None) => false,
		(CompareOp::Eq, Some(ordering)) => ordering == Ordering::Equal,
		(CompareOp::Ne, Some(ordering)) => ordering != Ordering::Equal,
		(CompareOp::Lt, Some(ordering)) => ordering == Ordering::Less,
		(CompareOp::Le, Some(ordering)) => ordering != Ordering::Greater,
		(CompareOp::Gt, Some(ordering)) => ordering == Ordering::Greater,
		(CompareOp::Ge, Some(ordering)) => ordering != Ordering::Less,
	}
}

pub(crate) fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(value) => *value,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Looks up a dotted path such as `_id.DEPTNO`. Missing fields are null.
pub(crate) fn lookup(document: &Document, path: &str) -> Value {
	let mut parts = path.split('.');
	let Some(first) = parts.next() else {
		return Value::Null;
	};
	let mut current = match document.get(first) {
		Some(value) => value,
		None => return Value::Null,
	};
	for part in parts {
		current = match current.get(part) {
			Some(value) => value,
			None => return Value::Null,
		};
	}
	current.clone()
}

pub(crate) fn as_f64(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => number(text),
		_ => None,
	}
}

fn number(text: &str) -> Option<f64> {
	let cleaned: String = text.trim().chars().filter(|c| !matches!(c, ',' | '_')).collect();
	if !cleaned.chars().any(|c| c.is_ascii_digit()) {
		return None;
	}
	cleaned.parse().ok()
}

/// Integral results stay integers.
pub(crate) fn from_f64(value: f64) -> Value {
	if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
		Value::from(value as i64)
	} else {
		Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AccumulatorKind {
	Sum,
	Count,
	Min,
	Max,
	Avg,
}

impl AccumulatorKind {
	pub(crate) fn from_operator(operator: &str) -> Option<Self> {
		match operator {
			"$sum" => Some(AccumulatorKind::Sum),
			"$min" => Some(AccumulatorKind::Min),
			"$max" => Some(AccumulatorKind::Max),
			"$avg" => Some(AccumulatorKind::Avg),
			_ => None,
		}
	}
}

/// Running state of one aggregate within one group. Nulls and values that
/// are not numbers are skipped by the numeric kinds.
#[derive(Debug, Clone)]
pub(crate) struct Accumulator {
	kind: AccumulatorKind,
	sum: f64,
	count: usize,
	extreme: Option<Value>,
}

impl Accumulator {
	pub(crate) fn new(kind: AccumulatorKind) -> Self {
		Self {
			kind,
			sum: 0.0,
			count: 0,
			extreme: None,
		}
	}

	pub(crate) fn update(&mut self, value: &Value) {
		if value.is_null() {
			return;
		}
		match self.kind {
			AccumulatorKind::Count => self.count += 1,
			AccumulatorKind::Sum | AccumulatorKind::Avg => {
				if let Some(number) = as_f64(value) {
					self.sum += number;
					self.count += 1;
				}
			}
			AccumulatorKind::Min | AccumulatorKind::Max => {
				let wanted = if self.kind == AccumulatorKind::Min {
					Ordering::Less
				} else {
					Ordering::Greater
				};
				let replace = match &self.extreme {
					None => true,
					Some(current) => compare(value, current) == Some(wanted),
				};
				if replace {
					self.extreme = Some(value.clone());
				}
			}
		}
	}

	pub(crate) fn finish(&self) -> Value {
		match self.kind {
			AccumulatorKind::Count => Value::from(self.count),
			AccumulatorKind::Sum => from_f64(self.sum),
			AccumulatorKind::Avg if self.count == 0 => Value::Null,
			AccumulatorKind::Avg => {
				Number::from_f64(self.sum / self.count as f64).map(Value::Number).unwrap_or(Value::Null)
			}
			AccumulatorKind::Min | AccumulatorKind::Max => self.extreme.clone().unwrap_or(Value::Null),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_numeric_text_compares_numerically() {
		assert_eq!(compare(&json!("9"), &json!("10")), Some(Ordering::Less));
		assert_eq!(compare(&json!("1,000"), &json!(999)), Some(Ordering::Greater));
		assert_eq!(compare(&json!("Sales"), &json!("Marketing")), Some(Ordering::Greater));
		assert_eq!(compare(&json!("Sales"), &json!(10)), None);
	}

	#[test]
	fn test_null_semantics() {
		assert!(satisfies(CompareOp::Eq, &Value::Null, &Value::Null));
		assert!(!satisfies(CompareOp::Gt, &Value::Null, &json!(1)));
		assert!(!satisfies(CompareOp::Ne, &Value::Null, &json!(1)));
		assert!(satisfies(CompareOp::Ne, &json!("x"), &json!(1)));
	}

	#[test]
	fn test_lookup() {
		let document = json!({"_id": {"DEPTNO": 10}, "C": 2});
		let Value::Object(document) = document else {
			unreachable!()
		};
		assert_eq!(lookup(&document, "_id.DEPTNO"), json!(10));
		assert_eq!(lookup(&document, "C"), json!(2));
		assert_eq!(lookup(&document, "missing.path"), Value::Null);
	}

	#[test]
	fn test_accumulators() {
		let values = [json!(3), json!("4"), Value::Null, json!("x")];
		let finish = |kind| {
			let mut accumulator = Accumulator::new(kind);
			values.iter().for_each(|value| accumulator.update(value));
			accumulator.finish()
		};
		assert_eq!(finish(AccumulatorKind::Sum), json!(7));
		assert_eq!(finish(AccumulatorKind::Count), json!(3));
		assert_eq!(finish(AccumulatorKind::Avg), json!(3.5));
		assert_eq!(finish(AccumulatorKind::Max), json!("x"));
		assert_eq!(finish(AccumulatorKind::Min), json!(3));
	}

	#[test]
	fn test_empty_average_is_null() {
		assert_eq!(Accumulator::new(AccumulatorKind::Avg).finish(), Value::Null);
	}
}
