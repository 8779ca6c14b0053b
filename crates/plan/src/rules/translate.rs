// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde_json::{Map, Value, json};

use crate::expr::{AggregateCall, AggregateFunction, CompareOp, Expr, Literal, Projection};

/// Translates a predicate into a `$match` document.
pub(crate) fn condition(expr: &Expr) -> Option<Value> {
	match expr {
		Expr::Compare {
			op,
			left,
			right,
		} => match (left.as_ref(), right.as_ref()) {
			(Expr::Field(field), Expr::Literal(literal)) => comparison(field, *op, literal),
			(Expr::Literal(literal), Expr::Field(field)) => comparison(field, op.flip(), literal),
			_ => None,
		},
		Expr::And(terms) => Some(json!({ "$and": conditions(terms)? })),
		Expr::Or(terms) => Some(json!({ "$or": conditions(terms)? })),
		Expr::Not(inner) => Some(json!({ "$nor": [condition(inner)?] })),
		Expr::Field(_) | Expr::Literal(_) => None,
	}
}

fn conditions(terms: &[Expr]) -> Option<Vec<Value>> {
	terms.iter().map(condition).collect()
}

/// Whether `name` can stand as a key or `$` path in a pipeline document.
/// Dots address nested fields and a leading `$` marks an operator, so such
/// names are left to local evaluation.
fn expressible(name: &str) -> bool {
	!name.is_empty() && !name.contains('.') && !name.starts_with('$')
}

fn field_path(name: &str) -> Option<Value> {
	expressible(name).then(|| Value::String(format!("${}", name)))
}

fn comparison(field: &str, op: CompareOp, literal: &Literal) -> Option<Value> {
	if !expressible(field) {
		return None;
	}
	let mut document = Map::new();
	let value = match op {
		CompareOp::Eq => literal.to_json(),
		op => json!({ op.operator(): literal.to_json() }),
	};
	document.insert(field.to_string(), value);
	Some(Value::Object(document))
}

/// Translates plain field projections into a `$project` document.
pub(crate) fn projection(projections: &[Projection]) -> Option<Value> {
	let mut document = Map::new();
	for projection in projections {
		let Expr::Field(field) = &projection.expr else {
			return None;
		};
		let name = projection.name();
		if !expressible(&name) {
			return None;
		}
		document.insert(name, field_path(field)?);
	}
	Some(Value::Object(document))
}

/// Translates a grouping into a `$group` stage followed by a `$project`
/// stage that lifts the group keys out of `_id`.
pub(crate) fn aggregation(group_by: &[String], aggregates: &[AggregateCall]) -> Option<Vec<Value>> {
	if aggregates.iter().any(|call| call.alias == "_id" || !expressible(&call.alias)) {
		return None;
	}
	let id = match group_by {
		[] => Value::Null,
		[field] => field_path(field)?,
		fields => Value::Object(
			fields.iter().map(|field| Some((field.clone(), field_path(field)?))).collect::<Option<_>>()?,
		),
	};

	let mut group = Map::new();
	group.insert("_id".to_string(), id);
	for call in aggregates {
		let operand = match (call.function, &call.field) {
			(AggregateFunction::Count, None) => json!(1),
			(AggregateFunction::Count, Some(_)) => return None,
			(_, Some(field)) => field_path(field)?,
			(_, None) => return None,
		};
		group.insert(call.alias.clone(), json!({ call.function.accumulator(): operand }));
	}

	let mut project = Map::new();
	match group_by {
		[] => {}
		[field] => {
			project.insert(field.clone(), json!("$_id"));
		}
		fields => {
			for field in fields {
				project.insert(field.clone(), Value::String(format!("$_id.{}", field)));
			}
		}
	}
	for call in aggregates {
		project.insert(call.alias.clone(), Value::String(format!("${}", call.alias)));
	}

	Some(vec![json!({ "$group": group }), json!({ "$project": project })])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_comparisons() {
		assert_eq!(condition(&Expr::eq(Expr::field("CITY"), Expr::text("Vancouver"))).unwrap(), json!({"CITY": "Vancouver"}));
		assert_eq!(condition(&Expr::gt(Expr::field("DEPTNO"), Expr::int(10))).unwrap(), json!({"DEPTNO": {"$gt": 10}}));
		assert_eq!(condition(&Expr::gt(Expr::int(10), Expr::field("DEPTNO"))).unwrap(), json!({"DEPTNO": {"$lt": 10}}));
		assert_eq!(
			condition(&Expr::compare(CompareOp::Le, Expr::field("AGE"), Expr::int(40))).unwrap(),
			json!({"AGE": {"$lte": 40}})
		);
	}

	#[test]
	fn test_boolean_connectives() {
		let expr = Expr::Or(vec![
			Expr::eq(Expr::field("GENDER"), Expr::text("F")),
			Expr::not(Expr::lt(Expr::field("DEPTNO"), Expr::int(20))),
		]);
		assert_eq!(
			condition(&expr).unwrap(),
			json!({"$or": [{"GENDER": "F"}, {"$nor": [{"DEPTNO": {"$lt": 20}}]}]})
		);
	}

	#[test]
	fn test_untranslatable_conditions() {
		assert!(condition(&Expr::eq(Expr::field("A"), Expr::field("B"))).is_none());
		assert!(condition(&Expr::field("A")).is_none());
		let nested = Expr::And(vec![Expr::eq(Expr::field("A"), Expr::int(1)), Expr::eq(Expr::int(1), Expr::int(1))]);
		assert!(condition(&nested).is_none());
	}

	#[test]
	fn test_projection() {
		let stage = projection(&[Projection::field("NAME"), Projection::aliased(Expr::field("DEPTNO"), "D")]).unwrap();
		assert_eq!(stage, json!({"NAME": "$NAME", "D": "$DEPTNO"}));
		assert!(projection(&[Projection::aliased(Expr::int(1), "one")]).is_none());
	}

	#[test]
	fn test_aggregation_single_key() {
		let stages = aggregation(
			&["DEPTNO".to_string()],
			&[AggregateCall::count("C"), AggregateCall::new(AggregateFunction::Avg, Some("AGE"), "A")],
		)
		.unwrap();
		assert_eq!(
			stages,
			vec![
				json!({"$group": {"_id": "$DEPTNO", "C": {"$sum": 1}, "A": {"$avg": "$AGE"}}}),
				json!({"$project": {"DEPTNO": "$_id", "C": "$C", "A": "$A"}}),
			]
		);
	}

	#[test]
	fn test_aggregation_without_keys() {
		let stages = aggregation(&[], &[AggregateCall::new(AggregateFunction::Max, Some("AGE"), "M")]).unwrap();
		assert_eq!(stages[0], json!({"$group": {"_id": null, "M": {"$max": "$AGE"}}}));
		assert_eq!(stages[1], json!({"$project": {"M": "$M"}}));
	}

	#[test]
	fn test_aggregation_compound_key() {
		let stages = aggregation(&["A".to_string(), "B".to_string()], &[AggregateCall::count("C")]).unwrap();
		assert_eq!(stages[0]["$group"]["_id"], json!({"A": "$A", "B": "$B"}));
		assert_eq!(stages[1], json!({"$project": {"A": "$_id.A", "B": "$_id.B", "C": "$C"}}));
	}

	#[test]
	fn test_dotted_and_operator_names_are_not_translated() {
		assert!(condition(&Expr::gt(Expr::field("No."), Expr::int(1))).is_none());
		assert!(condition(&Expr::eq(Expr::text("x"), Expr::field("$where"))).is_none());
		assert!(projection(&[Projection::field("No.")]).is_none());
		assert!(projection(&[Projection::aliased(Expr::field("CITY"), "a.b")]).is_none());
		assert!(aggregation(&["Pop. 2020".to_string()], &[AggregateCall::count("C")]).is_none());
		assert!(aggregation(&["A".to_string(), "$B".to_string()], &[AggregateCall::count("C")]).is_none());
		let call = AggregateCall::new(AggregateFunction::Sum, Some("Area (sq. mi)"), "S");
		assert!(aggregation(&[], &[call]).is_none());
	}

	#[test]
	fn test_group_alias_cannot_shadow_the_key() {
		assert!(aggregation(&["A".to_string()], &[AggregateCall::count("_id")]).is_none());
	}

	#[test]
	fn test_count_of_field_is_not_translated() {
		let call = AggregateCall::new(AggregateFunction::Count, Some("AGE"), "C");
		assert!(aggregation(&[], &[call]).is_none());
	}
}
