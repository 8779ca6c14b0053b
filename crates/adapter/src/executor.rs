// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use indexmap::IndexMap;
use reifydb_plan::{Document, PushdownExecutor, PushdownRequest, expr::CompareOp};
use reifydb_type::{Error, Result};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{
	ExternalRelation,
	evaluate::{Accumulator, AccumulatorKind, lookup, satisfies},
};

/// Evaluates pushdown requests against external relations by scanning them
/// and running the pipeline locally.
#[derive(Debug, Default)]
pub struct LocalExecutor {
	relations: IndexMap<String, Arc<ExternalRelation>>,
}

impl LocalExecutor {
	pub fn new(relations: impl IntoIterator<Item = Arc<ExternalRelation>>) -> Self {
		Self {
			relations: relations.into_iter().map(|relation| (relation.def().name.clone(), relation)).collect(),
		}
	}
}

impl PushdownExecutor for LocalExecutor {
	#[instrument(name = "adapter::execute", level = "debug", skip_all, fields(relation = %request.relation))]
	fn execute(&self, request: &PushdownRequest) -> Result<Vec<Document>> {
		let relation = self
			.relations
			.get(&request.relation)
			.ok_or_else(|| Error::unsupported(&request.relation, "relation is not known to this executor"))?;

		let stages = request
			.pipeline
			.iter()
			.map(|stage| Stage::compile(&request.relation, stage))
			.collect::<Result<Vec<_>>>()?;

		let mut rows: Box<dyn Iterator<Item = Document>> = Box::new(relation.scan(request.projection.as_slice())?);
		for stage in stages {
			rows = stage.run(rows);
		}

		let rows: Vec<Document> = rows.collect();
		debug!(rows = rows.len(), "evaluated pipeline");
		Ok(rows)
	}
}

enum Stage {
	Match(Predicate),
	Project(Vec<(String, Operand)>),
	Group {
		id: GroupId,
		accumulators: Vec<(String, AccumulatorKind, Operand)>,
	},
}

impl Stage {
	fn compile(relation: &str, stage: &Value) -> Result<Stage> {
		let unsupported = |reason: String| Error::unsupported(relation, reason);
		let Some((name, body)) = stage.as_object().filter(|stage| stage.len() == 1).and_then(|stage| stage.iter().next())
		else {
			return Err(unsupported(format!("stage {} must have exactly one operator", stage)));
		};

		match name.as_str() {
			"$match" => Ok(Stage::Match(Predicate::compile(body).map_err(unsupported)?)),
			"$project" => {
				let fields = body.as_object().ok_or_else(|| unsupported("$project expects a document".to_string()))?;
				let mut projections = Vec::with_capacity(fields.len());
				for (name, operand) in fields {
					// 1, 0, true and false are inclusion flags, not constants
					if operand.is_number() || operand.is_boolean() {
						return Err(unsupported(format!("inclusion flag for {} in $project", name)));
					}
					projections.push((name.clone(), Operand::compile(operand)));
				}
				Ok(Stage::Project(projections))
			}
			"$group" => {
				let fields = body.as_object().ok_or_else(|| unsupported("$group expects a document".to_string()))?;
				let mut id = GroupId::Null;
				let mut accumulators = Vec::new();
				for (name, value) in fields {
					if name == "_id" {
						id = GroupId::compile(value);
						continue;
					}
					let Some((operator, operand)) =
						value.as_object().filter(|value| value.len() == 1).and_then(|value| value.iter().next())
					else {
						return Err(unsupported(format!("accumulator {} must have exactly one operator", name)));
					};
					let kind = AccumulatorKind::from_operator(operator)
						.ok_or_else(|| unsupported(format!("unknown accumulator {}", operator)))?;
					accumulators.push((name.clone(), kind, Operand::compile(operand)));
				}
				Ok(Stage::Group {
					id,
					accumulators,
				})
			}
			other => Err(unsupported(format!("unknown stage {}", other))),
		}
	}

	fn run<'a>(self, rows: Box<dyn Iterator<Item = Document> + 'a>) -> Box<dyn Iterator<Item = Document> + 'a> {
		match self {
			Stage::Match(predicate) => Box::new(rows.filter(move |row| predicate.test(row))),
			Stage::Project(fields) => Box::new(rows.map(move |row| {
				fields.iter().map(|(name, operand)| (name.clone(), operand.evaluate(&row))).collect()
			})),
			Stage::Group {
				id,
				accumulators,
			} => {
				let mut groups: IndexMap<String, (Value, Vec<Accumulator>)> = IndexMap::new();
				for row in rows {
					let key = id.evaluate(&row);
					let (_, state) = groups.entry(key.to_string()).or_insert_with(|| {
						(key, accumulators.iter().map(|(_, kind, _)| Accumulator::new(*kind)).collect())
					});
					for (accumulator, (_, _, operand)) in state.iter_mut().zip(&accumulators) {
						accumulator.update(&operand.evaluate(&row));
					}
				}

				if groups.is_empty() && matches!(id, GroupId::Null) {
					groups.insert(
						Value::Null.to_string(),
						(Value::Null, accumulators.iter().map(|(_, kind, _)| Accumulator::new(*kind)).collect()),
					);
				}

				let out: Vec<Document> = groups
					.into_values()
					.map(|(key, state)| {
						let mut document = Map::new();
						document.insert("_id".to_string(), key);
						for ((name, _, _), accumulator) in accumulators.iter().zip(&state) {
							document.insert(name.clone(), accumulator.finish());
						}
						document
					})
					.collect();
				Box::new(out.into_iter())
			}
		}
	}
}

enum Operand {
	Path(String),
	Literal(Value),
}

impl Operand {
	fn compile(value: &Value) -> Operand {
		match value.as_str().and_then(|text| text.strip_prefix('$')) {
			Some(path) => Operand::Path(path.to_string()),
			None => Operand::Literal(value.clone()),
		}
	}

	fn evaluate(&self, row: &Document) -> Value {
		match self {
			Operand::Path(path) => lookup(row, path),
			Operand::Literal(value) => value.clone(),
		}
	}
}

enum GroupId {
	Null,
	Single(Operand),
	Compound(Vec<(String, Operand)>),
}

impl GroupId {
	fn compile(value: &Value) -> GroupId {
		match value {
			Value::Null => GroupId::Null,
			Value::Object(fields) => GroupId::Compound(
				fields.iter().map(|(name, operand)| (name.clone(), Operand::compile(operand))).collect(),
			),
			other => GroupId::Single(Operand::compile(other)),
		}
	}

	fn evaluate(&self, row: &Document) -> Value {
		match self {
			GroupId::Null => Value::Null,
			GroupId::Single(operand) => operand.evaluate(row),
			GroupId::Compound(fields) => {
				Value::Object(fields.iter().map(|(name, operand)| (name.clone(), operand.evaluate(row))).collect())
			}
		}
	}
}

enum Predicate {
	And(Vec<Predicate>),
	Or(Vec<Predicate>),
	Nor(Vec<Predicate>),
	Compare {
		path: String,
		op: CompareOp,
		value: Value,
	},
}

impl Predicate {
	fn compile(query: &Value) -> std::result::Result<Predicate, String> {
		let fields = query.as_object().ok_or_else(|| format!("query {} is not a document", query))?;

		let mut terms = Vec::with_capacity(fields.len());
		for (key, value) in fields {
			match key.as_str() {
				"$and" => terms.push(Predicate::And(Self::compile_all(key, value)?)),
				"$or" => terms.push(Predicate::Or(Self::compile_all(key, value)?)),
				"$nor" => terms.push(Predicate::Nor(Self::compile_all(key, value)?)),
				operator if operator.starts_with('$') => return Err(format!("unknown query operator {}", operator)),
				path => terms.extend(Self::compile_field(path, value)?),
			}
		}

		Ok(match terms.len() {
			1 => terms.remove(0),
			_ => Predicate::And(terms),
		})
	}

	fn compile_all(operator: &str, value: &Value) -> std::result::Result<Vec<Predicate>, String> {
		value.as_array()
			.ok_or_else(|| format!("{} expects an array", operator))?
			.iter()
			.map(Self::compile)
			.collect()
	}

	fn compile_field(path: &str, value: &Value) -> std::result::Result<Vec<Predicate>, String> {
		let operators = match value {
			Value::Object(operators) if operators.keys().all(|key| key.starts_with('$')) && !operators.is_empty() => {
				operators
			}
			value => {
				return Ok(vec![Predicate::Compare {
					path: path.to_string(),
					op: CompareOp::Eq,
					value: value.clone(),
				}]);
			}
		};

		operators
			.iter()
			.map(|(operator, value)| {
				let op = CompareOp::from_operator(operator)
					.ok_or_else(|| format!("unknown comparison operator {}", operator))?;
				Ok::<_, String>(Predicate::Compare {
					path: path.to_string(),
					op,
					value: value.clone(),
				})
			})
			.collect()
	}

	fn test(&self, row: &Document) -> bool {
		match self {
			Predicate::And(terms) => terms.iter().all(|term| term.test(row)),
			Predicate::Or(terms) => terms.iter().any(|term| term.test(row)),
			Predicate::Nor(terms) => !terms.iter().any(|term| term.test(row)),
			Predicate::Compare {
				path,
				op,
				value,
			} => satisfies(*op, &lookup(row, path), value),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn rows() -> Vec<Document> {
		[
			json!({"EMPNO": 100, "NAME": "Fred", "DEPTNO": 10, "AGE": 30}),
			json!({"EMPNO": 110, "NAME": "Eric", "DEPTNO": 20, "AGE": 80}),
			json!({"EMPNO": 120, "NAME": "Wilma", "DEPTNO": 20, "AGE": 5}),
			json!({"EMPNO": 130, "NAME": "Alice", "DEPTNO": 40, "AGE": null}),
		]
		.into_iter()
		.filter_map(|row| row.as_object().cloned())
		.collect()
	}

	fn run(pipeline: Value) -> Result<Vec<Value>> {
		let Value::Array(stages) = pipeline else {
			unreachable!()
		};
		let mut out: Box<dyn Iterator<Item = Document>> = Box::new(rows().into_iter());
		for stage in stages {
			out = Stage::compile("EMPS", &stage)?.run(out);
		}
		Ok(out.map(Value::Object).collect())
	}

	#[test]
	fn test_match() {
		let out = run(json!([{"$match": {"DEPTNO": 20, "AGE": {"$gt": 10}}}])).unwrap();
		assert_eq!(out.len(), 1);
		assert_eq!(out[0]["NAME"], "Eric");

		let out = run(json!([{"$match": {"$or": [{"NAME": "Fred"}, {"$nor": [{"DEPTNO": {"$lte": 20}}]}]}}])).unwrap();
		let names: Vec<&Value> = out.iter().map(|row| &row["NAME"]).collect();
		assert_eq!(names, vec!["Fred", "Alice"]);
	}

	#[test]
	fn test_project() {
		let out = run(json!([{"$project": {"N": "$NAME", "UNIT": "years"}}])).unwrap();
		assert_eq!(out[0], json!({"N": "Fred", "UNIT": "years"}));
	}

	#[test]
	fn test_project_inclusion_flags_are_rejected() {
		for flag in [json!(1), json!(0), json!(true), json!(false)] {
			let err = run(json!([{"$project": {"NAME": flag}}])).unwrap_err();
			assert!(matches!(err, Error::Unsupported { .. }));
			assert_eq!(err.to_string(), "cannot evaluate EMPS: inclusion flag for NAME in $project");
		}
	}

	#[test]
	fn test_group() {
		let out = run(json!([
			{"$group": {"_id": "$DEPTNO", "C": {"$sum": 1}, "A": {"$avg": "$AGE"}}},
			{"$project": {"DEPTNO": "$_id", "C": "$C", "A": "$A"}}
		]))
		.unwrap();
		assert_eq!(
			out,
			vec![
				json!({"DEPTNO": 10, "C": 1, "A": 30.0}),
				json!({"DEPTNO": 20, "C": 2, "A": 42.5}),
				json!({"DEPTNO": 40, "C": 1, "A": null}),
			]
		);
	}

	#[test]
	fn test_group_without_rows_yields_one_row() {
		let out = run(json!([
			{"$match": {"DEPTNO": 99}},
			{"$group": {"_id": null, "C": {"$sum": 1}, "M": {"$max": "$AGE"}}}
		]))
		.unwrap();
		assert_eq!(out, vec![json!({"_id": null, "C": 0, "M": null})]);
	}

	#[test]
	fn test_unknown_stage() {
		let err = run(json!([{"$sort": {"NAME": 1}}])).unwrap_err();
		assert!(matches!(err, Error::Unsupported { .. }));
		assert_eq!(err.to_string(), "cannot evaluate EMPS: unknown stage $sort");
	}

	#[test]
	fn test_unknown_operator() {
		let err = run(json!([{"$match": {"NAME": {"$regex": "^F"}}}])).unwrap_err();
		assert_eq!(err.to_string(), "cannot evaluate EMPS: unknown comparison operator $regex");
	}
}
