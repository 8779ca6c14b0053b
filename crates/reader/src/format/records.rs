// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexSet;
use reifydb_type::{Error, ParseCause, Result};
use serde_json::Value;

use crate::{RawCell, RawRow, RawTable, Section};

/// Reads a JSON array of records. Objects contribute a header made of the
/// union of their keys in first-seen order; arrays are positional.
pub(crate) fn parse(bytes: &[u8], locator: &str) -> Result<RawTable> {
	let parse_error = |source: ParseCause| Error::Parse {
		locator: locator.to_string(),
		source,
	};

	let value: Value = serde_json::from_slice(bytes).map_err(|e| parse_error(ParseCause::Format(Box::new(e))))?;
	let records = match value {
		Value::Array(items) => items,
		object @ Value::Object(_) => vec![object],
		other => {
			return Err(parse_error(ParseCause::Shape(format!(
				"expected an array of records, found {}",
				kind(&other)
			))));
		}
	};

	if !records.is_empty() && records.iter().all(Value::is_object) {
		return Ok(objects(&records));
	}

	let rows = records
		.iter()
		.map(|record| match record {
			Value::Array(items) => RawRow::new(Section::Body, items.iter().map(cell).collect()),
			other => RawRow::new(Section::Body, vec![cell(other)]),
		})
		.collect();
	Ok(RawTable::new(rows))
}

fn objects(records: &[Value]) -> RawTable {
	let mut keys: IndexSet<&str> = IndexSet::new();
	for record in records {
		if let Value::Object(map) = record {
			keys.extend(map.keys().map(String::as_str));
		}
	}

	let mut rows = Vec::with_capacity(records.len() + 1);
	rows.push(RawRow::new(Section::Head, keys.iter().map(|key| RawCell::header(*key)).collect()));
	for record in records {
		let cells = keys
			.iter()
			.map(|key| match record.get(*key) {
				Some(value) => cell(value),
				None => RawCell::data(""),
			})
			.collect();
		rows.push(RawRow::new(Section::Body, cells));
	}
	RawTable::new(rows)
}

fn cell(value: &Value) -> RawCell {
	match value {
		Value::Null => RawCell::data(""),
		Value::String(text) => RawCell::data(text.as_str()),
		other => RawCell::data(other.to_string()),
	}
}

fn kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
