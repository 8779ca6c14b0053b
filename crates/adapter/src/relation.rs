// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use reifydb_plan::{Document, Field, FieldKind, RowShape, Table};
use reifydb_reader::{HeaderRow, IntoRows, ReaderConfig, TableLocator, TabularReader};
use reifydb_source::SourceLocator;
use reifydb_type::{Error, Result};
use serde_json::{Number, Value};
use tracing::{debug, instrument};

use crate::RelationDef;

/// A named table backed by one external source.
///
/// The source address is resolved and the source is read once when the
/// relation is created, to learn its fields. Every scan reads the source
/// again.
#[derive(Debug)]
pub struct ExternalRelation {
	def: RelationDef,
	locator: SourceLocator,
	table: Option<TableLocator>,
	config: ReaderConfig,
	shape: RowShape,
}

impl ExternalRelation {
	pub fn new(def: RelationDef, config: ReaderConfig) -> Result<Self> {
		def.validate()?;
		let locator = SourceLocator::resolve(&def.source)?;
		Self::open(def, locator, config)
	}

	/// Like [`Self::new`], with a relative source resolved against `base`.
	pub fn new_in(base: &SourceLocator, def: RelationDef, config: ReaderConfig) -> Result<Self> {
		def.validate()?;
		let locator = match def.source.trim() {
			"" => SourceLocator::resolve(&def.source)?,
			source => base.join(source)?,
		};
		Self::open(def, locator, config)
	}

	#[instrument(name = "adapter::relation", level = "debug", skip_all, fields(name = %def.name, locator = %locator))]
	fn open(def: RelationDef, locator: SourceLocator, config: ReaderConfig) -> Result<Self> {
		let table = def.table_locator();
		let config = match def.format {
			Some(format) => config.format(format.into()),
			None => config,
		};

		let reader = TabularReader::open(locator.clone(), table.clone(), config.clone())?;
		let shape = derive_shape(&def, reader.headings());
		debug!(fields = ?shape.names(), strategy = reader.header_strategy(), "derived relation shape");

		Ok(Self {
			def,
			locator,
			table,
			config,
			shape,
		})
	}

	pub fn def(&self) -> &RelationDef {
		&self.def
	}

	pub fn locator(&self) -> &SourceLocator {
		&self.locator
	}

	/// Reads the source again and yields rows restricted to `projection`,
	/// in native field order. Unknown names are an error.
	#[instrument(name = "adapter::scan", level = "debug", skip_all, fields(name = %self.def.name))]
	pub fn scan<S: AsRef<str>>(&self, projection: &[S]) -> Result<RelationRows> {
		let shape = if projection.is_empty() {
			self.shape.clone()
		} else {
			self.shape.project(projection).ok_or_else(|| {
				Error::unsupported(
					&self.def.name,
					format!(
						"projection {:?} names unknown fields",
						projection.iter().map(AsRef::as_ref).collect::<Vec<&str>>()
					),
				)
			})?
		};
		let positions = shape.fields().iter().filter_map(|field| self.shape.index_of(&field.name)).collect();

		let reader = TabularReader::open(self.locator.clone(), self.table.clone(), self.config.clone())?;
		Ok(RelationRows {
			rows: reader.into_iter(),
			width: self.shape.len(),
			fields: shape.fields().to_vec(),
			positions,
		})
	}
}

impl Table for ExternalRelation {
	fn name(&self) -> &str {
		&self.def.name
	}

	fn shape(&self) -> &RowShape {
		&self.shape
	}

	fn row_count(&self) -> Option<f64> {
		self.def.row_count
	}
}

/// Rows of one scan, typed by the relation's field kinds.
pub struct RelationRows {
	rows: IntoRows,
	width: usize,
	fields: Vec<Field>,
	positions: Vec<usize>,
}

impl Iterator for RelationRows {
	type Item = Document;

	fn next(&mut self) -> Option<Self::Item> {
		let row = self.rows.next()?.conform(self.width);
		Some(
			self.fields
				.iter()
				.zip(&self.positions)
				.map(|(field, &position)| (field.name.clone(), typed(&row[position], field.kind)))
				.collect(),
		)
	}
}

/// Declared fields name the leading columns in order and the source's
/// headings are ignored; columns past the last declared field are not
/// exposed. Without declared fields a heading may carry its kind as a
/// `name:type` suffix. Repeated names get
/// a numeric suffix so every field stays addressable.
fn derive_shape(def: &RelationDef, headings: &HeaderRow) -> RowShape {
	let fields: Vec<Field> = if def.fields.is_empty() {
		headings.iter().map(|heading| heading_field(heading)).collect()
	} else {
		def.fields.iter().map(|field| Field::new(field.name.clone(), field.kind)).collect()
	};

	let mut seen = HashSet::new();
	let fields = fields
		.into_iter()
		.map(|mut field| {
			let base = field.name.clone();
			let mut suffix = 1;
			while !seen.insert(field.name.clone()) {
				field.name = format!("{}_{}", base, suffix);
				suffix += 1;
			}
			field
		})
		.collect();
	RowShape::new(fields)
}

fn heading_field(heading: &str) -> Field {
	if let Some((name, kind)) = heading.rsplit_once(':') {
		if let Some(kind) = FieldKind::from_name(kind) {
			if !name.trim().is_empty() {
				return Field::new(name.trim(), kind);
			}
		}
	}
	Field::text(heading)
}

/// Converts a cell to its field kind. Cells that do not parse keep their
/// text; empty cells of typed fields are null.
fn typed(cell: &str, kind: FieldKind) -> Value {
	if cell.is_empty() && kind != FieldKind::Text {
		return Value::Null;
	}
	let digits = || cell.chars().filter(|c| !matches!(c, ',' | '_')).collect::<String>();
	let parsed = match kind {
		FieldKind::Text => None,
		FieldKind::Integer => digits().parse::<i64>().ok().map(Value::from),
		FieldKind::Float => digits().parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number),
		FieldKind::Boolean => match cell.to_ascii_lowercase().as_str() {
			"true" | "yes" | "1" => Some(Value::Bool(true)),
			"false" | "no" | "0" => Some(Value::Bool(false)),
			_ => None,
		},
	};
	parsed.unwrap_or_else(|| Value::String(cell.to_string()))
}

#[cfg(test)]
mod tests {
	use reifydb_testing::tempdir::{temp_dir, write_fixture};

	use super::*;
	use crate::FieldDef;

	#[test]
	fn test_heading_kinds() {
		let def = RelationDef::new("EMPS", "EMPS.csv");
		let headings = HeaderRow::new(vec!["EMPNO:int".to_string(), "NAME:string".to_string(), "ts:00".to_string()]);
		let shape = derive_shape(&def, &headings);
		assert_eq!(
			shape.fields(),
			&[Field::new("EMPNO", FieldKind::Integer), Field::text("NAME"), Field::text("ts:00")]
		);
	}

	#[test]
	fn test_declared_fields_win() {
		let def = RelationDef::new("T", "t.html").fields(vec![FieldDef::new("Rank", FieldKind::Integer)]);
		let shape = derive_shape(&def, &HeaderRow::positional(3));
		assert_eq!(shape.names(), vec!["Rank"]);
	}

	#[test]
	fn test_declared_fields_drop_trailing_columns() {
		temp_dir(|dir| {
			write_fixture(dir, "t.csv", "A,B,C\n1,2,3\n4,5,6\n")?;
			let def = RelationDef::new("T", "t.csv")
				.fields(vec![FieldDef::new("X", FieldKind::Integer), FieldDef::new("Y", FieldKind::Text)]);
			let relation = ExternalRelation::new_in(&SourceLocator::file(dir), def, ReaderConfig::default()).unwrap();

			assert_eq!(relation.shape().names(), vec!["X", "Y"]);
			let rows: Vec<Value> = relation.scan::<&str>(&[]).unwrap().map(Value::Object).collect();
			assert_eq!(rows, vec![serde_json::json!({"X": 1, "Y": "2"}), serde_json::json!({"X": 4, "Y": "5"})]);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_repeated_headings() {
		let def = RelationDef::new("T", "t.html");
		let headings = HeaderRow::new(vec!["Name".to_string(), "Name".to_string(), "Name_1".to_string()]);
		assert_eq!(derive_shape(&def, &headings).names(), vec!["Name", "Name_1", "Name_1_1"]);
	}

	#[test]
	fn test_typed() {
		assert_eq!(typed("8,405,837", FieldKind::Integer), Value::from(8405837));
		assert_eq!(typed("2.5", FieldKind::Float), serde_json::json!(2.5));
		assert_eq!(typed("Yes", FieldKind::Boolean), Value::Bool(true));
		assert_eq!(typed("", FieldKind::Integer), Value::Null);
		assert_eq!(typed("", FieldKind::Text), Value::String(String::new()));
		assert_eq!(typed("n/a", FieldKind::Integer), Value::String("n/a".to_string()));
	}
}
