// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use reifydb_plan::FieldKind;
use reifydb_reader::TableLocator;
use reifydb_source::SourceFormat;
use reifydb_type::{Error, Result};
use serde::{Deserialize, Serialize};

/// Format named in a relation definition, overriding detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatDef {
	Html,
	Csv,
	Tsv,
	Json,
}

impl From<FormatDef> for SourceFormat {
	fn from(format: FormatDef) -> Self {
		match format {
			FormatDef::Html => SourceFormat::Markup,
			FormatDef::Csv => SourceFormat::CSV,
			FormatDef::Tsv => SourceFormat::TSV,
			FormatDef::Json => SourceFormat::Records,
		}
	}
}

/// Declared column, replacing the detected heading at the same position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
	pub name: String,
	#[serde(default = "text", rename = "type")]
	pub kind: FieldKind,
}

fn text() -> FieldKind {
	FieldKind::Text
}

impl FieldDef {
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
		}
	}
}

/// Definition of one external relation, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
	pub name: String,
	/// Filesystem path or url.
	pub source: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub selector: Option<String>,
	/// Occurrence among the selector's matches; overrides `:eq(N)`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub index: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<FormatDef>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub fields: Vec<FieldDef>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub row_count: Option<f64>,
}

impl RelationDef {
	pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			source: source.into(),
			selector: None,
			index: None,
			format: None,
			fields: vec![],
			row_count: None,
		}
	}

	pub fn selector(mut self, selector: impl Into<String>) -> Self {
		self.selector = Some(selector.into());
		self
	}

	pub fn index(mut self, index: usize) -> Self {
		self.index = Some(index);
		self
	}

	pub fn format(mut self, format: FormatDef) -> Self {
		self.format = Some(format);
		self
	}

	pub fn fields(mut self, fields: Vec<FieldDef>) -> Self {
		self.fields = fields;
		self
	}

	pub fn row_count(mut self, rows: f64) -> Self {
		self.row_count = Some(rows);
		self
	}

	/// The table locator, when the definition selects one. An index without
	/// selector selects among all tables.
	pub fn table_locator(&self) -> Option<TableLocator> {
		let locator = match (&self.selector, self.index) {
			(Some(selector), _) => TableLocator::new(selector.as_str()),
			(None, Some(_)) => TableLocator::new("table"),
			(None, None) => return None,
		};
		Some(match self.index {
			Some(index) => locator.with_index(index),
			None => locator,
		})
	}

	pub fn validate(&self) -> Result<()> {
		let invalid = |reason: String| Error::InvalidDefinition {
			name: self.name.clone(),
			reason,
		};

		if self.name.trim().is_empty() {
			return Err(invalid("relation name is empty".to_string()));
		}
		if let Some(rows) = self.row_count {
			if !rows.is_finite() || rows < 0.0 {
				return Err(invalid(format!("row count {} is not a non-negative number", rows)));
			}
		}

		let mut seen = HashSet::new();
		for field in &self.fields {
			if field.name.trim().is_empty() {
				return Err(invalid("field name is empty".to_string()));
			}
			if !seen.insert(field.name.as_str()) {
				return Err(invalid(format!("field '{}' is declared twice", field.name)));
			}
		}
		Ok(())
	}
}

/// A set of relation definitions, as a host would keep them in a config
/// file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
	pub relations: Vec<RelationDef>,
}

impl SchemaDef {
	pub fn from_json(text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(|e| Error::InvalidDefinition {
			name: "schema".to_string(),
			reason: e.to_string(),
		})
	}
}
