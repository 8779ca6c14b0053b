// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
	Text,
	Integer,
	Float,
	Boolean,
}

impl FieldKind {
	/// Parses the type names accepted in `name:type` column headings.
	pub fn from_name(name: &str) -> Option<Self> {
		match name.trim().to_ascii_lowercase().as_str() {
			"string" | "text" | "varchar" | "char" => Some(FieldKind::Text),
			"int" | "integer" | "long" | "short" | "byte" => Some(FieldKind::Integer),
			"float" | "double" | "decimal" | "real" => Some(FieldKind::Float),
			"bool" | "boolean" => Some(FieldKind::Boolean),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
	pub name: String,
	pub kind: FieldKind,
}

impl Field {
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
		}
	}

	pub fn text(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Text)
	}
}

/// Ordered fields of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowShape {
	fields: Vec<Field>,
}

impl RowShape {
	pub fn new(fields: Vec<Field>) -> Self {
		Self {
			fields,
		}
	}

	/// Text fields named `names`.
	pub fn text<S: AsRef<str>>(names: &[S]) -> Self {
		Self::new(names.iter().map(|name| Field::text(name.as_ref())).collect())
	}

	pub fn fields(&self) -> &[Field] {
		&self.fields
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn names(&self) -> Vec<&str> {
		self.fields.iter().map(|field| field.name.as_str()).collect()
	}

	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|field| field.name == name)
	}

	pub fn field(&self, name: &str) -> Option<&Field> {
		self.fields.iter().find(|field| field.name == name)
	}

	/// The named fields in native order, or `None` if one is unknown.
	pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Option<RowShape> {
		let mut indices = names.iter().map(|name| self.index_of(name.as_ref())).collect::<Option<Vec<_>>>()?;
		indices.sort_unstable();
		indices.dedup();
		Some(RowShape::new(indices.into_iter().map(|index| self.fields[index].clone()).collect()))
	}

	/// Whether every field of `other` appears here, in the same relative
	/// order.
	pub fn contains_in_order(&self, other: &RowShape) -> bool {
		let mut native = self.fields.iter();
		other.fields.iter().all(|wanted| native.any(|field| field == wanted))
	}
}
