// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::ops::Deref;

/// Ordered column names of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow(Vec<String>);

impl HeaderRow {
	pub fn new(names: Vec<String>) -> Self {
		Self(names)
	}

	/// `column0`, `column1`, ... for tables without any header markers.
	pub fn positional(width: usize) -> Self {
		Self((0..width).map(|i| format!("column{}", i)).collect())
	}

	pub fn into_inner(self) -> Vec<String> {
		self.0
	}
}

impl Deref for HeaderRow {
	type Target = [String];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Raw cell texts of one row, in document order. The length is not tied
/// to the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow(Vec<String>);

impl DataRow {
	pub fn new(cells: Vec<String>) -> Self {
		Self(cells)
	}

	/// Pads with empty cells or truncates to exactly `width` cells.
	pub fn conform(mut self, width: usize) -> Self {
		self.0.resize(width, String::new());
		self
	}

	pub fn into_inner(self) -> Vec<String> {
		self.0
	}
}

impl Deref for DataRow {
	type Target = [String];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<const N: usize> PartialEq<[&str; N]> for DataRow {
	fn eq(&self, other: &[&str; N]) -> bool {
		self.0.len() == N && self.0.iter().zip(other.iter()).all(|(a, b)| a == b)
	}
}

impl<const N: usize> PartialEq<[&str; N]> for HeaderRow {
	fn eq(&self, other: &[&str; N]) -> bool {
		self.0.len() == N && self.0.iter().zip(other.iter()).all(|(a, b)| a == b)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_positional() {
		assert_eq!(HeaderRow::positional(3), ["column0", "column1", "column2"]);
	}

	#[test]
	fn test_conform() {
		let row = DataRow::new(vec!["a".to_string()]);
		assert_eq!(row.clone().conform(3), ["a", "", ""]);
		assert_eq!(row.conform(0).len(), 0);
	}
}
