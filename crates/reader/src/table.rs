// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// Structural section a row was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
	Head,
	Body,
	Foot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
	pub text: String,
	/// Marked as a column label by the source (`<th>`).
	pub header: bool,
}

impl RawCell {
	pub fn data(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			header: false,
		}
	}

	pub fn header(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			header: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
	pub section: Section,
	pub cells: Vec<RawCell>,
}

impl RawRow {
	pub fn new(section: Section, cells: Vec<RawCell>) -> Self {
		Self {
			section,
			cells,
		}
	}

	pub fn texts(&self) -> Vec<String> {
		self.cells.iter().map(|cell| cell.text.clone()).collect()
	}
}

/// Format-neutral parse result: every row of the selected table in
/// document order, with their structural markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
	pub rows: Vec<RawRow>,
}

impl RawTable {
	pub fn new(rows: Vec<RawRow>) -> Self {
		Self {
			rows,
		}
	}

	/// Rows outside the header section, with their raw indices.
	pub fn body(&self) -> impl Iterator<Item = (usize, &RawRow)> {
		self.rows.iter().enumerate().filter(|(_, row)| row.section != Section::Head)
	}

	pub fn width(&self) -> usize {
		self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
	}
}
