// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Header detection as an ordered chain of named strategies.
//!
//! Each strategy either recognises the header of a table or declines. The
//! chain always ends with [`Positional`], so detection never fails: tables
//! that omit header sections or header cells still get a usable header.

use tracing::debug;

use crate::{HeaderRow, RawTable, Section};

/// Outcome of a strategy that recognised a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
	pub headings: HeaderRow,
	/// Raw index of a body row that was promoted to the header and must not
	/// be yielded as data.
	pub promoted: Option<usize>,
	/// Name of the strategy that produced this detection.
	pub strategy: &'static str,
}

pub trait HeaderStrategy: Send + Sync {
	fn name(&self) -> &'static str;

	fn detect(&self, table: &RawTable) -> Option<Detection>;
}

/// Uses the first row of an explicit header section.
pub struct ExplicitSection;

impl HeaderStrategy for ExplicitSection {
	fn name(&self) -> &'static str {
		"explicit_section"
	}

	fn detect(&self, table: &RawTable) -> Option<Detection> {
		let head = table.rows.iter().find(|row| row.section == Section::Head && !row.cells.is_empty())?;
		Some(Detection {
			headings: HeaderRow::new(head.texts()),
			promoted: None,
			strategy: self.name(),
		})
	}
}

/// Promotes the first body row when every cell is marked as a header cell.
pub struct HeaderCells;

impl HeaderStrategy for HeaderCells {
	fn name(&self) -> &'static str {
		"header_cells"
	}

	fn detect(&self, table: &RawTable) -> Option<Detection> {
		let (index, first) = table.body().next()?;
		if first.cells.is_empty() || !first.cells.iter().all(|cell| cell.header) {
			return None;
		}
		Some(Detection {
			headings: HeaderRow::new(first.texts()),
			promoted: Some(index),
			strategy: self.name(),
		})
	}
}

/// Promotes an unmarked first body row whose texts read like labels: every
/// cell is non-empty, no two cells repeat, and none is a number. The row must
/// also stand apart from the rows below it: in at least one column, the
/// cells below share one character profile and the first cell does not.
pub struct PlausibleText;

impl HeaderStrategy for PlausibleText {
	fn name(&self) -> &'static str {
		"plausible_text"
	}

	fn detect(&self, table: &RawTable) -> Option<Detection> {
		let mut body = table.body();
		let (index, first) = body.next()?;
		body.next()?;

		let texts = first.texts();
		if texts.is_empty() || texts.iter().any(|text| text.is_empty() || is_numeric(text)) {
			return None;
		}

		let mut seen: Vec<String> = Vec::with_capacity(texts.len());
		for text in &texts {
			let key = text.to_lowercase();
			if seen.contains(&key) {
				return None;
			}
			seen.push(key);
		}

		let below: Vec<Vec<String>> = table.body().skip(1).map(|(_, row)| row.texts()).collect();
		let distinct = texts.iter().enumerate().any(|(column, text)| {
			let mut profiles = below
				.iter()
				.filter_map(|row| row.get(column))
				.filter(|cell| !cell.is_empty())
				.map(|cell| profile(cell));
			let Some(first) = profiles.next() else {
				return false;
			};
			profiles.all(|other| other == first) && profile(text) != first
		});
		if !distinct {
			return None;
		}

		Some(Detection {
			headings: HeaderRow::new(texts),
			promoted: Some(index),
			strategy: self.name(),
		})
	}
}

/// Synthesizes `column0..` sized to the widest row. Never declines.
pub struct Positional;

impl HeaderStrategy for Positional {
	fn name(&self) -> &'static str {
		"positional"
	}

	fn detect(&self, table: &RawTable) -> Option<Detection> {
		Some(Self::detection(table))
	}
}

impl Positional {
	fn detection(table: &RawTable) -> Detection {
		Detection {
			headings: HeaderRow::positional(table.width().max(1)),
			promoted: None,
			strategy: "positional",
		}
	}
}

/// Character classes of `text` with runs collapsed, so `R0C0` reads as
/// `AdAd` and `Seattle` as `Aa`. Numbers share one profile.
fn profile(text: &str) -> String {
	if is_numeric(text) {
		return "N".to_string();
	}
	let mut out = String::new();
	for c in text.trim().chars() {
		let class = match c {
			c if c.is_uppercase() => 'A',
			c if c.is_lowercase() => 'a',
			c if c.is_ascii_digit() => 'd',
			c if c.is_whitespace() => ' ',
			c => c,
		};
		if !out.ends_with(class) {
			out.push(class);
		}
	}
	out
}

fn is_numeric(text: &str) -> bool {
	let cleaned: String = text.chars().filter(|c| !matches!(c, ',' | '_' | '%' | '$')).collect();
	cleaned.chars().any(|c| c.is_ascii_digit()) && cleaned.parse::<f64>().is_ok()
}

pub struct HeaderChain {
	strategies: Vec<Box<dyn HeaderStrategy>>,
}

impl HeaderChain {
	pub fn new(strategies: Vec<Box<dyn HeaderStrategy>>) -> Self {
		Self {
			strategies,
		}
	}

	/// Order used for markup documents.
	pub fn markup() -> Self {
		Self::new(vec![
			Box::new(ExplicitSection),
			Box::new(HeaderCells),
			Box::new(PlausibleText),
			Box::new(Positional),
		])
	}

	/// Delimited and record sources either carry a native header or get
	/// positional names.
	pub fn flat() -> Self {
		Self::new(vec![Box::new(ExplicitSection), Box::new(Positional)])
	}

	pub fn detect(&self, table: &RawTable) -> Detection {
		for strategy in &self.strategies {
			if let Some(detection) = strategy.detect(table) {
				debug!(strategy = detection.strategy, width = detection.headings.len(), "detected header");
				return detection;
			}
		}
		Positional::detection(table)
	}
}
