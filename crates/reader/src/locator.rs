// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

/// Selects one embedded table out of a markup document.
///
/// The selector is css. A trailing `:eq(N)` pseudo-class is not css; it is
/// split off and becomes the occurrence index, so `table:eq(2)` picks the
/// third `table` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLocator {
	text: String,
	css: String,
	index: usize,
}

impl TableLocator {
	pub fn new(selector: impl Into<String>) -> Self {
		let text = selector.into();
		let (css, index) = split_eq(&text);
		Self {
			css: if css.is_empty() {
				"table".to_string()
			} else {
				css.to_string()
			},
			index: index.unwrap_or(0),
			text,
		}
	}

	/// Overrides the occurrence index, including one given by `:eq(N)`.
	pub fn with_index(mut self, index: usize) -> Self {
		self.index = index;
		self
	}

	/// Selector text as written.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn css(&self) -> &str {
		&self.css
	}

	pub fn index(&self) -> usize {
		self.index
	}
}

impl Display for TableLocator {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.text)
	}
}

fn split_eq(selector: &str) -> (&str, Option<usize>) {
	let trimmed = selector.trim();
	if let Some(body) = trimmed.strip_suffix(')') {
		if let Some(position) = body.rfind(":eq(") {
			if let Ok(index) = body[position + 4..].trim().parse::<usize>() {
				return (trimmed[..position].trim_end(), Some(index));
			}
		}
	}
	(trimmed, None)
}
