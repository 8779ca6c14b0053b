// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::SourceLocator;

/// Structural format of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
	/// Markup document that may embed several tables.
	Markup,
	/// Delimited records, one table per source.
	Delimited {
		delimiter: u8,
	},
	/// A JSON array of records, one table per source.
	Records,
}

impl SourceFormat {
	pub const CSV: SourceFormat = SourceFormat::Delimited {
		delimiter: b',',
	};
	pub const TSV: SourceFormat = SourceFormat::Delimited {
		delimiter: b'\t',
	};

	pub fn from_extension(extension: &str) -> Option<Self> {
		match extension.to_ascii_lowercase().as_str() {
			"html" | "htm" | "xhtml" => Some(SourceFormat::Markup),
			"csv" => Some(Self::CSV),
			"tsv" | "tab" => Some(Self::TSV),
			"json" => Some(SourceFormat::Records),
			_ => None,
		}
	}

	pub fn from_content_type(content_type: &str) -> Option<Self> {
		let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
		match mime.as_str() {
			"text/html" | "application/xhtml+xml" => Some(SourceFormat::Markup),
			"text/csv" => Some(Self::CSV),
			"text/tab-separated-values" => Some(Self::TSV),
			"application/json" => Some(SourceFormat::Records),
			_ => None,
		}
	}

	/// Detects the format from the locator's extension, then from the
	/// served content type. Remote pages without either are markup.
	pub fn detect(locator: &SourceLocator, content_type: Option<&str>) -> Option<Self> {
		locator
			.extension()
			.and_then(|extension| Self::from_extension(&extension))
			.or_else(|| content_type.and_then(Self::from_content_type))
			.or_else(|| (!locator.is_file()).then_some(SourceFormat::Markup))
	}

	pub fn is_markup(&self) -> bool {
		matches!(self, SourceFormat::Markup)
	}
}
