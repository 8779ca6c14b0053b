// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use reifydb_source::{FetchConfig, SourceFormat};

#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
	pub fetch: FetchConfig,
	pub delimited: DelimitedConfig,
	/// Overrides format detection from extension and content type.
	pub format: Option<SourceFormat>,
}

impl ReaderConfig {
	pub fn fetch(mut self, fetch: FetchConfig) -> Self {
		self.fetch = fetch;
		self
	}

	pub fn delimited(mut self, delimited: DelimitedConfig) -> Self {
		self.delimited = delimited;
		self
	}

	pub fn format(mut self, format: SourceFormat) -> Self {
		self.format = Some(format);
		self
	}
}

#[derive(Debug, Clone)]
pub struct DelimitedConfig {
	/// Whether the first record holds column names.
	pub has_headers: bool,
	/// Trim surrounding whitespace from every field.
	pub trim: bool,
}

impl Default for DelimitedConfig {
	fn default() -> Self {
		Self {
			has_headers: true,
			trim: true,
		}
	}
}

impl DelimitedConfig {
	pub fn has_headers(mut self, has_headers: bool) -> Self {
		self.has_headers = has_headers;
		self
	}

	pub fn trim(mut self, trim: bool) -> Self {
		self.trim = trim;
		self
	}
}
