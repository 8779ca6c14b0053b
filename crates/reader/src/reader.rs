// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{iter::Enumerate, slice::Iter, vec::IntoIter};

use reifydb_source::{SourceFormat, SourceLocator, fetch};
use reifydb_type::Result;
use tracing::{debug, instrument};

use crate::{
	DataRow, HeaderRow, RawRow, RawTable, ReaderConfig, Section, TableLocator,
	format,
	header::{Detection, HeaderChain},
};

/// Reads one table out of an external source.
///
/// Opening resolves, fetches, parses and selects eagerly, so every failure
/// surfaces from [`TabularReader::open`]. Structural irregularities never
/// fail; they only change which header strategy applies.
#[derive(Debug)]
pub struct TabularReader {
	locator: SourceLocator,
	table_locator: Option<TableLocator>,
	config: ReaderConfig,
	format: SourceFormat,
	table: RawTable,
	detection: Detection,
}

impl TabularReader {
	#[instrument(name = "reader::open", level = "debug", skip(table, config), fields(locator = %locator))]
	pub fn open(locator: SourceLocator, table: Option<TableLocator>, config: ReaderConfig) -> Result<Self> {
		let (format, raw, detection) = load(&locator, table.as_ref(), &config)?;
		Ok(Self {
			locator,
			table_locator: table,
			config,
			format,
			table: raw,
			detection,
		})
	}

	/// Resolves `address` as a path or url, then opens it.
	pub fn open_address(address: &str, table: Option<TableLocator>, config: ReaderConfig) -> Result<Self> {
		Self::open(SourceLocator::resolve(address)?, table, config)
	}

	/// Fetches and parses the source again. On failure the previously read
	/// rows stay in place.
	#[instrument(name = "reader::refresh", level = "debug", skip(self), fields(locator = %self.locator))]
	pub fn refresh(&mut self) -> Result<()> {
		let (format, table, detection) = load(&self.locator, self.table_locator.as_ref(), &self.config)?;
		self.format = format;
		self.table = table;
		self.detection = detection;
		Ok(())
	}

	pub fn headings(&self) -> &HeaderRow {
		&self.detection.headings
	}

	/// Name of the header strategy that produced [`Self::headings`].
	pub fn header_strategy(&self) -> &'static str {
		self.detection.strategy
	}

	/// Starts a new pass over the data rows in document order.
	pub fn rows(&self) -> Rows<'_> {
		Rows {
			rows: self.table.rows.iter().enumerate(),
			promoted: self.detection.promoted,
		}
	}

	pub fn locator(&self) -> &SourceLocator {
		&self.locator
	}

	pub fn table_locator(&self) -> Option<&TableLocator> {
		self.table_locator.as_ref()
	}

	pub fn format(&self) -> SourceFormat {
		self.format
	}
}

impl<'a> IntoIterator for &'a TabularReader {
	type Item = DataRow;
	type IntoIter = Rows<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.rows()
	}
}

/// Consumes the reader; rows are converted as they are reached.
impl IntoIterator for TabularReader {
	type Item = DataRow;
	type IntoIter = IntoRows;

	fn into_iter(self) -> Self::IntoIter {
		IntoRows {
			rows: self.table.rows.into_iter().enumerate(),
			promoted: self.detection.promoted,
		}
	}
}

fn load(
	locator: &SourceLocator,
	table: Option<&TableLocator>,
	config: &ReaderConfig,
) -> Result<(SourceFormat, RawTable, Detection)> {
	let content = fetch(locator, &config.fetch)?;
	let format = config.format.or_else(|| content.format()).unwrap_or(SourceFormat::Markup);
	debug!(?format, bytes = content.bytes.len(), "parsing source");

	let raw = format::parse(&content, format, table, config)?;
	let chain = if format.is_markup() {
		HeaderChain::markup()
	} else {
		HeaderChain::flat()
	};
	let detection = chain.detect(&raw);
	Ok((format, raw, detection))
}

/// Forward-only cursor over the data rows of a [`TabularReader`].
///
/// Header rows and a row promoted to the header are skipped. Cells are
/// converted to a [`DataRow`] only when the row is reached.
pub struct Rows<'a> {
	rows: Enumerate<Iter<'a, RawRow>>,
	promoted: Option<usize>,
}

impl Iterator for Rows<'_> {
	type Item = DataRow;

	fn next(&mut self) -> Option<Self::Item> {
		for (index, row) in self.rows.by_ref() {
			if row.section == Section::Head || self.promoted == Some(index) {
				continue;
			}
			return Some(DataRow::new(row.texts()));
		}
		None
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(0, self.rows.size_hint().1)
	}
}

/// Owning counterpart of [`Rows`].
pub struct IntoRows {
	rows: Enumerate<IntoIter<RawRow>>,
	promoted: Option<usize>,
}

impl Iterator for IntoRows {
	type Item = DataRow;

	fn next(&mut self) -> Option<Self::Item> {
		for (index, row) in self.rows.by_ref() {
			if row.section == Section::Head || self.promoted == Some(index) {
				continue;
			}
			return Some(DataRow::new(row.cells.into_iter().map(|cell| cell.text).collect()));
		}
		None
	}
}
