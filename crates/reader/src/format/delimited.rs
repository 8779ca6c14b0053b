// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use csv::{ReaderBuilder, Trim};
use reifydb_type::{Error, ParseCause, Result};

use crate::{DelimitedConfig, RawCell, RawRow, RawTable, Section};

pub(crate) fn parse(bytes: &[u8], delimiter: u8, config: &DelimitedConfig, locator: &str) -> Result<RawTable> {
	let mut reader = ReaderBuilder::new()
		.delimiter(delimiter)
		.has_headers(false)
		.flexible(true)
		.trim(if config.trim {
			Trim::All
		} else {
			Trim::None
		})
		.from_reader(bytes);

	let mut rows = Vec::new();
	for (position, record) in reader.records().enumerate() {
		let record = record.map_err(|e| Error::Parse {
			locator: locator.to_string(),
			source: ParseCause::Format(Box::new(e)),
		})?;

		let row = if config.has_headers && position == 0 {
			RawRow::new(Section::Head, record.iter().map(RawCell::header).collect())
		} else {
			RawRow::new(Section::Body, record.iter().map(RawCell::data).collect())
		};
		rows.push(row);
	}

	Ok(RawTable::new(rows))
}
