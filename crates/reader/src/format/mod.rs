// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod delimited;
mod markup;
mod records;

use reifydb_source::{Content, SourceFormat};
use reifydb_type::{Error, Result};

use crate::{RawTable, ReaderConfig, TableLocator};

/// Parses fetched content into the rows of the selected table.
pub(crate) fn parse(
	content: &Content,
	format: SourceFormat,
	table: Option<&TableLocator>,
	config: &ReaderConfig,
) -> Result<RawTable> {
	let locator = content.locator.to_string();
	match format {
		SourceFormat::Markup => markup::parse(&content.text_lossy(), table),
		SourceFormat::Delimited {
			delimiter,
		} => {
			reject_selector(table)?;
			delimited::parse(&content.bytes, delimiter, &config.delimited, &locator)
		}
		SourceFormat::Records => {
			reject_selector(table)?;
			records::parse(&content.bytes, &locator)
		}
	}
}

fn reject_selector(table: Option<&TableLocator>) -> Result<()> {
	match table {
		Some(table) => Err(Error::Selector {
			selector: table.text().to_string(),
			reason: "selectors only apply to markup sources".to_string(),
		}),
		None => Ok(()),
	}
}
