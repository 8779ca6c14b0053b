// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

//! Turns one external document into a header row and a lazy sequence of
//! data rows.
//!
//! The reader parses once per fetch and keeps the parsed rows; every call
//! to [`TabularReader::rows`] starts a fresh forward-only pass over them.
//! Re-reading the source requires [`TabularReader::refresh`].

mod config;
mod format;
pub mod header;
mod locator;
mod reader;
mod row;
mod table;

pub use config::{DelimitedConfig, ReaderConfig};
pub use locator::TableLocator;
pub use reader::{IntoRows, Rows, TabularReader};
pub use reifydb_type::Result;
pub use row::{DataRow, HeaderRow};
pub use table::{RawCell, RawRow, RawTable, Section};
