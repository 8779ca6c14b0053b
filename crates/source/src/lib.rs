// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

//! Resolves source addresses and fetches their content.
//!
//! Resolution is eager and syntax-only; fetching is deferred until a reader
//! asks for the bytes.

mod fetch;
mod format;
mod locator;

pub use fetch::{Content, FetchConfig, fetch};
pub use format::SourceFormat;
pub use locator::SourceLocator;
pub use reifydb_type::Result;
