// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Debug;

use crate::RowShape;

/// A relation the planner can scan.
pub trait Table: Debug + Send + Sync {
	fn name(&self) -> &str;

	/// Native shape of every row.
	fn shape(&self) -> &RowShape;

	/// The table's own row estimate, if it has one.
	fn row_count(&self) -> Option<f64> {
		None
	}
}

/// Statistics the planner collected about tables.
pub trait Metadata {
	fn row_count(&self, table: &dyn Table) -> Option<f64>;
}

/// Metadata without statistics of its own; defers to the table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMetadata;

impl Metadata for DefaultMetadata {
	fn row_count(&self, table: &dyn Table) -> Option<f64> {
		table.row_count()
	}
}
