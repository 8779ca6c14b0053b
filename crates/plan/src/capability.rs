// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use crate::{Cost, Metadata, Planner, RowShape, Table};

/// A leaf that reads rows of a table.
pub trait Scannable {
	fn table(&self) -> &Arc<dyn Table>;

	/// Shape of the rows the node produces.
	fn derive_row_type(&self) -> RowShape;
}

pub trait CostEstimable {
	fn compute_cost(&self, planner: &dyn Planner, metadata: &dyn Metadata) -> Cost;
}

/// Installs the rules a node relies on. Callers hold the planner
/// exclusively while registering.
pub trait RuleRegistrant {
	fn register(&self, planner: &mut dyn Planner);
}
