// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
	Convention, Cost, CostEstimable, Metadata, PlanContext, PlanNode, Planner, RowShape, RuleRegistrant,
	Scannable, Table, TraitSet, rules,
};

/// Leaf of a plan that reads one external table, optionally restricted to
/// a subset of its fields.
#[derive(Debug, Clone)]
pub struct ScanNode {
	context: PlanContext,
	table: Arc<dyn Table>,
	projection: Option<RowShape>,
}

impl ScanNode {
	/// # Panics
	///
	/// When the context is not in the external convention, or when the
	/// projection is not a subset of the table's fields in native order.
	/// Both are planner wiring bugs.
	pub fn create(context: PlanContext, table: Arc<dyn Table>, projection: Option<RowShape>) -> Self {
		assert_eq!(
			context.traits().convention(),
			Convention::EXTERNAL,
			"scan of '{}' created in the wrong convention",
			table.name()
		);
		if let Some(projection) = &projection {
			assert!(
				table.shape().contains_in_order(projection),
				"projection {:?} is not an ordered subset of '{}' {:?}",
				projection.names(),
				table.name(),
				table.shape().names()
			);
		}

		Self {
			context,
			table,
			projection,
		}
	}

	pub fn context(&self) -> &PlanContext {
		&self.context
	}

	pub fn projection(&self) -> Option<&RowShape> {
		self.projection.as_ref()
	}

	/// Scan traits cannot be rewritten, so `traits` is ignored and the same
	/// logical node comes back.
	///
	/// # Panics
	///
	/// When `inputs` is not empty; a scan is a leaf.
	pub fn copy(&self, _traits: TraitSet, inputs: Vec<PlanNode>) -> ScanNode {
		assert!(inputs.is_empty(), "scan of '{}' is a leaf, got {} inputs", self.table.name(), inputs.len());
		self.clone()
	}

	/// Fraction of the native fields the scan produces.
	fn projected_ratio(&self) -> f64 {
		let native = self.table.shape().len();
		match &self.projection {
			Some(projection) if native > 0 => projection.len() as f64 / native as f64,
			_ => 1.0,
		}
	}
}

impl PartialEq for ScanNode {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.table, &other.table)
			&& self.projection == other.projection
			&& self.context == other.context
	}
}

impl Scannable for ScanNode {
	fn table(&self) -> &Arc<dyn Table> {
		&self.table
	}

	fn derive_row_type(&self) -> RowShape {
		match &self.projection {
			Some(projection) => projection.clone(),
			None => self.table.shape().clone(),
		}
	}
}

impl CostEstimable for ScanNode {
	fn compute_cost(&self, planner: &dyn Planner, metadata: &dyn Metadata) -> Cost {
		let config = planner.cost_config();
		let rows = metadata.row_count(self.table.as_ref()).unwrap_or(config.default_row_count);
		Cost::leaf(rows).multiply_by(config.discount * self.projected_ratio())
	}
}

impl RuleRegistrant for ScanNode {
	#[instrument(name = "plan::register", level = "debug", skip_all, fields(table = self.table.name()))]
	fn register(&self, planner: &mut dyn Planner) {
		let mut added = 0;
		for rule in rules::RULES {
			added += usize::from(planner.add_rule(*rule));
		}
		added += usize::from(planner.add_rule(rules::TO_ENUMERABLE));
		debug!(added, "registered external rules");
	}
}
