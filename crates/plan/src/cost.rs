// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cmp::Ordering, ops::Add};

/// Estimated cost of a plan node. Costs compare by their total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cost {
	pub rows: f64,
	pub cpu: f64,
	pub io: f64,
}

impl Cost {
	pub const ZERO: Cost = Cost {
		rows: 0.0,
		cpu: 0.0,
		io: 0.0,
	};

	pub fn new(rows: f64, cpu: f64, io: f64) -> Self {
		Self {
			rows,
			cpu,
			io,
		}
	}

	/// Cost of reading `rows` rows from a leaf with no further work.
	pub fn leaf(rows: f64) -> Self {
		Self::new(rows, rows + 1.0, 0.0)
	}

	pub fn multiply_by(&self, factor: f64) -> Self {
		Self::new(self.rows * factor, self.cpu * factor, self.io * factor)
	}

	pub fn plus(&self, other: &Cost) -> Self {
		Self::new(self.rows + other.rows, self.cpu + other.cpu, self.io + other.io)
	}

	pub fn total(&self) -> f64 {
		self.rows + self.cpu + self.io
	}
}

impl Add for Cost {
	type Output = Cost;

	fn add(self, rhs: Self) -> Self::Output {
		self.plus(&rhs)
	}
}

impl PartialOrd for Cost {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.total().partial_cmp(&other.total())
	}
}

/// Tuning constants of the external scan cost heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostConfig {
	/// Factor applied to every external scan so it is preferred over a
	/// generic scan of the same rows.
	pub discount: f64,
	/// Row estimate used when neither metadata nor the table knows better.
	pub default_row_count: f64,
}

impl CostConfig {
	pub const DEFAULT_DISCOUNT: f64 = 0.1;
	pub const DEFAULT_ROW_COUNT: f64 = 100.0;

	pub fn discount(mut self, discount: f64) -> Self {
		self.discount = discount;
		self
	}

	pub fn default_row_count(mut self, rows: f64) -> Self {
		self.default_row_count = rows;
		self
	}
}

impl Default for CostConfig {
	fn default() -> Self {
		Self {
			discount: Self::DEFAULT_DISCOUNT,
			default_row_count: Self::DEFAULT_ROW_COUNT,
		}
	}
}
