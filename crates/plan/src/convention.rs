// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

/// Calling convention a plan node executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Convention(&'static str);

impl Convention {
	/// Generic relational nodes that nothing has implemented yet.
	pub const NONE: Convention = Convention("none");
	/// Nodes evaluated by the external source.
	pub const EXTERNAL: Convention = Convention("external");
	/// Nodes evaluated locally by iterating rows.
	pub const ENUMERABLE: Convention = Convention("enumerable");

	pub fn name(&self) -> &'static str {
		self.0
	}
}

impl Display for Convention {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraitSet {
	convention: Convention,
}

impl TraitSet {
	pub fn new(convention: Convention) -> Self {
		Self {
			convention,
		}
	}

	pub fn convention(&self) -> Convention {
		self.convention
	}

	pub fn replace(mut self, convention: Convention) -> Self {
		self.convention = convention;
		self
	}
}

/// Planner supplied context of a node. Passed through, never inspected
/// beyond its trait set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanContext {
	traits: TraitSet,
}

impl PlanContext {
	pub fn new(traits: TraitSet) -> Self {
		Self {
			traits,
		}
	}

	pub fn external() -> Self {
		Self::new(TraitSet::new(Convention::EXTERNAL))
	}

	pub fn traits(&self) -> TraitSet {
		self.traits
	}
}
