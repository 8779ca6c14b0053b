// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Rules that move generic nodes above an external scan into the source.

mod aggregate;
mod enumerable;
mod filter;
mod project;
mod translate;

pub use aggregate::ExternalAggregateRule;
pub use enumerable::ToEnumerableRule;
pub use filter::ExternalFilterRule;
pub use project::ExternalProjectRule;

use crate::PlanNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
	/// Rewrites a node into an equivalent node, applied to a fixpoint.
	Transformation,
	/// Moves a subtree into another convention, applied once at the
	/// boundary of the subtree.
	Conversion,
}

pub trait Rule: Send + Sync {
	/// Unique name; a planner keeps one rule per name.
	fn name(&self) -> &'static str;

	fn kind(&self) -> RuleKind {
		RuleKind::Transformation
	}

	/// The rewritten node, or `None` when the rule does not match.
	fn apply(&self, node: &PlanNode) -> Option<PlanNode>;
}

/// Pushdown rules of the external convention.
pub static RULES: &[&dyn Rule] = &[&ExternalFilterRule, &ExternalProjectRule, &ExternalAggregateRule];

/// Fallback that runs an external subtree and iterates its rows locally.
pub static TO_ENUMERABLE: &dyn Rule = &ToEnumerableRule;
