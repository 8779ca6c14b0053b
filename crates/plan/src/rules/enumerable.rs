// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{Rule, RuleKind};
use crate::{Convention, PlanNode, node::ToEnumerableNode};

/// Wraps an external subtree so its rows are iterated locally.
pub struct ToEnumerableRule;

impl Rule for ToEnumerableRule {
	fn name(&self) -> &'static str {
		"external_to_enumerable"
	}

	fn kind(&self) -> RuleKind {
		RuleKind::Conversion
	}

	fn apply(&self, node: &PlanNode) -> Option<PlanNode> {
		if node.convention() != Convention::EXTERNAL {
			return None;
		}
		Some(PlanNode::ToEnumerable(ToEnumerableNode {
			input: Box::new(node.clone()),
		}))
	}
}
