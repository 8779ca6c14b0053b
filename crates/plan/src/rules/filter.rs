// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde_json::json;

use super::{Rule, translate};
use crate::{
	Convention, PlanNode,
	node::{ExternalNode, FilterNode},
};

/// Filter over an external input whose condition translates to `$match`.
pub struct ExternalFilterRule;

impl Rule for ExternalFilterRule {
	fn name(&self) -> &'static str {
		"external_filter"
	}

	fn apply(&self, node: &PlanNode) -> Option<PlanNode> {
		let PlanNode::Filter(FilterNode {
			input,
			condition,
		}) = node
		else {
			return None;
		};
		if input.convention() != Convention::EXTERNAL {
			return None;
		}

		let stage = json!({ "$match": translate::condition(condition)? });
		Some(PlanNode::ExternalFilter(ExternalNode {
			node: FilterNode {
				input: input.clone(),
				condition: condition.clone(),
			},
			stages: vec![stage],
		}))
	}
}
