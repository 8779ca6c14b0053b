// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{Rule, translate};
use crate::{
	Convention, PlanNode,
	node::{AggregateNode, ExternalNode},
};

/// Grouping over an external input, when every aggregate has an
/// accumulator.
pub struct ExternalAggregateRule;

impl Rule for ExternalAggregateRule {
	fn name(&self) -> &'static str {
		"external_aggregate"
	}

	fn apply(&self, node: &PlanNode) -> Option<PlanNode> {
		let PlanNode::Aggregate(aggregate) = node else {
			return None;
		};
		if aggregate.input.convention() != Convention::EXTERNAL {
			return None;
		}

		let stages = translate::aggregation(&aggregate.group_by, &aggregate.aggregates)?;
		Some(PlanNode::ExternalAggregate(ExternalNode {
			node: AggregateNode {
				input: aggregate.input.clone(),
				group_by: aggregate.group_by.clone(),
				aggregates: aggregate.aggregates.clone(),
			},
			stages,
		}))
	}
}
