// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde_json::json;

use super::{Rule, translate};
use crate::{
	Convention, PlanNode,
	node::{ExternalNode, ProjectNode},
};

/// Projection of plain fields over an external input.
pub struct ExternalProjectRule;

impl Rule for ExternalProjectRule {
	fn name(&self) -> &'static str {
		"external_project"
	}

	fn apply(&self, node: &PlanNode) -> Option<PlanNode> {
		let PlanNode::Project(project) = node else {
			return None;
		};
		if project.input.convention() != Convention::EXTERNAL {
			return None;
		}

		let stage = json!({ "$project": translate::projection(&project.projections)? });
		Some(PlanNode::ExternalProject(ExternalNode {
			node: ProjectNode {
				input: project.input.clone(),
				projections: project.projections.clone(),
			},
			stages: vec![stage],
		}))
	}
}
