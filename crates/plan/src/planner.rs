// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::{
	Convention, CostConfig, PlanNode,
	rules::{Rule, RuleKind},
};

/// The planner surface external nodes interact with.
pub trait Planner {
	/// Installs `rule`. Returns false when a rule with the same name is
	/// already installed, which leaves the planner unchanged.
	fn add_rule(&mut self, rule: &'static dyn Rule) -> bool;

	fn cost_config(&self) -> &CostConfig;
}

const MAX_PASSES: usize = 64;

/// Planner that rewrites plans with its installed rules.
///
/// Transformation rules run bottom-up until no rule matches anymore. Then
/// every maximal external subtree is handed to the first conversion rule
/// that accepts it.
pub struct RuleRegistry {
	rules: IndexMap<&'static str, &'static dyn Rule>,
	config: CostConfig,
}

impl RuleRegistry {
	pub fn new() -> Self {
		Self::with_config(CostConfig::default())
	}

	pub fn with_config(config: CostConfig) -> Self {
		Self {
			rules: IndexMap::new(),
			config,
		}
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	pub fn rule_names(&self) -> Vec<&'static str> {
		self.rules.keys().copied().collect()
	}

	#[instrument(name = "plan::optimize", level = "debug", skip_all)]
	pub fn optimize(&self, plan: PlanNode) -> PlanNode {
		let mut plan = plan;
		for pass in 1..=MAX_PASSES {
			let (next, changed) = self.transform(plan);
			plan = next;
			if !changed {
				debug!(passes = pass, "reached fixpoint");
				break;
			}
		}
		self.convert(plan)
	}

	fn rules_of(&self, kind: RuleKind) -> impl Iterator<Item = &'static dyn Rule> + '_ {
		self.rules.values().copied().filter(move |rule| rule.kind() == kind)
	}

	fn transform(&self, node: PlanNode) -> (PlanNode, bool) {
		let mut changed = false;
		let node = node.map_inputs(|input| {
			let (input, input_changed) = self.transform(input);
			changed |= input_changed;
			input
		});

		for rule in self.rules_of(RuleKind::Transformation) {
			if let Some(rewritten) = rule.apply(&node) {
				trace!(rule = rule.name(), "rewrote node");
				return (rewritten, true);
			}
		}
		(node, changed)
	}

	fn convert(&self, node: PlanNode) -> PlanNode {
		if node.convention() == Convention::EXTERNAL {
			for rule in self.rules_of(RuleKind::Conversion) {
				if let Some(converted) = rule.apply(&node) {
					trace!(rule = rule.name(), "converted subtree");
					return converted;
				}
			}
			return node;
		}
		node.map_inputs(|input| self.convert(input))
	}
}

impl Default for RuleRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl Planner for RuleRegistry {
	fn add_rule(&mut self, rule: &'static dyn Rule) -> bool {
		if self.rules.contains_key(rule.name()) {
			return false;
		}
		self.rules.insert(rule.name(), rule);
		true
	}

	fn cost_config(&self) -> &CostConfig {
		&self.config
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::{
		PlanContext, PushdownRequest, RowShape, RuleRegistrant, ScanNode, Table,
		expr::{AggregateCall, AggregateFunction, Expr, Projection},
		rules,
	};

	#[derive(Debug)]
	struct Depts(RowShape);

	impl Table for Depts {
		fn name(&self) -> &str {
			"DEPTS"
		}

		fn shape(&self) -> &RowShape {
			&self.0
		}
	}

	fn scan() -> ScanNode {
		ScanNode::create(PlanContext::external(), Arc::new(Depts(RowShape::text(&["DEPTNO", "NAME"]))), None)
	}

	fn registered() -> RuleRegistry {
		let mut planner = RuleRegistry::new();
		scan().register(&mut planner);
		planner
	}

	#[test]
	fn test_rules_are_installed_in_order() {
		let planner = registered();
		assert_eq!(
			planner.rule_names(),
			vec!["external_filter", "external_project", "external_aggregate", "external_to_enumerable"]
		);
	}

	#[test]
	fn test_add_rule_deduplicates_by_name() {
		let mut planner = RuleRegistry::new();
		assert!(planner.add_rule(rules::TO_ENUMERABLE));
		assert!(!planner.add_rule(rules::TO_ENUMERABLE));
		assert_eq!(planner.len(), 1);
	}

	#[test]
	fn test_filter_and_project_are_pushed_down() {
		let plan = PlanNode::project(
			PlanNode::filter(PlanNode::Scan(scan()), Expr::gt(Expr::field("DEPTNO"), Expr::int(10))),
			vec![Projection::field("NAME")],
		);

		let optimized = registered().optimize(plan);
		assert_eq!(
			optimized.explain(),
			"ToEnumerable\n  ExternalProject [\"NAME\"]\n    ExternalFilter DEPTNO $gt 10\n      Scan DEPTS [\"DEPTNO\", \"NAME\"]\n"
		);

		let request = PushdownRequest::implement(&optimized).unwrap();
		assert_eq!(request.pipeline.len(), 2);
		assert!(request.pipeline[0].get("$match").is_some());
		assert!(request.pipeline[1].get("$project").is_some());
	}

	#[test]
	fn test_untranslatable_filter_stays_generic() {
		let plan = PlanNode::filter(PlanNode::Scan(scan()), Expr::eq(Expr::field("DEPTNO"), Expr::field("NAME")));

		let optimized = registered().optimize(plan);
		let PlanNode::Filter(filter) = &optimized else {
			panic!("unexpected plan:\n{}", optimized.explain());
		};
		assert!(matches!(filter.input.as_ref(), PlanNode::ToEnumerable(_)));
	}

	#[test]
	fn test_aggregate_is_pushed_down() {
		let plan = PlanNode::aggregate(
			PlanNode::Scan(scan()),
			&["NAME"],
			vec![AggregateCall::count("C"), AggregateCall::new(AggregateFunction::Max, Some("DEPTNO"), "M")],
		);

		let optimized = registered().optimize(plan);
		let request = PushdownRequest::implement(&optimized).unwrap();
		assert_eq!(request.pipeline.len(), 2);
		assert!(request.pipeline[0].get("$group").is_some());
		assert_eq!(optimized.row_type().names(), vec!["NAME", "C", "M"]);
	}

	#[test]
	fn test_pushdown_stops_at_generic_node() {
		let plan = PlanNode::project(
			PlanNode::filter(PlanNode::Scan(scan()), Expr::eq(Expr::field("DEPTNO"), Expr::field("NAME"))),
			vec![Projection::field("NAME")],
		);

		let optimized = registered().optimize(plan);
		assert!(matches!(optimized, PlanNode::Project(_)));
		assert_eq!(optimized.inputs()[0].inputs()[0].convention(), Convention::ENUMERABLE);
	}

	#[test]
	fn test_unregistered_planner_leaves_plan_alone() {
		let plan = PlanNode::filter(PlanNode::Scan(scan()), Expr::gt(Expr::field("DEPTNO"), Expr::int(10)));
		let optimized = RuleRegistry::new().optimize(plan);
		assert!(matches!(optimized, PlanNode::Filter(_)));
	}
}
