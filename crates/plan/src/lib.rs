// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

//! Planner integration for external relations.
//!
//! A [`ScanNode`] is the leaf that reads one external table. It advertises a
//! discounted cost, installs the pushdown [`rules`] into a [`Planner`], and
//! the rules rewrite generic filter, project and aggregate nodes stacked above
//! it into external nodes that carry aggregation pipeline stages. The stages
//! of an external subtree are collected into a [`PushdownRequest`].

mod capability;
mod convention;
mod cost;
pub mod expr;
pub mod node;
mod planner;
mod request;
pub mod rules;
mod shape;
mod table;

pub use capability::{CostEstimable, RuleRegistrant, Scannable};
pub use convention::{Convention, PlanContext, TraitSet};
pub use cost::{Cost, CostConfig};
pub use node::{PlanNode, ScanNode};
pub use planner::{Planner, RuleRegistry};
pub use request::{Document, PushdownExecutor, PushdownRequest};
pub use reifydb_type::Result;
pub use shape::{Field, FieldKind, RowShape};
pub use table::{DefaultMetadata, Metadata, Table};
