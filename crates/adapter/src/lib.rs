// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

//! External relations: named tables read from web pages, delimited files
//! and JSON record files, exposed to the planner and executed locally.

mod definition;
mod evaluate;
mod execute;
mod executor;
mod relation;
mod schema;

pub use definition::{FieldDef, FormatDef, RelationDef, SchemaDef};
pub use execute::execute;
pub use executor::LocalExecutor;
pub use relation::{ExternalRelation, RelationRows};
pub use reifydb_type::Result;
pub use schema::ExternalSchema;
