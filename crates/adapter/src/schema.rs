// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use indexmap::IndexMap;
use reifydb_plan::{PlanContext, RowShape, ScanNode, Table};
use reifydb_reader::ReaderConfig;
use reifydb_source::SourceLocator;
use reifydb_type::{Error, Result};
use tracing::{info, instrument};

use crate::{ExternalRelation, LocalExecutor, RelationDef, SchemaDef};

/// The relations of one [`SchemaDef`], opened and ready to plan against.
#[derive(Debug, Default)]
pub struct ExternalSchema {
	relations: IndexMap<String, Arc<ExternalRelation>>,
}

impl ExternalSchema {
	/// Opens every relation. Relative sources resolve against the working
	/// directory.
	pub fn new(def: SchemaDef, config: ReaderConfig) -> Result<Self> {
		Self::build(def, |relation| ExternalRelation::new(relation, config.clone()))
	}

	/// Opens every relation, resolving relative sources against `base`.
	pub fn new_in(base: &SourceLocator, def: SchemaDef, config: ReaderConfig) -> Result<Self> {
		Self::build(def, |relation| ExternalRelation::new_in(base, relation, config.clone()))
	}

	#[instrument(name = "adapter::schema", level = "info", skip_all, fields(relations = def.relations.len()))]
	fn build(def: SchemaDef, mut open: impl FnMut(RelationDef) -> Result<ExternalRelation>) -> Result<Self> {
		let mut relations = IndexMap::with_capacity(def.relations.len());
		for relation in def.relations {
			if relations.contains_key(&relation.name) {
				return Err(Error::InvalidDefinition {
					name: relation.name.clone(),
					reason: "relation is defined twice".to_string(),
				});
			}
			let relation = open(relation)?;
			relations.insert(relation.def().name.clone(), Arc::new(relation));
		}
		info!(names = ?relations.keys().collect::<Vec<_>>(), "opened external schema");
		Ok(Self {
			relations,
		})
	}

	pub fn relation(&self, name: &str) -> Option<&Arc<ExternalRelation>> {
		self.relations.get(name)
	}

	pub fn names(&self) -> Vec<&str> {
		self.relations.keys().map(String::as_str).collect()
	}

	/// A scan of `name` in the external convention, restricted to
	/// `projection` when given.
	pub fn scan_node(&self, name: &str, projection: Option<&[&str]>) -> Result<ScanNode> {
		let relation = self
			.relations
			.get(name)
			.ok_or_else(|| Error::unsupported(name, "relation is not defined in this schema"))?;

		let projection = match projection {
			None => None,
			Some(names) => Some(relation.shape().project(names).ok_or_else(|| {
				Error::unsupported(name, format!("projection {:?} names unknown fields", names))
			})?),
		};
		let table: Arc<dyn Table> = relation.clone();
		Ok(ScanNode::create(PlanContext::external(), table, projection))
	}

	/// An executor over every relation of this schema.
	pub fn executor(&self) -> LocalExecutor {
		LocalExecutor::new(self.relations.values().cloned())
	}

	/// Shape of `name`, when defined.
	pub fn shape(&self, name: &str) -> Option<&RowShape> {
		self.relations.get(name).map(|relation| relation.shape())
	}
}
