//! Entity metadata: mapped tables, their ordered columns and key columns.

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_newtype_string;
use crate::sql_utils::{validate_column, validate_table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

define_newtype_string! {
    /// Logical identifier of a mapped entity (e.g. `users`, `users_work`).
    pub struct EntityId;
}

/// Entity definition as written in the job file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDef {
    /// Schema-qualified table name
    pub table: String,

    /// Columns in declaration order
    pub columns: Vec<String>,

    /// Key (primary key) columns
    #[serde(default)]
    pub keys: Vec<String>,
}

/// A mapped table resolved from entity metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntity {
    /// Logical id this entity was registered under
    pub id: EntityId,

    /// Schema-qualified table name
    pub table: String,

    /// Columns in declaration order.
    ///
    /// INSERT statements list columns in exactly this order and rely on the
    /// source query projecting them positionally.
    pub columns: Vec<String>,

    /// Key column names, always a subset of `columns`
    pub keys: Vec<String>,
}

impl TableEntity {
    /// Build and validate a table entity.
    pub fn new(
        id: EntityId,
        table: impl Into<String>,
        columns: Vec<String>,
        keys: Vec<String>,
    ) -> CoreResult<Self> {
        let table = table.into();
        validate_table(&table)?;

        if columns.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: format!("Entity '{}' declares no columns", id),
            });
        }

        let mut seen = HashSet::new();
        for column in &columns {
            validate_column(column)?;
            if !seen.insert(column.to_ascii_lowercase()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Entity '{}' declares column '{}' twice", id, column),
                });
            }
        }

        for key in &keys {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(key)) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Key column '{}' of entity '{}' is not one of its columns",
                        key, id
                    ),
                });
            }
        }

        Ok(Self {
            id,
            table,
            columns,
            keys,
        })
    }

    /// Whether `column` is a key column (case-insensitive).
    pub fn is_key(&self, column: &str) -> bool {
        self.keys.iter().any(|k| k.eq_ignore_ascii_case(column))
    }
}

/// Source of entity metadata consumed by the transfer engine.
pub trait EntityCatalog: Send + Sync {
    /// Resolve a logical entity id to its mapped table.
    ///
    /// Ids without a mapping fail with [`CoreError::UnmappedEntity`].
    fn resolve(&self, id: &str) -> CoreResult<&TableEntity>;
}

/// Entity catalog built from the `entities` section of a job file
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityId, TableEntity>,
}

impl EntityRegistry {
    /// Validate every definition and build the registry.
    pub fn from_defs(defs: &BTreeMap<EntityId, EntityDef>) -> CoreResult<Self> {
        let mut entities = BTreeMap::new();
        for (id, def) in defs {
            let entity = TableEntity::new(
                id.clone(),
                def.table.clone(),
                def.columns.clone(),
                def.keys.clone(),
            )?;
            entities.insert(id.clone(), entity);
        }
        log::debug!("Registered {} entities", entities.len());
        Ok(Self { entities })
    }

    /// Number of mapped entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is mapped.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityCatalog for EntityRegistry {
    fn resolve(&self, id: &str) -> CoreResult<&TableEntity> {
        self.entities
            .get(id)
            .ok_or_else(|| CoreError::UnmappedEntity {
                entity: id.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "entity_test.rs"]
mod tests;
