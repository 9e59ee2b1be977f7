//! In-process storage backend.
//!
//! Rows live in per-table ordered maps behind one `RwLock`. Keys come from a
//! per-table sequence starting at 1, foreign keys are checked on every write
//! and deletes cascade to children, mirroring the `PostgreSQL` schema.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::RepositoryError;
use super::entity::{Entity, ForeignKey, Reference};

struct StoredRow {
    references: Vec<Reference>,
    value: Box<dyn Any + Send + Sync>,
}

#[derive(Default)]
struct Tables {
    rows: HashMap<&'static str, BTreeMap<i32, StoredRow>>,
    sequences: HashMap<&'static str, i32>,
}

impl Tables {
    fn contains(&self, table: &str, id: i32) -> bool {
        self.rows.get(table).is_some_and(|rows| rows.contains_key(&id))
    }

    fn check_references(&self, references: &[Reference]) -> Result<(), RepositoryError> {
        for reference in references {
            if !self.contains(reference.key.table, reference.id) {
                return Err(RepositoryError::ForeignKey(format!(
                    "{} = {} has no matching row in {}",
                    reference.key.column, reference.id, reference.key.table
                )));
            }
        }
        Ok(())
    }

    fn next_id(&mut self, table: &'static str) -> i32 {
        let sequence = self.sequences.entry(table).or_insert(0);
        *sequence += 1;
        *sequence
    }

    fn store<E: Entity>(&mut self, entity: E) {
        let id: i32 = entity.id().into();
        let row = StoredRow {
            references: entity.references(),
            value: Box::new(entity),
        };
        self.rows.entry(E::TABLE).or_default().insert(id, row);
    }

    /// Remove a row and, transitively, every row that references it.
    fn remove_cascading(&mut self, table: &'static str, id: i32) -> bool {
        let removed = self
            .rows
            .get_mut(table)
            .and_then(|rows| rows.remove(&id))
            .is_some();
        if !removed {
            return false;
        }

        let mut pending = vec![(table, id)];
        while let Some((parent_table, parent_id)) = pending.pop() {
            for (child_table, rows) in &mut self.rows {
                let orphans: Vec<i32> = rows
                    .iter()
                    .filter(|(_, row)| {
                        row.references
                            .iter()
                            .any(|r| r.key.table == parent_table && r.id == parent_id)
                    })
                    .map(|(child_id, _)| *child_id)
                    .collect();
                for orphan in orphans {
                    rows.remove(&orphan);
                    pending.push((*child_table, orphan));
                }
            }
        }
        true
    }
}

fn downcast<E: Entity>(row: &StoredRow) -> Result<E, RepositoryError> {
    row.value.downcast_ref::<E>().cloned().ok_or_else(|| {
        RepositoryError::DataCorruption(format!("row in {} has an unexpected type", E::TABLE))
    })
}

/// Shared handle to the in-process tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .rows
            .get(E::TABLE)
            .map_or_else(|| Ok(Vec::new()), |rows| rows.values().map(downcast::<E>).collect())
    }

    pub async fn get<E: Entity>(&self, id: E::Id) -> Result<Option<E>, RepositoryError> {
        let id: i32 = id.into();
        let tables = self.tables.read().await;
        tables
            .rows
            .get(E::TABLE)
            .and_then(|rows| rows.get(&id))
            .map(downcast::<E>)
            .transpose()
    }

    pub async fn list_by_parent<E: Entity>(
        &self,
        key: ForeignKey,
        parent_ids: &[i32],
    ) -> Result<Vec<E>, RepositoryError> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.rows.get(E::TABLE) else {
            return Ok(Vec::new());
        };
        rows.values()
            .filter(|row| {
                row.references
                    .iter()
                    .any(|r| r.key == key && parent_ids.contains(&r.id))
            })
            .map(downcast::<E>)
            .collect()
    }

    /// Store a new row under the next key of its table. The caller's id is ignored.
    pub async fn insert<E: Entity>(&self, entity: E) -> Result<E, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_references(&entity.references())?;

        let id = tables.next_id(E::TABLE);
        let stored = entity.with_id(E::Id::from(id));
        tables.store(stored.clone());
        Ok(stored)
    }

    pub async fn update<E: Entity>(&self, entity: E) -> Result<E, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.contains(E::TABLE, entity.id().into()) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_references(&entity.references())?;

        tables.store(entity.clone());
        Ok(entity)
    }

    pub async fn delete<E: Entity>(&self, id: E::Id) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.remove_cascading(E::TABLE, id.into()))
    }
}
