use std::marker::PhantomData;

use super::entity::{Entity, ForeignKey};
use super::{Database, RepositoryError, postgres};

/// CRUD access to one entity type, dispatched to the active backend.
pub struct Repository<'a, E> {
    db: &'a Database,
    entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> Repository<'a, E> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    /// Every row, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    pub async fn list(&self) -> Result<Vec<E>, RepositoryError> {
        match self.db {
            Database::Postgres(pool) => postgres::list(pool).await,
            Database::Memory(store) => store.list().await,
        }
    }

    /// One row by id, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    pub async fn get(&self, id: E::Id) -> Result<Option<E>, RepositoryError> {
        match self.db {
            Database::Postgres(pool) => postgres::get(pool, id).await,
            Database::Memory(store) => store.get(id).await,
        }
    }

    /// Rows whose `key` column matches any of `parent_ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    pub async fn list_by_parent(
        &self,
        key: ForeignKey,
        parent_ids: &[i32],
    ) -> Result<Vec<E>, RepositoryError> {
        match self.db {
            Database::Postgres(pool) => postgres::list_by_parent(pool, key, parent_ids).await,
            Database::Memory(store) => store.list_by_parent(key, parent_ids).await,
        }
    }

    /// Insert a row; the returned copy carries the key the store assigned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if a referenced parent is missing.
    pub async fn add(&self, entity: E) -> Result<E, RepositoryError> {
        tracing::debug!(table = E::TABLE, "inserting row");
        match self.db {
            Database::Postgres(pool) => postgres::insert(pool, &entity).await,
            Database::Memory(store) => store.insert(entity).await,
        }
    }

    /// Replace the row with the same id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has that id, or
    /// `RepositoryError::ForeignKey` if a referenced parent is missing.
    pub async fn update(&self, entity: E) -> Result<E, RepositoryError> {
        tracing::debug!(table = E::TABLE, id = %entity.id(), "updating row");
        match self.db {
            Database::Postgres(pool) => postgres::update(pool, &entity).await,
            Database::Memory(store) => store.update(entity).await,
        }
    }

    /// Delete by id. Returns `false` when nothing was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    pub async fn delete(&self, id: E::Id) -> Result<bool, RepositoryError> {
        tracing::debug!(table = E::TABLE, %id, "deleting row");
        match self.db {
            Database::Postgres(pool) => postgres::delete::<E>(pool, id).await,
            Database::Memory(store) => store.delete::<E>(id).await,
        }
    }
}
