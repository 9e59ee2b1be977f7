//! Persistence for the Ecosave resources.
//!
//! # Database: `ecosave` schema
//!
//! ## Tables
//!
//! - `users` - Account holders
//! - `addresses` - Postal addresses, owned by a user
//! - `rooms` - Rooms devices are installed in
//! - `devices` - Appliances, owned by a user and placed in a room
//! - `consumption_records` - Energy/cost readings, owned by a device
//! - `loyalty_points` - Reward points, owned by a user
//!
//! Every child references its parent with `ON DELETE CASCADE`.
//!
//! # Backends
//!
//! [`Database`] is either a `PostgreSQL` pool or an in-process [`MemoryStore`]
//! that enforces the same foreign-key and cascade rules. All access goes
//! through the generic [`Repository`]; the user aggregate is assembled by
//! [`UserRepository`] according to a [`FetchPlan`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p ecosave-cli -- migrate
//! ```

pub mod entity;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::StorageConfig;

pub use entity::{Entity, ForeignKey, Reference, SqlValue};
pub use memory::MemoryStore;
pub use repository::Repository;
pub use users::{FetchPlan, Relation, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A foreign key points at a row that does not exist.
    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    /// The store rejected a value (out of range, bad encoding).
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Storage backend shared by every request.
///
/// Cloning is cheap: both variants are handles to shared state.
#[derive(Clone)]
pub enum Database {
    /// `PostgreSQL` connection pool.
    Postgres(PgPool),
    /// In-process store.
    Memory(MemoryStore),
}

impl Database {
    /// Open the backend described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the `PostgreSQL` pool cannot be established.
    pub async fn connect(storage: &StorageConfig) -> Result<Self, sqlx::Error> {
        match storage {
            StorageConfig::Postgres { database_url } => {
                create_pool(database_url).await.map(Self::Postgres)
            }
            StorageConfig::Memory => Ok(Self::Memory(MemoryStore::new())),
        }
    }

    /// Check that the backend answers queries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if `PostgreSQL` is unreachable.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(pool) => postgres::ping(pool).await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// Short name of the backend, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
