//! The contract every persisted resource implements.
//!
//! An [`Entity`] describes its table, its non-key columns and how to turn
//! itself into bind values. That is all the generic [`super::Repository`]
//! needs to run the five CRUD operations against either backend.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres};

/// Surrogate key of an entity: one of the `define_id!` newtypes.
pub trait EntityKey:
    Copy + Send + Sync + Display + From<i32> + Into<i32> + PartialEq + 'static
{
}

impl<T> EntityKey for T where
    T: Copy + Send + Sync + Display + From<i32> + Into<i32> + PartialEq + 'static
{
}

/// A persisted resource with an `id` key column.
pub trait Entity:
    Clone + Send + Sync + Unpin + Serialize + DeserializeOwned + for<'r> FromRow<'r, PgRow> + 'static
{
    /// Key type.
    type Id: EntityKey;

    /// Unqualified table name.
    const TABLE: &'static str;

    /// Non-key columns, in the order [`Entity::values`] yields them.
    const COLUMNS: &'static [&'static str];

    /// Current key. Zero for a record that was never stored.
    fn id(&self) -> Self::Id;

    /// Same record under a different key.
    #[must_use]
    fn with_id(self, id: Self::Id) -> Self;

    /// Bind values for [`Entity::COLUMNS`].
    fn values(&self) -> Vec<SqlValue>;

    /// Parent rows this record points at.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// A foreign-key column and the table it points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub table: &'static str,
}

impl ForeignKey {
    #[must_use]
    pub const fn new(column: &'static str, table: &'static str) -> Self {
        Self { column, table }
    }

    /// The concrete reference held by one row.
    #[must_use]
    pub fn to(self, id: impl Into<i32>) -> Reference {
        Reference {
            key: self,
            id: id.into(),
        }
    }
}

/// One row's value for a [`ForeignKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub key: ForeignKey,
    pub id: i32,
}

/// A column value ready to be bound into a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i32),
    Text(String),
    Decimal(Decimal),
}

impl SqlValue {
    /// Bind as the next item of a comma-separated list.
    pub(crate) fn push_bind(self, list: &mut Separated<'_, '_, Postgres, &'static str>) {
        match self {
            Self::Int(v) => list.push_bind(v),
            Self::Text(v) => list.push_bind(v),
            Self::Decimal(v) => list.push_bind(v),
        };
    }

    /// Bind right after the SQL already pushed, without a separator.
    pub(crate) fn push_bind_unseparated(
        self,
        list: &mut Separated<'_, '_, Postgres, &'static str>,
    ) {
        match self {
            Self::Int(v) => list.push_bind_unseparated(v),
            Self::Text(v) => list.push_bind_unseparated(v),
            Self::Decimal(v) => list.push_bind_unseparated(v),
        };
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}
