//! `PostgreSQL` implementation of the generic CRUD operations.
//!
//! Statements are assembled from [`Entity::TABLE`] and [`Entity::COLUMNS`]
//! with `QueryBuilder`, so every value travels as a bind parameter.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::RepositoryError;
use super::entity::{Entity, ForeignKey};

const SCHEMA: &str = "ecosave";

fn select_list<E: Entity>() -> String {
    let mut columns = Vec::with_capacity(E::COLUMNS.len() + 1);
    columns.push("id");
    columns.extend_from_slice(E::COLUMNS);
    columns.join(", ")
}

/// SQLSTATE class 22: the statement was fine, a bound value was not.
fn is_data_exception(code: &str) -> bool {
    code.starts_with("22")
}

/// Translate constraint and data failures into domain errors.
fn map_write_error(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_error) = error {
        if db_error.is_foreign_key_violation() {
            return RepositoryError::ForeignKey(
                db_error.constraint().unwrap_or("unknown constraint").to_string(),
            );
        }
        if db_error.code().is_some_and(|code| is_data_exception(&code)) {
            return RepositoryError::InvalidData(db_error.message().to_string());
        }
    }
    RepositoryError::Database(error)
}

pub async fn ping(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn list<E: Entity>(pool: &PgPool) -> Result<Vec<E>, RepositoryError> {
    let sql = format!(
        "SELECT {} FROM {SCHEMA}.{} ORDER BY id",
        select_list::<E>(),
        E::TABLE
    );
    Ok(sqlx::query_as::<_, E>(&sql).fetch_all(pool).await?)
}

pub async fn get<E: Entity>(pool: &PgPool, id: E::Id) -> Result<Option<E>, RepositoryError> {
    let sql = format!(
        "SELECT {} FROM {SCHEMA}.{} WHERE id = $1",
        select_list::<E>(),
        E::TABLE
    );
    let id: i32 = id.into();
    Ok(sqlx::query_as::<_, E>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// All rows whose `key` column holds one of `parent_ids`, in one round trip.
pub async fn list_by_parent<E: Entity>(
    pool: &PgPool,
    key: ForeignKey,
    parent_ids: &[i32],
) -> Result<Vec<E>, RepositoryError> {
    if parent_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {} FROM {SCHEMA}.{} WHERE {} = ANY($1) ORDER BY id",
        select_list::<E>(),
        E::TABLE,
        key.column
    );
    Ok(sqlx::query_as::<_, E>(&sql)
        .bind(parent_ids)
        .fetch_all(pool)
        .await?)
}

pub async fn insert<E: Entity>(pool: &PgPool, entity: &E) -> Result<E, RepositoryError> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "INSERT INTO {SCHEMA}.{} ({}) VALUES (",
        E::TABLE,
        E::COLUMNS.join(", ")
    ));
    {
        let mut values = builder.separated(", ");
        for value in entity.values() {
            value.push_bind(&mut values);
        }
    }
    builder.push(format!(") RETURNING {}", select_list::<E>()));

    builder
        .build_query_as::<E>()
        .fetch_one(pool)
        .await
        .map_err(map_write_error)
}

pub async fn update<E: Entity>(pool: &PgPool, entity: &E) -> Result<E, RepositoryError> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("UPDATE {SCHEMA}.{} SET ", E::TABLE));
    {
        let mut assignments = builder.separated(", ");
        for (column, value) in E::COLUMNS.iter().zip(entity.values()) {
            assignments.push(format!("{column} = "));
            value.push_bind_unseparated(&mut assignments);
        }
    }
    let id: i32 = entity.id().into();
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" RETURNING {}", select_list::<E>()));

    builder
        .build_query_as::<E>()
        .fetch_optional(pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)
}

/// Delete one row; children go with it through `ON DELETE CASCADE`.
pub async fn delete<E: Entity>(pool: &PgPool, id: E::Id) -> Result<bool, RepositoryError> {
    let sql = format!("DELETE FROM {SCHEMA}.{} WHERE id = $1", E::TABLE);
    let id: i32 = id.into();
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_exception_codes() {
        // numeric_value_out_of_range, character_not_in_repertoire
        assert!(is_data_exception("22003"));
        assert!(is_data_exception("22021"));
        // foreign_key_violation, unique_violation
        assert!(!is_data_exception("23503"));
        assert!(!is_data_exception("23505"));
    }

    #[test]
    fn test_non_database_error_stays_internal() {
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
    }
}
