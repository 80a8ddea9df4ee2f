//! Database operations for the `places` table.

use chrono::{DateTime, Utc};
use placetrack_core::Place;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `places` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaceRow {
    pub id: i64,
    pub name: String,
    pub external_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Place {
            id: row.id,
            name: row.name,
            external_id: row.external_id,
            active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Returns a place by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_place(pool: &PgPool, id: i64) -> Result<Option<PlaceRow>, DbError> {
    let row = sqlx::query_as::<_, PlaceRow>(
        "SELECT id, name, external_id, is_active, created_at, updated_at \
         FROM places \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns all active places, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_places(pool: &PgPool) -> Result<Vec<PlaceRow>, DbError> {
    let rows = sqlx::query_as::<_, PlaceRow>(
        "SELECT id, name, external_id, is_active, created_at, updated_at \
         FROM places \
         WHERE is_active = true \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a new active place and returns the created row.
///
/// # Errors
///
/// Returns [`DbError::UniqueViolation`] if another place already uses
/// `external_id`, or [`DbError::Sqlx`] if the insert fails.
pub async fn insert_place(
    pool: &PgPool,
    name: &str,
    external_id: Option<&str>,
) -> Result<PlaceRow, DbError> {
    sqlx::query_as::<_, PlaceRow>(
        "INSERT INTO places (name, external_id) \
         VALUES ($1, $2) \
         RETURNING id, name, external_id, is_active, created_at, updated_at",
    )
    .bind(name)
    .bind(external_id)
    .fetch_one(pool)
    .await
    .map_err(DbError::from_write)
}
