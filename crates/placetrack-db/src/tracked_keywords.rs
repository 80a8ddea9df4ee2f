//! Database operations for `keywords` and the `place_keywords` association.

use placetrack_core::TrackedKeyword;
use sqlx::PgPool;

use crate::DbError;

/// A `place_keywords` row joined with its keyword text and the owning
/// place's external id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackedKeywordRow {
    pub id: i64,
    pub place_id: i64,
    pub place_external_id: Option<String>,
    pub keyword: Option<String>,
    /// Empty string when the association has no region.
    pub region: String,
    pub is_active: bool,
}

impl From<TrackedKeywordRow> for TrackedKeyword {
    fn from(row: TrackedKeywordRow) -> Self {
        let region = Some(row.region).filter(|r| !r.trim().is_empty());
        let keyword = row.keyword.filter(|k| !k.trim().is_empty());
        TrackedKeyword {
            id: row.id,
            place_id: row.place_id,
            place_external_id: row.place_external_id,
            keyword,
            region,
            active: row.is_active,
        }
    }
}

const SELECT_TRACKED: &str = "SELECT pk.id, pk.place_id, p.external_id AS place_external_id, \
            k.text AS keyword, pk.region, pk.is_active \
     FROM place_keywords pk \
     JOIN places p ON p.id = pk.place_id \
     LEFT JOIN keywords k ON k.id = pk.keyword_id";

/// Returns a tracked keyword by association id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_tracked_keyword(
    pool: &PgPool,
    id: i64,
) -> Result<Option<TrackedKeywordRow>, DbError> {
    let row = sqlx::query_as::<_, TrackedKeywordRow>(&format!("{SELECT_TRACKED} WHERE pk.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Returns every active association whose place is also active.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_tracked_keywords(
    pool: &PgPool,
) -> Result<Vec<TrackedKeywordRow>, DbError> {
    let rows = sqlx::query_as::<_, TrackedKeywordRow>(&format!(
        "{SELECT_TRACKED} WHERE pk.is_active = true AND p.is_active = true ORDER BY pk.id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Starts tracking `keyword` (optionally within `region`) for a place.
///
/// The keyword text is upserted into `keywords`. An existing association for
/// the same place, keyword, and region is reactivated rather than duplicated.
/// Returns the association id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails (including a missing place).
pub async fn track_keyword(
    pool: &PgPool,
    place_id: i64,
    keyword: &str,
    region: Option<&str>,
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let keyword_id: i64 = sqlx::query_scalar(
        "INSERT INTO keywords (text) VALUES ($1) \
         ON CONFLICT (text) DO UPDATE SET text = EXCLUDED.text \
         RETURNING id",
    )
    .bind(keyword.trim())
    .fetch_one(&mut *tx)
    .await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO place_keywords (place_id, keyword_id, region) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (place_id, keyword_id, region) \
         DO UPDATE SET is_active = true, updated_at = NOW() \
         RETURNING id",
    )
    .bind(place_id)
    .bind(keyword_id)
    .bind(region.map(str::trim).unwrap_or_default())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

/// Activates or deactivates a tracked keyword.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no association has this id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_tracked_keyword_active(
    pool: &PgPool,
    id: i64,
    active: bool,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE place_keywords SET is_active = $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(active)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
