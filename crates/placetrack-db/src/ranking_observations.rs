//! Database operations for the append-only `ranking_observations` table.

use chrono::{DateTime, Utc};
use placetrack_core::{NewRankingObservation, RankingObservation};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `ranking_observations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankingObservationRow {
    pub id: i64,
    pub place_keyword_id: i64,
    pub rank: Option<i32>,
    pub result_count: Option<i32>,
    pub observed_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl From<RankingObservationRow> for RankingObservation {
    fn from(row: RankingObservationRow) -> Self {
        RankingObservation {
            id: row.id,
            tracked_keyword_id: row.place_keyword_id,
            rank: row.rank,
            result_count: row.result_count,
            observed_at: row.observed_at,
            recorded_at: row.recorded_at,
        }
    }
}

/// Inserts one ranking observation and returns the stored row.
///
/// Observations are never updated; every call produces a new row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_ranking_observation(
    pool: &PgPool,
    observation: &NewRankingObservation,
) -> Result<RankingObservationRow, DbError> {
    sqlx::query_as::<_, RankingObservationRow>(
        "INSERT INTO ranking_observations \
             (place_keyword_id, rank, result_count, observed_at) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, place_keyword_id, rank, result_count, observed_at, recorded_at",
    )
    .bind(observation.tracked_keyword_id)
    .bind(observation.rank)
    .bind(observation.result_count)
    .bind(observation.observed_at)
    .fetch_one(pool)
    .await
    .map_err(DbError::from_write)
}

/// Lists observations for a tracked keyword, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ranking_observations(
    pool: &PgPool,
    place_keyword_id: i64,
    limit: i64,
) -> Result<Vec<RankingObservationRow>, DbError> {
    let rows = sqlx::query_as::<_, RankingObservationRow>(
        "SELECT id, place_keyword_id, rank, result_count, observed_at, recorded_at \
         FROM ranking_observations \
         WHERE place_keyword_id = $1 \
         ORDER BY observed_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(place_keyword_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
