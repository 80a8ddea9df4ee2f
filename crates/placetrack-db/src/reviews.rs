//! Database operations for the `reviews` table.

use chrono::{DateTime, Utc};
use placetrack_core::{NewReview, Review, ReviewKind};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub place_id: i64,
    pub external_id: Option<String>,
    pub kind: String,
    pub text: Option<String>,
    pub rating: Option<i16>,
    pub author: Option<String>,
    pub sentiment_label: Option<String>,
    /// `NUMERIC(6,3)` in the schema.
    pub sentiment_score: Option<Decimal>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = DbError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<ReviewKind>()
            .map_err(|reason| DbError::InvalidRow {
                table: "reviews",
                id: row.id,
                reason,
            })?;
        Ok(Review {
            id: row.id,
            place_id: row.place_id,
            external_id: row.external_id,
            kind,
            text: row.text,
            rating: row.rating,
            author: row.author,
            sentiment_label: row.sentiment_label,
            sentiment_score: row.sentiment_score,
            published_at: row.published_at,
            created_at: row.created_at,
        })
    }
}

const REVIEW_COLUMNS: &str = "id, place_id, external_id, kind, text, rating, author, \
     sentiment_label, sentiment_score, published_at, created_at";

/// Returns the review carrying the platform id `external_id`, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_review_by_external_id(
    pool: &PgPool,
    external_id: &str,
) -> Result<Option<ReviewRow>, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE external_id = $1"
    ))
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts one review and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::UniqueViolation`] if a review with the same
/// `external_id` already exists, or [`DbError::Sqlx`] if the insert fails.
pub async fn insert_review(pool: &PgPool, review: &NewReview) -> Result<ReviewRow, DbError> {
    sqlx::query_as::<_, ReviewRow>(&format!(
        "INSERT INTO reviews \
             (place_id, external_id, kind, text, rating, author, \
              sentiment_label, sentiment_score, published_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(review.place_id)
    .bind(review.external_id.as_deref())
    .bind(review.kind.as_str())
    .bind(review.text.as_deref())
    .bind(review.rating)
    .bind(review.author.as_deref())
    .bind(review.sentiment_label.as_deref())
    .bind(review.sentiment_score)
    .bind(review.published_at)
    .fetch_one(pool)
    .await
    .map_err(DbError::from_write)
}

/// Lists reviews for a place, most recently published first.
///
/// Reviews without a publish timestamp sort after dated ones.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews_by_place(
    pool: &PgPool,
    place_id: i64,
    limit: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE place_id = $1 \
         ORDER BY published_at DESC NULLS LAST, id DESC \
         LIMIT $2"
    ))
    .bind(place_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
