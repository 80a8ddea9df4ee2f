//! Read-only history listings.

use chrono::{DateTime, Utc};
use placetrack_core::Review;
use sqlx::PgPool;

fn fmt_ts(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || "\u{2014}".to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), |v| v.to_string())
}

/// Print up to `limit` ranking observations for a tracked keyword.
///
/// # Errors
///
/// Returns an error if the tracked keyword does not exist or a query fails.
pub(crate) async fn run_history_rankings(
    pool: &PgPool,
    keyword_id: i64,
    limit: i64,
) -> anyhow::Result<()> {
    let Some(tracked) = placetrack_db::get_tracked_keyword(pool, keyword_id).await? else {
        anyhow::bail!("tracked keyword {keyword_id} not found");
    };
    let rows = placetrack_db::list_ranking_observations(pool, keyword_id, limit).await?;

    if rows.is_empty() {
        println!(
            "no observations for keyword {keyword_id}; run `scrape ranking --keyword-id {keyword_id}` first"
        );
        return Ok(());
    }

    println!(
        "keyword {keyword_id}: \"{}\" {}",
        tracked.keyword.as_deref().unwrap_or_default(),
        tracked.region
    );
    println!("{:<18}{:<8}RESULTS", "OBSERVED", "RANK");
    for row in &rows {
        println!(
            "{:<18}{:<8}{}",
            fmt_ts(Some(row.observed_at)),
            fmt_opt(row.rank),
            fmt_opt(row.result_count)
        );
    }
    Ok(())
}

/// Print up to `limit` reviews for a place.
///
/// # Errors
///
/// Returns an error if a query fails or a stored row is malformed.
pub(crate) async fn run_history_reviews(
    pool: &PgPool,
    place_id: i64,
    limit: i64,
) -> anyhow::Result<()> {
    let rows = placetrack_db::list_reviews_by_place(pool, place_id, limit).await?;
    if rows.is_empty() {
        println!("no reviews for place {place_id}");
        return Ok(());
    }

    println!(
        "{:<18}{:<11}{:<8}{:<16}TEXT",
        "PUBLISHED", "KIND", "RATING", "AUTHOR"
    );
    for row in rows {
        let review = Review::try_from(row)?;
        let text = review.text.as_deref().unwrap_or_default();
        let text_display = if text.chars().count() > 50 {
            format!("{}...", text.chars().take(50).collect::<String>())
        } else {
            text.to_string()
        };
        println!(
            "{:<18}{:<11}{:<8}{:<16}{}",
            fmt_ts(review.published_at),
            review.kind.as_str(),
            fmt_opt(review.rating),
            review.author.as_deref().unwrap_or("\u{2014}"),
            text_display
        );
    }
    Ok(())
}
