//! Sweeps over every active target.
//!
//! Targets run one after another; a failing target is logged and skipped so
//! the rest of the sweep still runs.

use placetrack_core::{Clock, RankingScrapeResult, ScrapeBatchResult};

use crate::error::TrackingError;
use crate::ports::{
    Extractor, PlaceRepository, RankingRepository, ReviewRepository, TrackedKeywordRepository,
};
use crate::scrape_ranking::ScrapeRanking;
use crate::scrape_reviews::ScrapeReviews;

/// Per-target results of a sweep. `failed` holds `(target id, error message)`.
#[derive(Debug)]
pub struct SweepReport<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<(i64, String)>,
}

impl<T> Default for SweepReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> SweepReport<T> {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// `true` when there was at least one target and every one failed.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

/// Scrapes the rank of every active tracked keyword on an active place.
///
/// # Errors
///
/// Returns an error only if the active keywords cannot be listed.
pub async fn sweep_rankings<S, E, C>(
    store: &S,
    extractor: &E,
    clock: &C,
) -> Result<SweepReport<RankingScrapeResult>, TrackingError>
where
    S: TrackedKeywordRepository + RankingRepository,
    E: Extractor,
    C: Clock,
{
    let keywords = store.list_active_tracked_keywords().await?;
    let orchestrator = ScrapeRanking::new(store, extractor, clock);
    let mut report = SweepReport::default();

    for tracked in keywords {
        match orchestrator.execute(tracked.id).await {
            Ok(result) => report.succeeded.push(result),
            Err(e) => {
                tracing::warn!(
                    tracked_keyword_id = tracked.id,
                    place_id = tracked.place_id,
                    error = %e,
                    "ranking scrape failed, skipping"
                );
                report.failed.push((tracked.id, e.to_string()));
            }
        }
    }

    tracing::info!(
        attempted = report.attempted(),
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "ranking sweep complete"
    );
    Ok(report)
}

/// Scrapes reviews for every active place using the default limit.
///
/// # Errors
///
/// Returns an error only if the active places cannot be listed.
pub async fn sweep_reviews<S, E, C>(
    store: &S,
    extractor: &E,
    clock: &C,
    default_limit: usize,
) -> Result<SweepReport<ScrapeBatchResult>, TrackingError>
where
    S: PlaceRepository + ReviewRepository,
    E: Extractor,
    C: Clock,
{
    let places = store.list_active_places().await?;
    let orchestrator = ScrapeReviews::new(store, extractor, clock, default_limit);
    let mut report = SweepReport::default();

    for place in places {
        match orchestrator.execute(place.id, None).await {
            Ok(batch) => report.succeeded.push(batch),
            Err(e) => {
                tracing::warn!(place_id = place.id, error = %e, "review scrape failed, skipping");
                report.failed.push((place.id, e.to_string()));
            }
        }
    }

    tracing::info!(
        attempted = report.attempted(),
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        saved = report.succeeded.iter().map(|b| b.saved_count).sum::<usize>(),
        "review sweep complete"
    );
    Ok(report)
}
