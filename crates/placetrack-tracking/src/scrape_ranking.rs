use placetrack_core::{Clock, RankingScrapeResult};

use crate::error::TrackingError;
use crate::ports::{Extractor, RankingRepository, TrackedKeywordRepository};
use crate::ranking_recorder::RankingRecorder;

/// Scrapes and records the current rank for one tracked keyword.
pub struct ScrapeRanking<'a, S, E, C> {
    store: &'a S,
    extractor: &'a E,
    clock: &'a C,
}

impl<'a, S, E, C> ScrapeRanking<'a, S, E, C>
where
    S: TrackedKeywordRepository + RankingRepository,
    E: Extractor,
    C: Clock,
{
    #[must_use]
    pub fn new(store: &'a S, extractor: &'a E, clock: &'a C) -> Self {
        Self {
            store,
            extractor,
            clock,
        }
    }

    /// Runs one scrape for `tracked_keyword_id` and records the observation.
    ///
    /// Nothing is stored unless every step succeeds.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::TrackedKeywordNotFound`] if the association does not exist.
    /// - [`TrackingError::InactiveTrackedKeyword`] if it is inactive.
    /// - [`TrackingError::MissingPlaceExternalId`] / [`TrackingError::MissingKeywordText`]
    ///   when there is nothing to search with.
    /// - [`TrackingError::Extraction`] if the scrape fails.
    /// - Any recorder failure, unchanged.
    pub async fn execute(&self, tracked_keyword_id: i64) -> Result<RankingScrapeResult, TrackingError> {
        let tracked = self
            .store
            .find_tracked_keyword(tracked_keyword_id)
            .await?
            .ok_or(TrackingError::TrackedKeywordNotFound(tracked_keyword_id))?;

        if !tracked.active {
            return Err(TrackingError::InactiveTrackedKeyword(tracked_keyword_id));
        }
        let target = tracked
            .place_external_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(TrackingError::MissingPlaceExternalId(tracked.place_id))?;
        let keyword = tracked
            .keyword
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TrackingError::MissingKeywordText(tracked_keyword_id))?;

        let scrape = self
            .extractor
            .scrape_ranking(keyword, tracked.region.as_deref(), target)
            .await?;
        let observed_at = self.clock.now();

        let observation = RankingRecorder::new(self.store)
            .record(tracked_keyword_id, scrape.rank, scrape.result_count, observed_at)
            .await?;

        tracing::info!(
            tracked_keyword_id,
            keyword,
            found = scrape.found,
            rank = scrape.rank,
            result_count = scrape.result_count,
            observation_id = observation.id,
            "ranking recorded"
        );

        Ok(RankingScrapeResult {
            tracked_keyword_id,
            rank: scrape.rank,
            result_count: scrape.result_count,
            found: scrape.found,
            observed_at,
            ranking_observation_id: observation.id,
        })
    }
}
