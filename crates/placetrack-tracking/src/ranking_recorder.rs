use chrono::{DateTime, Utc};
use placetrack_core::{NewRankingObservation, RankingObservation};

use crate::error::TrackingError;
use crate::ports::{RankingRepository, TrackedKeywordRepository};

/// Persists one ranking observation for an active tracked keyword.
pub struct RankingRecorder<'a, S> {
    store: &'a S,
}

impl<'a, S> RankingRecorder<'a, S>
where
    S: TrackedKeywordRepository + RankingRepository,
{
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Records `rank`/`result_count` as observed at `observed_at`.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::TrackedKeywordNotFound`] if the association does not exist.
    /// - [`TrackingError::InactiveTrackedKeyword`] if it has been deactivated.
    /// - [`TrackingError::InvalidRank`] if `rank` is present but not positive.
    /// - Any store failure, unchanged.
    pub async fn record(
        &self,
        tracked_keyword_id: i64,
        rank: Option<i32>,
        result_count: Option<i32>,
        observed_at: DateTime<Utc>,
    ) -> Result<RankingObservation, TrackingError> {
        let tracked = self
            .store
            .find_tracked_keyword(tracked_keyword_id)
            .await?
            .ok_or(TrackingError::TrackedKeywordNotFound(tracked_keyword_id))?;

        if !tracked.active {
            return Err(TrackingError::InactiveTrackedKeyword(tracked_keyword_id));
        }
        if let Some(rank) = rank.filter(|r| *r <= 0) {
            return Err(TrackingError::InvalidRank(rank));
        }

        let observation = self
            .store
            .save_observation(&NewRankingObservation {
                tracked_keyword_id,
                rank,
                result_count,
                observed_at,
            })
            .await?;

        tracing::debug!(
            tracked_keyword_id,
            observation_id = observation.id,
            rank,
            "ranking observation recorded"
        );
        Ok(observation)
    }
}
