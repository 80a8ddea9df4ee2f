//! Review batch scraping: one extraction, then a sequential save loop that
//! keeps going when individual records fail.

use placetrack_core::{Clock, NewReview, ScrapeBatchResult};
use placetrack_scraper::RawReview;

use crate::error::{ErrorKind, TrackingError};
use crate::ports::{Extractor, PlaceRepository, ReviewRepository};
use crate::review_recorder::ReviewRecorder;

/// What happened to one scraped review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Saved,
    Duplicate,
    Failed(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    saved: usize,
    duplicate: usize,
    failed: usize,
}

impl Tally {
    fn add(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Saved => self.saved += 1,
            RecordOutcome::Duplicate => self.duplicate += 1,
            RecordOutcome::Failed(_) => self.failed += 1,
        }
    }
}

pub struct ScrapeReviews<'a, S, E, C> {
    store: &'a S,
    extractor: &'a E,
    clock: &'a C,
    default_limit: usize,
}

impl<'a, S, E, C> ScrapeReviews<'a, S, E, C>
where
    S: PlaceRepository + ReviewRepository,
    E: Extractor,
    C: Clock,
{
    /// `default_limit` applies when [`execute`](Self::execute) is called without one.
    #[must_use]
    pub fn new(store: &'a S, extractor: &'a E, clock: &'a C, default_limit: usize) -> Self {
        Self {
            store,
            extractor,
            clock,
            default_limit,
        }
    }

    /// Scrapes up to `limit` reviews for `place_id` and saves the new ones.
    ///
    /// Reviews whose external id is already stored count as duplicates.
    /// A failure saving one review is counted and logged and the loop moves on.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::PlaceNotFound`] if the place does not exist.
    /// - [`TrackingError::InactivePlace`] if it is inactive.
    /// - [`TrackingError::MissingPlaceExternalId`] if it has no listing id.
    /// - [`TrackingError::Extraction`] if the scrape itself fails.
    pub async fn execute(
        &self,
        place_id: i64,
        limit: Option<usize>,
    ) -> Result<ScrapeBatchResult, TrackingError> {
        let scraped_at = self.clock.now();

        let place = self
            .store
            .find_place(place_id)
            .await?
            .ok_or(TrackingError::PlaceNotFound(place_id))?;
        if !place.active {
            return Err(TrackingError::InactivePlace(place_id));
        }
        let external_id = place
            .external_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(TrackingError::MissingPlaceExternalId(place_id))?;

        let limit = limit.unwrap_or(self.default_limit);
        let scraped = self.extractor.scrape_reviews(external_id, limit).await?;

        let recorder = ReviewRecorder::new(self.store);
        let mut tally = Tally::default();
        for (index, raw) in scraped.iter().enumerate() {
            let outcome = self.save_one(&recorder, place_id, raw).await;
            if let RecordOutcome::Failed(reason) = &outcome {
                tracing::warn!(
                    place_id,
                    index,
                    external_id = raw.external_id.as_deref(),
                    reason = %reason,
                    "failed to save scraped review, continuing"
                );
            }
            tally.add(&outcome);
        }

        let result = ScrapeBatchResult {
            place_id,
            scraped_count: scraped.len(),
            saved_count: tally.saved,
            duplicate_count: tally.duplicate,
            failed_count: tally.failed,
            execution_time_ms: (self.clock.now() - scraped_at).num_milliseconds().max(0),
            scraped_at,
        };

        tracing::info!(
            place_id,
            scraped = result.scraped_count,
            saved = result.saved_count,
            duplicates = result.duplicate_count,
            failed = result.failed_count,
            elapsed_ms = result.execution_time_ms,
            "review batch complete"
        );
        Ok(result)
    }

    async fn save_one(
        &self,
        recorder: &ReviewRecorder<'_, S>,
        place_id: i64,
        raw: &RawReview,
    ) -> RecordOutcome {
        if let Some(external_id) = raw.external_id.as_deref() {
            match self.store.find_review_by_external_id(external_id).await {
                Ok(Some(_)) => return RecordOutcome::Duplicate,
                Ok(None) => {}
                Err(e) => return RecordOutcome::Failed(e.to_string()),
            }
        }

        let review = NewReview {
            place_id,
            external_id: raw.external_id.clone(),
            kind: raw.kind.unwrap_or_default(),
            text: raw.text.clone(),
            rating: raw.rating,
            author: raw.author.clone(),
            sentiment_label: None,
            sentiment_score: None,
            published_at: raw.published_at,
        };

        match recorder.record(review).await {
            Ok(_) => RecordOutcome::Saved,
            Err(e) if e.kind() == ErrorKind::Conflict => RecordOutcome::Duplicate,
            Err(e) => RecordOutcome::Failed(e.to_string()),
        }
    }
}
