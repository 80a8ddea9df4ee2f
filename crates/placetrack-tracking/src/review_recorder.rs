use placetrack_core::{NewReview, Review, MAX_RATING, MIN_RATING};

use crate::error::TrackingError;
use crate::ports::{PlaceRepository, ReviewRepository};

/// Persists one review after checking the place, uniqueness and field rules.
pub struct ReviewRecorder<'a, S> {
    store: &'a S,
}

impl<'a, S> ReviewRecorder<'a, S>
where
    S: PlaceRepository + ReviewRepository,
{
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Inserts `review`. A blank external id is stored as absent.
    ///
    /// A sentiment score without a label is accepted; a label without a
    /// score is not.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::PlaceNotFound`] if the place does not exist.
    /// - [`TrackingError::DuplicateReview`] if a review with the same external
    ///   id is already stored, including when a concurrent insert wins the race.
    /// - [`TrackingError::SentimentScoreRequired`] for a label without a score.
    /// - [`TrackingError::RatingOutOfRange`] for a rating outside 1..=5.
    /// - Any other store failure, unchanged.
    pub async fn record(&self, mut review: NewReview) -> Result<Review, TrackingError> {
        if self.store.find_place(review.place_id).await?.is_none() {
            return Err(TrackingError::PlaceNotFound(review.place_id));
        }

        review.external_id = review
            .external_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        if let Some(external_id) = review.external_id.as_deref() {
            if self
                .store
                .find_review_by_external_id(external_id)
                .await?
                .is_some()
            {
                return Err(TrackingError::DuplicateReview {
                    external_id: external_id.to_string(),
                });
            }
        }

        if review.sentiment_label.is_some() && review.sentiment_score.is_none() {
            return Err(TrackingError::SentimentScoreRequired);
        }
        if let Some(rating) = review.rating {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(TrackingError::RatingOutOfRange {
                    rating,
                    min: MIN_RATING,
                    max: MAX_RATING,
                });
            }
        }

        self.store.save_review(&review).await
    }
}
