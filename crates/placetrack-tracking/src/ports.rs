//! Collaborators the pipeline depends on.
//!
//! The Postgres-backed [`PgStore`](crate::PgStore) implements every
//! repository trait; tests substitute in-memory fakes.

use std::future::Future;

use placetrack_core::{
    NewRankingObservation, NewReview, Place, RankingObservation, Review, TrackedKeyword,
};
use placetrack_scraper::{ExtractionError, RankingScrape, RawReview};

use crate::error::TrackingError;

pub trait PlaceRepository: Send + Sync {
    fn find_place(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Place>, TrackingError>> + Send;

    fn list_active_places(&self) -> impl Future<Output = Result<Vec<Place>, TrackingError>> + Send;
}

pub trait TrackedKeywordRepository: Send + Sync {
    /// Loads the association together with its place's external id.
    fn find_tracked_keyword(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<TrackedKeyword>, TrackingError>> + Send;

    /// Active associations whose place is also active.
    fn list_active_tracked_keywords(
        &self,
    ) -> impl Future<Output = Result<Vec<TrackedKeyword>, TrackingError>> + Send;
}

pub trait RankingRepository: Send + Sync {
    fn save_observation(
        &self,
        observation: &NewRankingObservation,
    ) -> impl Future<Output = Result<RankingObservation, TrackingError>> + Send;
}

pub trait ReviewRepository: Send + Sync {
    fn find_review_by_external_id(
        &self,
        external_id: &str,
    ) -> impl Future<Output = Result<Option<Review>, TrackingError>> + Send;

    /// Inserts one review. A stored review with the same external id yields
    /// [`TrackingError::DuplicateReview`].
    fn save_review(
        &self,
        review: &NewReview,
    ) -> impl Future<Output = Result<Review, TrackingError>> + Send;
}

/// The scraping capability the orchestrators drive.
pub trait Extractor: Send + Sync {
    fn scrape_ranking(
        &self,
        keyword: &str,
        region: Option<&str>,
        target_external_id: &str,
    ) -> impl Future<Output = Result<RankingScrape, ExtractionError>> + Send;

    fn scrape_reviews(
        &self,
        target_external_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawReview>, ExtractionError>> + Send;
}
