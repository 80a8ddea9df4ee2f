//! Tracking ingestion pipeline: recorders, scrape orchestrators and sweeps.
//!
//! Everything here is generic over the collaborator traits in [`ports`], with
//! [`PgStore`] and [`placetrack_scraper::PlaceScraper`] as the production
//! implementations.

pub mod error;
pub mod ports;
pub mod ranking_recorder;
pub mod review_recorder;
pub mod scrape_ranking;
pub mod scrape_reviews;
pub mod sweep;

mod extractor;
mod pg;

pub use error::{ErrorKind, TrackingError};
pub use pg::PgStore;
pub use ports::{
    Extractor, PlaceRepository, RankingRepository, ReviewRepository, TrackedKeywordRepository,
};
pub use ranking_recorder::RankingRecorder;
pub use review_recorder::ReviewRecorder;
pub use scrape_ranking::ScrapeRanking;
pub use scrape_reviews::{RecordOutcome, ScrapeReviews};
pub use sweep::{sweep_rankings, sweep_reviews, SweepReport};
