//! Shared domain types and configuration for placetrack.

mod app_config;
mod clock;
mod config;
mod places;
mod reviews;

pub use app_config::{AppConfig, Environment};
pub use clock::{Clock, SystemClock};
pub use config::{load_app_config, load_app_config_from_env};
pub use places::{
    NewRankingObservation, Place, RankingObservation, RankingScrapeResult, TrackedKeyword,
};
pub use reviews::{NewReview, Review, ReviewKind, ScrapeBatchResult, MAX_RATING, MIN_RATING};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
