use placetrack_db::DbError;
use placetrack_scraper::ExtractionError;
use thiserror::Error;

/// Coarse classification callers map to their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    BadRequest,
    Extraction,
    Internal,
}

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("place {0} not found")]
    PlaceNotFound(i64),

    #[error("tracked keyword {0} not found")]
    TrackedKeywordNotFound(i64),

    #[error("a review with external id {external_id} already exists")]
    DuplicateReview { external_id: String },

    #[error("place {0} is inactive")]
    InactivePlace(i64),

    #[error("tracked keyword {0} is inactive")]
    InactiveTrackedKeyword(i64),

    #[error("place {0} has no platform listing id")]
    MissingPlaceExternalId(i64),

    #[error("tracked keyword {0} has no keyword text")]
    MissingKeywordText(i64),

    #[error("a sentiment score is required when a sentiment label is given")]
    SentimentScoreRequired,

    #[error("rating {rating} is outside {min}..={max}")]
    RatingOutOfRange { rating: i16, min: i16, max: i16 },

    #[error("rank must be positive, got {0}")]
    InvalidRank(i32),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("database error: {0}")]
    Db(#[from] DbError),
}

impl TrackingError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PlaceNotFound(_) | Self::TrackedKeywordNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateReview { .. } => ErrorKind::Conflict,
            Self::InactivePlace(_)
            | Self::InactiveTrackedKeyword(_)
            | Self::MissingPlaceExternalId(_)
            | Self::MissingKeywordText(_)
            | Self::SentimentScoreRequired
            | Self::RatingOutOfRange { .. }
            | Self::InvalidRank(_) => ErrorKind::BadRequest,
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::Db(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_each_class() {
        assert_eq!(TrackingError::PlaceNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(
            TrackingError::DuplicateReview {
                external_id: "r1".into()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            TrackingError::InactiveTrackedKeyword(2).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            TrackingError::from(ExtractionError::NoDocument {
                url: "https://example.com".into()
            })
            .kind(),
            ErrorKind::Extraction
        );
        assert_eq!(
            TrackingError::from(DbError::NotFound).kind(),
            ErrorKind::Internal
        );
    }
}
