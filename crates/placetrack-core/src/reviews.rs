use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewKind {
    /// Long-form write-ups such as blog posts.
    Editorial,
    /// Short reviews left by verified visitors.
    Visitor,
    #[default]
    Other,
}

impl ReviewKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewKind::Editorial => "editorial",
            ReviewKind::Visitor => "visitor",
            ReviewKind::Other => "other",
        }
    }

    /// Map a raw marker scraped from the page (a class name, data attribute,
    /// or tab label) to a review kind.
    ///
    /// Matching is by keyword and case-insensitive. Returns `None` when the
    /// marker is blank so callers can tell "no marker" from "unrecognised".
    #[must_use]
    pub fn classify(marker: &str) -> Option<Self> {
        let lower = marker.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if ["editorial", "blog", "블로그", "cafe"]
            .iter()
            .any(|k| lower.contains(k))
        {
            return Some(ReviewKind::Editorial);
        }
        if ["visitor", "receipt", "방문자", "영수증"]
            .iter()
            .any(|k| lower.contains(k))
        {
            return Some(ReviewKind::Visitor);
        }
        Some(ReviewKind::Other)
    }
}

impl std::fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editorial" => Ok(ReviewKind::Editorial),
            "visitor" => Ok(ReviewKind::Visitor),
            "other" => Ok(ReviewKind::Other),
            other => Err(format!("unknown review kind: {other}")),
        }
    }
}

/// A review ingested from the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub place_id: i64,
    /// The platform's review id. Unique across all reviews when present.
    pub external_id: Option<String>,
    pub kind: ReviewKind,
    pub text: Option<String>,
    pub rating: Option<i16>,
    pub author: Option<String>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<Decimal>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewReview {
    pub place_id: i64,
    pub external_id: Option<String>,
    pub kind: ReviewKind,
    pub text: Option<String>,
    pub rating: Option<i16>,
    pub author: Option<String>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<Decimal>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Summary of one review-scrape batch for a place.
///
/// `scraped_count` always equals `saved_count + duplicate_count + failed_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeBatchResult {
    pub place_id: i64,
    pub scraped_count: usize,
    pub saved_count: usize,
    pub duplicate_count: usize,
    pub failed_count: usize,
    pub execution_time_ms: i64,
    pub scraped_at: DateTime<Utc>,
}
