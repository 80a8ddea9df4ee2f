use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked business listing on the search platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    /// The platform's listing id. Required before the place can be scraped.
    pub external_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// An association between a place and a search keyword, optionally
/// qualified by region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedKeyword {
    pub id: i64,
    pub place_id: i64,
    /// External id of the owning place, joined in at load time.
    pub place_external_id: Option<String>,
    pub keyword: Option<String>,
    pub region: Option<String>,
    pub active: bool,
}

/// One point-in-time search rank measurement. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingObservation {
    pub id: i64,
    pub tracked_keyword_id: i64,
    /// 1-based position, or `None` when the place was not in the results.
    pub rank: Option<i32>,
    pub result_count: Option<i32>,
    pub observed_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRankingObservation {
    pub tracked_keyword_id: i64,
    pub rank: Option<i32>,
    pub result_count: Option<i32>,
    pub observed_at: DateTime<Utc>,
}

/// Outcome of scraping and recording the rank for one tracked keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingScrapeResult {
    pub tracked_keyword_id: i64,
    pub rank: Option<i32>,
    pub result_count: Option<i32>,
    pub found: bool,
    pub observed_at: DateTime<Utc>,
    pub ranking_observation_id: i64,
}
