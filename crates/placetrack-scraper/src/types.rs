use chrono::{DateTime, Utc};
use placetrack_core::ReviewKind;

/// Where a place sits in the search results for one keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingScrape {
    /// 1-based position among counted results; `None` when not found.
    pub rank: Option<i32>,
    /// Total result count as reported by the page, when it reports one.
    pub result_count: Option<i32>,
    pub found: bool,
}

impl RankingScrape {
    #[must_use]
    pub fn not_found(result_count: Option<i32>) -> Self {
        Self {
            rank: None,
            result_count,
            found: false,
        }
    }
}

/// One review as scraped, before any validation.
///
/// Every field is optional: a field whose selector chain matched nothing is
/// left as `None` rather than failing the item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReview {
    pub external_id: Option<String>,
    pub kind: Option<ReviewKind>,
    pub text: Option<String>,
    pub rating: Option<i16>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}
