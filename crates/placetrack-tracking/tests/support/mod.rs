//! In-memory collaborators for pipeline tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use placetrack_core::{
    Clock, NewRankingObservation, NewReview, Place, RankingObservation, Review, TrackedKeyword,
};
use placetrack_db::DbError;
use placetrack_scraper::{ExtractionError, RankingScrape, RawReview};
use placetrack_tracking::{
    Extractor, PlaceRepository, RankingRepository, ReviewRepository, TrackedKeywordRepository,
    TrackingError,
};

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct State {
    next_id: i64,
    places: Vec<Place>,
    keywords: Vec<TrackedKeyword>,
    observations: Vec<RankingObservation>,
    reviews: Vec<Review>,
    review_save_calls: usize,
    fail_review_saves: HashSet<usize>,
    skip_duplicate_lookup: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn add_place(&self, external_id: Option<&str>, active: bool) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.places.push(Place {
            id,
            name: format!("place {id}"),
            external_id: external_id.map(str::to_string),
            active,
            created_at: at(0),
        });
        id
    }

    pub fn add_keyword(
        &self,
        place_id: i64,
        keyword: Option<&str>,
        region: Option<&str>,
        active: bool,
    ) -> i64 {
        let mut state = self.state.lock().unwrap();
        let place_external_id = state
            .places
            .iter()
            .find(|p| p.id == place_id)
            .and_then(|p| p.external_id.clone());
        let id = state.next_id();
        state.keywords.push(TrackedKeyword {
            id,
            place_id,
            place_external_id,
            keyword: keyword.map(str::to_string),
            region: region.map(str::to_string),
            active,
        });
        id
    }

    pub fn seed_review(&self, place_id: i64, external_id: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.reviews.push(Review {
            id,
            place_id,
            external_id: Some(external_id.to_string()),
            kind: placetrack_core::ReviewKind::Visitor,
            text: None,
            rating: None,
            author: None,
            sentiment_label: None,
            sentiment_score: None,
            published_at: None,
            created_at: at(0),
        });
    }

    /// Make the `call`-th `save_review` call (0-based) fail with a database error.
    pub fn fail_review_save(&self, call: usize) {
        self.state.lock().unwrap().fail_review_saves.insert(call);
    }

    /// Report every external id as unseen, so only the insert can catch duplicates.
    pub fn hide_existing_reviews(&self) {
        self.state.lock().unwrap().skip_duplicate_lookup = true;
    }

    pub fn observations(&self) -> Vec<RankingObservation> {
        self.state.lock().unwrap().observations.clone()
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.state.lock().unwrap().reviews.clone()
    }

    pub fn review_save_calls(&self) -> usize {
        self.state.lock().unwrap().review_save_calls
    }
}

fn db_down() -> TrackingError {
    TrackingError::Db(DbError::Sqlx(sqlx::Error::PoolTimedOut))
}

impl PlaceRepository for MemoryStore {
    async fn find_place(&self, id: i64) -> Result<Option<Place>, TrackingError> {
        let state = self.state.lock().unwrap();
        Ok(state.places.iter().find(|p| p.id == id).cloned())
    }

    async fn list_active_places(&self) -> Result<Vec<Place>, TrackingError> {
        let state = self.state.lock().unwrap();
        Ok(state.places.iter().filter(|p| p.active).cloned().collect())
    }
}

impl TrackedKeywordRepository for MemoryStore {
    async fn find_tracked_keyword(&self, id: i64) -> Result<Option<TrackedKeyword>, TrackingError> {
        let state = self.state.lock().unwrap();
        Ok(state.keywords.iter().find(|k| k.id == id).cloned())
    }

    async fn list_active_tracked_keywords(&self) -> Result<Vec<TrackedKeyword>, TrackingError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .keywords
            .iter()
            .filter(|k| {
                k.active
                    && state
                        .places
                        .iter()
                        .any(|p| p.id == k.place_id && p.active)
            })
            .cloned()
            .collect())
    }
}

impl RankingRepository for MemoryStore {
    async fn save_observation(
        &self,
        observation: &NewRankingObservation,
    ) -> Result<RankingObservation, TrackingError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let stored = RankingObservation {
            id,
            tracked_keyword_id: observation.tracked_keyword_id,
            rank: observation.rank,
            result_count: observation.result_count,
            observed_at: observation.observed_at,
            recorded_at: observation.observed_at,
        };
        state.observations.push(stored.clone());
        Ok(stored)
    }
}

impl ReviewRepository for MemoryStore {
    async fn find_review_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Review>, TrackingError> {
        let state = self.state.lock().unwrap();
        if state.skip_duplicate_lookup {
            return Ok(None);
        }
        Ok(state
            .reviews
            .iter()
            .find(|r| r.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn save_review(&self, review: &NewReview) -> Result<Review, TrackingError> {
        let mut state = self.state.lock().unwrap();
        let call = state.review_save_calls;
        state.review_save_calls += 1;
        if state.fail_review_saves.contains(&call) {
            return Err(db_down());
        }
        if let Some(external_id) = review.external_id.as_deref() {
            if state
                .reviews
                .iter()
                .any(|r| r.external_id.as_deref() == Some(external_id))
            {
                return Err(TrackingError::DuplicateReview {
                    external_id: external_id.to_string(),
                });
            }
        }

        let id = state.next_id();
        let stored = Review {
            id,
            place_id: review.place_id,
            external_id: review.external_id.clone(),
            kind: review.kind,
            text: review.text.clone(),
            rating: review.rating,
            author: review.author.clone(),
            sentiment_label: review.sentiment_label.clone(),
            sentiment_score: review.sentiment_score,
            published_at: review.published_at,
            created_at: at(12),
        };
        state.reviews.push(stored.clone());
        Ok(stored)
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StubExtractor {
    /// `None` makes `scrape_ranking` fail with a navigation timeout.
    pub ranking: Option<RankingScrape>,
    /// `None` makes `scrape_reviews` fail with a navigation timeout.
    pub reviews: Option<Vec<RawReview>>,
    pub ranking_calls: AtomicUsize,
    pub review_calls: AtomicUsize,
    pub last_ranking_query: Mutex<Option<(String, Option<String>, String)>>,
    pub last_review_limit: Mutex<Option<usize>>,
}

impl StubExtractor {
    pub fn ranking(rank: Option<i32>, result_count: Option<i32>) -> Self {
        Self {
            ranking: Some(RankingScrape {
                rank,
                result_count,
                found: rank.is_some(),
            }),
            ..Self::default()
        }
    }

    pub fn reviews(reviews: Vec<RawReview>) -> Self {
        Self {
            reviews: Some(reviews),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }
}

fn timeout() -> ExtractionError {
    ExtractionError::NavigationTimeout {
        url: "https://search.example.com".to_string(),
        timeout_secs: 30,
    }
}

impl Extractor for StubExtractor {
    async fn scrape_ranking(
        &self,
        keyword: &str,
        region: Option<&str>,
        target_external_id: &str,
    ) -> Result<RankingScrape, ExtractionError> {
        self.ranking_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_ranking_query.lock().unwrap() = Some((
            keyword.to_string(),
            region.map(str::to_string),
            target_external_id.to_string(),
        ));
        self.ranking.ok_or_else(timeout)
    }

    async fn scrape_reviews(
        &self,
        _target_external_id: &str,
        limit: usize,
    ) -> Result<Vec<RawReview>, ExtractionError> {
        self.review_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_review_limit.lock().unwrap() = Some(limit);
        let reviews = self.reviews.clone().ok_or_else(timeout)?;
        Ok(reviews.into_iter().take(limit).collect())
    }
}

pub fn raw(external_id: Option<&str>) -> RawReview {
    RawReview {
        external_id: external_id.map(str::to_string),
        text: Some("tasty".to_string()),
        rating: Some(4),
        ..RawReview::default()
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Advances by `step` every time it is read.
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + self.step;
        now
    }
}
