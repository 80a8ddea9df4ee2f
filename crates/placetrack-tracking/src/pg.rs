use placetrack_core::{
    NewRankingObservation, NewReview, Place, RankingObservation, Review, TrackedKeyword,
};
use placetrack_db::DbError;
use sqlx::PgPool;

use crate::error::TrackingError;
use crate::ports::{PlaceRepository, RankingRepository, ReviewRepository, TrackedKeywordRepository};

/// Repository implementations over a shared Postgres pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl PlaceRepository for PgStore {
    async fn find_place(&self, id: i64) -> Result<Option<Place>, TrackingError> {
        Ok(placetrack_db::get_place(&self.pool, id).await?.map(Place::from))
    }

    async fn list_active_places(&self) -> Result<Vec<Place>, TrackingError> {
        let rows = placetrack_db::list_active_places(&self.pool).await?;
        Ok(rows.into_iter().map(Place::from).collect())
    }
}

impl TrackedKeywordRepository for PgStore {
    async fn find_tracked_keyword(&self, id: i64) -> Result<Option<TrackedKeyword>, TrackingError> {
        Ok(placetrack_db::get_tracked_keyword(&self.pool, id)
            .await?
            .map(TrackedKeyword::from))
    }

    async fn list_active_tracked_keywords(&self) -> Result<Vec<TrackedKeyword>, TrackingError> {
        let rows = placetrack_db::list_active_tracked_keywords(&self.pool).await?;
        Ok(rows.into_iter().map(TrackedKeyword::from).collect())
    }
}

impl RankingRepository for PgStore {
    async fn save_observation(
        &self,
        observation: &NewRankingObservation,
    ) -> Result<RankingObservation, TrackingError> {
        let row = placetrack_db::insert_ranking_observation(&self.pool, observation).await?;
        Ok(row.into())
    }
}

impl ReviewRepository for PgStore {
    async fn find_review_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Review>, TrackingError> {
        placetrack_db::get_review_by_external_id(&self.pool, external_id)
            .await?
            .map(Review::try_from)
            .transpose()
            .map_err(TrackingError::from)
    }

    async fn save_review(&self, review: &NewReview) -> Result<Review, TrackingError> {
        match placetrack_db::insert_review(&self.pool, review).await {
            Ok(row) => Ok(Review::try_from(row)?),
            Err(DbError::UniqueViolation { .. }) => Err(TrackingError::DuplicateReview {
                external_id: review.external_id.clone().unwrap_or_default(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
