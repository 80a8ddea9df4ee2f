use placetrack_scraper::{Browser, ExtractionError, PlaceScraper, RankingScrape, RawReview};

use crate::ports::Extractor;

impl<B: Browser> Extractor for PlaceScraper<B> {
    async fn scrape_ranking(
        &self,
        keyword: &str,
        region: Option<&str>,
        target_external_id: &str,
    ) -> Result<RankingScrape, ExtractionError> {
        PlaceScraper::scrape_ranking(self, keyword, region, target_external_id).await
    }

    async fn scrape_reviews(
        &self,
        target_external_id: &str,
        limit: usize,
    ) -> Result<Vec<RawReview>, ExtractionError> {
        PlaceScraper::scrape_reviews(self, target_external_id, limit).await
    }
}
