//! The extraction engine: one browser session per call, frame resolution,
//! then selector-driven extraction.

use std::collections::HashSet;
use std::time::Duration;

use placetrack_core::AppConfig;

use crate::browser::{Browser, BrowserSession, RawDocument};
use crate::error::ExtractionError;
use crate::frame::resolve_document;
use crate::policy::{CompiledPolicy, SelectorPolicy};
use crate::ranking::scan_page;
use crate::retry::RetryPolicy;
use crate::reviews::extract_reviews;
use crate::types::{RankingScrape, RawReview};
use crate::urls;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on a single navigation, including render.
    pub navigation_timeout: Duration,
    /// Extra attempts after a transient navigation failure.
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Result pages to walk before giving up on a ranking lookup.
    pub max_result_pages: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            max_retries: 1,
            retry_backoff_base_secs: 2,
            max_result_pages: 5,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            max_retries: config.max_retries,
            retry_backoff_base_secs: config.retry_backoff_base_secs,
            max_result_pages: config.max_result_pages.max(1),
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_base_secs: self.retry_backoff_base_secs,
        }
    }
}

/// Scrapes search rankings and reviews for listings on the platform.
pub struct PlaceScraper<B> {
    browser: B,
    policy: CompiledPolicy,
    config: EngineConfig,
}

impl<B: Browser> PlaceScraper<B> {
    /// Builds a scraper over `browser`, compiling `policy` up front.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidSelector`],
    /// [`ExtractionError::InvalidPattern`] or [`ExtractionError::Policy`] when
    /// the policy does not compile.
    pub fn new(
        browser: B,
        policy: &SelectorPolicy,
        config: EngineConfig,
    ) -> Result<Self, ExtractionError> {
        Ok(Self {
            browser,
            policy: policy.compile()?,
            config,
        })
    }

    /// Looks up the 1-based search position of `target_external_id` for
    /// `keyword`, qualified by `region` when present.
    ///
    /// A listing that does not appear within the walked result pages is
    /// reported with `found = false`; zero results and missing markup are not
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the browser cannot be opened, a
    /// navigation fails after retries, or no document can be loaded.
    pub async fn scrape_ranking(
        &self,
        keyword: &str,
        region: Option<&str>,
        target_external_id: &str,
    ) -> Result<RankingScrape, ExtractionError> {
        let url = urls::search_url(&self.policy.search_url, keyword, region);
        let mut session = self.browser.open().await?;
        let result = self
            .ranking_in_session(&mut session, url, target_external_id)
            .await;
        session.close().await;

        match &result {
            Ok(scrape) => tracing::info!(
                keyword,
                region,
                target = target_external_id,
                found = scrape.found,
                rank = scrape.rank,
                result_count = scrape.result_count,
                "ranking scrape complete"
            ),
            Err(e) => tracing::warn!(
                keyword,
                target = target_external_id,
                error = %e,
                "ranking scrape failed"
            ),
        }
        result
    }

    /// Extracts up to `limit` reviews from the listing's detail surface, in
    /// document order. `limit == 0` returns an empty list without opening a
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the browser cannot be opened, the
    /// navigation fails after retries, or no document can be loaded.
    pub async fn scrape_reviews(
        &self,
        target_external_id: &str,
        limit: usize,
    ) -> Result<Vec<RawReview>, ExtractionError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let url = urls::place_url(&self.policy.place_url, target_external_id);
        let mut session = self.browser.open().await?;
        let result = self
            .reviews_in_session(&mut session, &url, target_external_id, limit)
            .await;
        session.close().await;

        match &result {
            Ok(reviews) => tracing::info!(
                target = target_external_id,
                limit,
                extracted = reviews.len(),
                "review scrape complete"
            ),
            Err(e) => tracing::warn!(
                target = target_external_id,
                error = %e,
                "review scrape failed"
            ),
        }
        result
    }

    async fn ranking_in_session(
        &self,
        session: &mut B::Session,
        first_url: String,
        target_external_id: &str,
    ) -> Result<RankingScrape, ExtractionError> {
        let mut url = first_url;
        let mut seen = HashSet::new();
        let mut counted_before = 0usize;
        let mut result_count = None;

        for page_number in 1..=self.config.max_result_pages.max(1) {
            seen.insert(url.clone());
            self.navigate(session, &url).await?;
            let document = self
                .load_document(session, self.policy.ranking_frame_segment.as_deref(), None)
                .await?;

            let page = scan_page(&document.html, &self.policy.ranking, target_external_id);
            result_count = result_count.or(page.result_count);

            if let Some(position) = page.position {
                let rank = i32::try_from(counted_before + position).unwrap_or(i32::MAX);
                return Ok(RankingScrape {
                    rank: Some(rank),
                    result_count,
                    found: true,
                });
            }

            counted_before += page.counted;
            let Some(next) = page.next_page.filter(|_| page.counted > 0) else {
                break;
            };
            match urls::join(&document.url, &next) {
                Ok(next_url) if !seen.contains(&next_url) => url = next_url,
                Ok(_) => break,
                Err(e) => {
                    tracing::debug!(page_number, error = %e, "unusable next-page link");
                    break;
                }
            }
        }

        Ok(RankingScrape::not_found(result_count))
    }

    async fn reviews_in_session(
        &self,
        session: &mut B::Session,
        url: &str,
        target_external_id: &str,
        limit: usize,
    ) -> Result<Vec<RawReview>, ExtractionError> {
        self.navigate(session, url).await?;
        let document = self
            .load_document(
                session,
                self.policy.review_frame_segment.as_deref(),
                Some(target_external_id),
            )
            .await?;
        Ok(extract_reviews(&document.html, &self.policy.reviews, limit))
    }

    /// Navigates with a bounded timeout, retrying transient failures. A
    /// navigation cut off by the timeout resets the session before the retry.
    async fn navigate(&self, session: &mut B::Session, url: &str) -> Result<(), ExtractionError> {
        let retry = self.config.retry_policy();
        let timeout = self.config.navigation_timeout;
        let mut attempt = 0u32;

        loop {
            let (outcome, abandoned) =
                match tokio::time::timeout(timeout, session.navigate(url)).await {
                    Ok(outcome) => (outcome, false),
                    Err(_) => (
                        Err(ExtractionError::NavigationTimeout {
                            url: url.to_string(),
                            timeout_secs: timeout.as_secs(),
                        }),
                        true,
                    ),
                };
            let err = match outcome {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            let Some(delay) = retry.next_delay(&err, attempt) else {
                return Err(err);
            };
            if abandoned {
                session.reset().await?;
            }
            tracing::warn!(
                url,
                attempt,
                max_retries = retry.max_retries,
                delay_secs = delay.as_secs(),
                error = %err,
                "navigation failed, retrying after backoff"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Snapshots the page and resolves the document that hosts the data.
    ///
    /// A failure to enumerate frames is treated as "no frames".
    async fn load_document(
        &self,
        session: &mut B::Session,
        segment: Option<&str>,
        target_id: Option<&str>,
    ) -> Result<RawDocument, ExtractionError> {
        let top = session.document().await?;
        let frames = match session.frames().await {
            Ok(frames) => frames,
            Err(e) => {
                tracing::debug!(url = %top.url, error = %e, "frame enumeration failed");
                Vec::new()
            }
        };
        let frame_count = frames.len();

        let (document, source) = resolve_document(top, frames, segment, target_id);
        tracing::debug!(url = %document.url, ?source, frame_count, "resolved document");

        if document.is_blank() {
            return Err(ExtractionError::NoDocument { url: document.url });
        }
        Ok(document)
    }
}
