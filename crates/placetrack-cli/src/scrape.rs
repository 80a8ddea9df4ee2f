//! One-shot scrape command handlers and scraper construction.

use placetrack_core::{AppConfig, SystemClock};
use placetrack_scraper::{EngineConfig, HttpBrowser, PlaceScraper, SelectorPolicy};
use placetrack_tracking::{
    sweep_rankings, sweep_reviews, Extractor, PgStore, ScrapeRanking, ScrapeReviews,
};

use crate::ScrapeCommands;

/// Built-in policy, or the YAML file at `PLACETRACK_SELECTORS_PATH` when set.
fn load_policy(config: &AppConfig) -> anyhow::Result<SelectorPolicy> {
    match config.selectors_path.as_deref() {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading selector policy");
            Ok(SelectorPolicy::load(path)?)
        }
        None => Ok(SelectorPolicy::default()),
    }
}

pub(crate) fn build_http_scraper(config: &AppConfig) -> anyhow::Result<PlaceScraper<HttpBrowser>> {
    let browser = HttpBrowser::new(config.navigation_timeout_secs, &config.user_agent)?;
    let policy = load_policy(config)?;
    Ok(PlaceScraper::new(
        browser,
        &policy,
        EngineConfig::from_app_config(config),
    )?)
}

#[cfg(feature = "chrome")]
pub(crate) async fn build_chrome_scraper(
    config: &AppConfig,
) -> anyhow::Result<PlaceScraper<placetrack_scraper::ChromeBrowser>> {
    let engine = EngineConfig::from_app_config(config);
    let browser = placetrack_scraper::ChromeBrowser::launch(engine.navigation_timeout).await?;
    let policy = load_policy(config)?;
    Ok(PlaceScraper::new(browser, &policy, engine)?)
}

#[cfg(not(feature = "chrome"))]
#[allow(clippy::unused_async)]
pub(crate) async fn build_chrome_scraper(
    _config: &AppConfig,
) -> anyhow::Result<PlaceScraper<HttpBrowser>> {
    anyhow::bail!("placetrack-cli was built without the `chrome` feature; use --browser http")
}

/// Dispatch a `scrape` subcommand.
///
/// # Errors
///
/// Returns an error if the scrape or its recording fails. For `scrape all`,
/// individual target failures are logged and only a sweep where every target
/// failed is an error.
pub(crate) async fn run_scrape<E: Extractor>(
    store: &PgStore,
    extractor: &E,
    config: &AppConfig,
    command: ScrapeCommands,
) -> anyhow::Result<()> {
    let clock = SystemClock;
    match command {
        ScrapeCommands::Ranking { keyword_id } => {
            let result = ScrapeRanking::new(store, extractor, &clock)
                .execute(keyword_id)
                .await?;
            match result.rank {
                Some(rank) => println!(
                    "keyword {keyword_id}: rank {rank} of {} (observation {})",
                    fmt_count(result.result_count),
                    result.ranking_observation_id
                ),
                None => println!(
                    "keyword {keyword_id}: not found among {} results (observation {})",
                    fmt_count(result.result_count),
                    result.ranking_observation_id
                ),
            }
        }
        ScrapeCommands::Reviews { place_id, limit } => {
            let batch = ScrapeReviews::new(store, extractor, &clock, config.review_scrape_limit)
                .execute(place_id, limit)
                .await?;
            println!(
                "place {place_id}: scraped {}, saved {}, duplicate {}, failed {} ({} ms)",
                batch.scraped_count,
                batch.saved_count,
                batch.duplicate_count,
                batch.failed_count,
                batch.execution_time_ms
            );
        }
        ScrapeCommands::All => {
            let rankings = sweep_rankings(store, extractor, &clock).await?;
            println!(
                "rankings: {} of {} keyword(s) recorded",
                rankings.succeeded.len(),
                rankings.attempted()
            );
            for (id, reason) in &rankings.failed {
                println!("  \u{2717} keyword {id:<8} {reason}");
            }

            let reviews = sweep_reviews(store, extractor, &clock, config.review_scrape_limit).await?;
            let saved: usize = reviews.succeeded.iter().map(|b| b.saved_count).sum();
            println!(
                "reviews: {} of {} place(s) scraped, {saved} new review(s) saved",
                reviews.succeeded.len(),
                reviews.attempted()
            );
            for (id, reason) in &reviews.failed {
                println!("  \u{2717} place {id:<10} {reason}");
            }

            if rankings.all_failed() && reviews.all_failed() {
                anyhow::bail!("every ranking and review scrape failed");
            }
        }
    }
    Ok(())
}

fn fmt_count(count: Option<i32>) -> String {
    count.map_or_else(|| "?".to_string(), |c| c.to_string())
}
