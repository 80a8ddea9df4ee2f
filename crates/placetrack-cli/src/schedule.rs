//! Recurring ranking and review sweeps.
//!
//! Registers one cron job per sweep and runs until Ctrl-C. Dropping the
//! returned [`JobScheduler`] stops all jobs.

use std::sync::Arc;

use placetrack_core::{AppConfig, SystemClock};
use placetrack_scraper::{Browser, PlaceScraper};
use placetrack_tracking::{sweep_rankings, sweep_reviews, PgStore};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the scheduler with both sweep jobs registered.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if a cron expression is invalid or the
/// scheduler cannot start.
pub(crate) async fn build_scheduler<B>(
    store: PgStore,
    scraper: Arc<PlaceScraper<B>>,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError>
where
    B: Browser + 'static,
{
    let scheduler = JobScheduler::new().await?;

    register_ranking_job(&scheduler, &config.ranking_cron, store.clone(), Arc::clone(&scraper))
        .await?;
    register_reviews_job(&scheduler, store, scraper, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_ranking_job<B>(
    scheduler: &JobScheduler,
    cron: &str,
    store: PgStore,
    scraper: Arc<PlaceScraper<B>>,
) -> Result<(), JobSchedulerError>
where
    B: Browser + 'static,
{
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let store = store.clone();
        let scraper = Arc::clone(&scraper);

        Box::pin(async move {
            tracing::info!("scheduler: starting ranking sweep");
            match sweep_rankings(&store, scraper.as_ref(), &SystemClock).await {
                Ok(report) if report.all_failed() => tracing::error!(
                    failed = report.failed.len(),
                    "scheduler: every ranking scrape failed"
                ),
                Ok(_) => tracing::info!("scheduler: ranking sweep complete"),
                Err(e) => tracing::error!(error = %e, "scheduler: failed to load tracked keywords"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: ranking sweep registered");
    Ok(())
}

async fn register_reviews_job<B>(
    scheduler: &JobScheduler,
    store: PgStore,
    scraper: Arc<PlaceScraper<B>>,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError>
where
    B: Browser + 'static,
{
    let cron = config.reviews_cron.clone();
    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let store = store.clone();
        let scraper = Arc::clone(&scraper);
        let limit = config.review_scrape_limit;

        Box::pin(async move {
            tracing::info!(limit, "scheduler: starting review sweep");
            match sweep_reviews(&store, scraper.as_ref(), &SystemClock, limit).await {
                Ok(report) if report.all_failed() => tracing::error!(
                    failed = report.failed.len(),
                    "scheduler: every review scrape failed"
                ),
                Ok(_) => tracing::info!("scheduler: review sweep complete"),
                Err(e) => tracing::error!(error = %e, "scheduler: failed to load places"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: review sweep registered");
    Ok(())
}

/// Runs the scheduler until Ctrl-C, then shuts it down.
///
/// # Errors
///
/// Returns an error if the scheduler cannot be built or shut down cleanly.
pub(crate) async fn run_schedule<B>(
    store: PgStore,
    scraper: Arc<PlaceScraper<B>>,
    config: Arc<AppConfig>,
) -> anyhow::Result<()>
where
    B: Browser + 'static,
{
    let mut scheduler = build_scheduler(store, scraper, config).await?;
    println!("scheduler running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal, stopping scheduler");
    scheduler.shutdown().await?;
    Ok(())
}
