mod history;
mod places;
mod schedule;
mod scrape;

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use placetrack_tracking::PgStore;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placetrack-cli")]
#[command(about = "Track search rankings and reviews for places on a local-search platform")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database management
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Manage tracked places
    Place {
        #[command(subcommand)]
        command: PlaceCommands,
    },
    /// Manage tracked keywords
    Keyword {
        #[command(subcommand)]
        command: KeywordCommands,
    },
    /// Run a scrape now
    Scrape {
        /// Browser backend used to load pages
        #[arg(long, value_enum, default_value_t = BrowserKind::Http)]
        browser: BrowserKind,
        #[command(subcommand)]
        command: ScrapeCommands,
    },
    /// Show stored observations
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Run ranking and review sweeps on their cron schedules until interrupted
    Schedule {
        /// Browser backend used to load pages
        #[arg(long, value_enum, default_value_t = BrowserKind::Http)]
        browser: BrowserKind,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[derive(Debug, Subcommand)]
enum PlaceCommands {
    /// Register a place
    Add {
        #[arg(long)]
        name: String,
        /// The platform's listing id
        #[arg(long)]
        external_id: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum KeywordCommands {
    /// Track a keyword for a place (reactivates an existing association)
    Track {
        #[arg(long)]
        place_id: i64,
        #[arg(long)]
        keyword: String,
        /// Region qualifier prefixed to the search (e.g., Seoul)
        #[arg(long)]
        region: Option<String>,
    },
    /// Resume ranking scrapes for a tracked keyword
    Activate {
        #[arg(long)]
        id: i64,
    },
    /// Pause ranking scrapes for a tracked keyword
    Deactivate {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum ScrapeCommands {
    /// Scrape and record the current rank for one tracked keyword
    Ranking {
        #[arg(long)]
        keyword_id: i64,
    },
    /// Scrape and save reviews for one place
    Reviews {
        #[arg(long)]
        place_id: i64,
        /// Maximum reviews to scrape (defaults to PLACETRACK_REVIEW_SCRAPE_LIMIT)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Sweep every active tracked keyword and place
    All,
}

#[derive(Debug, Subcommand)]
enum HistoryCommands {
    /// Ranking observations for a tracked keyword, newest first
    Rankings {
        #[arg(long)]
        keyword_id: i64,
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Reviews for a place, newest first
    Reviews {
        #[arg(long)]
        place_id: i64,
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BrowserKind {
    /// Plain HTTP fetches; frames are followed by address
    Http,
    /// Headless Chrome (requires the `chrome` feature)
    Chrome,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("placetrack-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = placetrack_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = placetrack_db::PoolConfig::from_app_config(&config);
    let pool = placetrack_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                placetrack_db::ping(&pool).await?;
                println!("database connection ok");
            }
            DbCommands::Migrate => {
                let applied = placetrack_db::run_migrations(&pool).await?;
                println!("applied {applied} migration(s)");
            }
        },
        Commands::Place { command } => match command {
            PlaceCommands::Add { name, external_id } => {
                places::run_place_add(&pool, &name, external_id.as_deref()).await?;
            }
        },
        Commands::Keyword { command } => match command {
            KeywordCommands::Track {
                place_id,
                keyword,
                region,
            } => {
                places::run_keyword_track(&pool, place_id, &keyword, region.as_deref()).await?;
            }
            KeywordCommands::Activate { id } => {
                places::run_keyword_set_active(&pool, id, true).await?;
            }
            KeywordCommands::Deactivate { id } => {
                places::run_keyword_set_active(&pool, id, false).await?;
            }
        },
        Commands::Scrape { browser, command } => {
            let store = PgStore::new(pool);
            match browser {
                BrowserKind::Http => {
                    let scraper = scrape::build_http_scraper(&config)?;
                    scrape::run_scrape(&store, &scraper, &config, command).await?;
                }
                BrowserKind::Chrome => {
                    let scraper = scrape::build_chrome_scraper(&config).await?;
                    scrape::run_scrape(&store, &scraper, &config, command).await?;
                }
            }
        }
        Commands::History { command } => match command {
            HistoryCommands::Rankings { keyword_id, limit } => {
                history::run_history_rankings(&pool, keyword_id, limit).await?;
            }
            HistoryCommands::Reviews { place_id, limit } => {
                history::run_history_reviews(&pool, place_id, limit).await?;
            }
        },
        Commands::Schedule { browser } => {
            let store = PgStore::new(pool);
            let config = Arc::new(config);
            match browser {
                BrowserKind::Http => {
                    let scraper = Arc::new(scrape::build_http_scraper(&config)?);
                    schedule::run_schedule(store, scraper, config).await?;
                }
                BrowserKind::Chrome => {
                    let scraper = Arc::new(scrape::build_chrome_scraper(&config).await?);
                    schedule::run_schedule(store, scraper, config).await?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
