use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Number of reviews scraped per place when the caller gives no limit.
    pub review_scrape_limit: usize,
    pub navigation_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Upper bound on search result pages walked while looking for a place.
    pub max_result_pages: usize,
    /// Optional YAML file overriding the built-in selector policy.
    pub selectors_path: Option<PathBuf>,
    pub ranking_cron: String,
    pub reviews_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("review_scrape_limit", &self.review_scrape_limit)
            .field("navigation_timeout_secs", &self.navigation_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("max_result_pages", &self.max_result_pages)
            .field("selectors_path", &self.selectors_path)
            .field("ranking_cron", &self.ranking_cron)
            .field("reviews_cron", &self.reviews_cron)
            .finish()
    }
}
