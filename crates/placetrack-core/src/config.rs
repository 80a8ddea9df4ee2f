use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("PLACETRACK_ENV", "development"))?;
    let log_level = or_default("PLACETRACK_LOG_LEVEL", "info");

    let db_max_connections = parse_num(&lookup, "PLACETRACK_DB_MAX_CONNECTIONS", 10_u32)?;
    let db_min_connections = parse_num(&lookup, "PLACETRACK_DB_MIN_CONNECTIONS", 1_u32)?;
    let db_acquire_timeout_secs = parse_num(&lookup, "PLACETRACK_DB_ACQUIRE_TIMEOUT_SECS", 10_u64)?;

    let review_scrape_limit = parse_num(&lookup, "PLACETRACK_REVIEW_SCRAPE_LIMIT", 20_usize)?;
    let navigation_timeout_secs = parse_num(&lookup, "PLACETRACK_NAVIGATION_TIMEOUT_SECS", 30_u64)?;
    if navigation_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACETRACK_NAVIGATION_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("PLACETRACK_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_num(&lookup, "PLACETRACK_MAX_RETRIES", 1_u32)?;
    let retry_backoff_base_secs = parse_num(&lookup, "PLACETRACK_RETRY_BACKOFF_BASE_SECS", 2_u64)?;
    let max_result_pages = parse_num(&lookup, "PLACETRACK_MAX_RESULT_PAGES", 5_usize)?.max(1);
    let selectors_path = lookup("PLACETRACK_SELECTORS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let ranking_cron = or_default("PLACETRACK_RANKING_CRON", "0 0 6 * * *");
    let reviews_cron = or_default("PLACETRACK_REVIEWS_CRON", "0 30 6 * * *");

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        review_scrape_limit,
        navigation_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        max_result_pages,
        selectors_path,
        ranking_cron,
        reviews_cron,
    })
}

/// Parse a numeric env var, falling back to `default` when it is unset.
fn parse_num<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACETRACK_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
