use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no document could be loaded from {url}")]
    NoDocument { url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to load selector policy from {path}: {reason}")]
    Policy { path: String, reason: String },
}
