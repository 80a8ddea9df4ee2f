//! Backoff retry for page navigation.
//!
//! Only transient failures (timeouts, transport errors, browser hiccups and
//! 429/5xx responses) are retried. Everything else is returned on the first
//! attempt.

use std::time::Duration;

use crate::error::ExtractionError;

fn is_retriable(err: &ExtractionError) -> bool {
    match err {
        ExtractionError::NavigationTimeout { .. }
        | ExtractionError::Http(_)
        | ExtractionError::Browser(_) => true,
        ExtractionError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl RetryPolicy {
    /// How long to wait before retrying after `err` on attempt `attempt`
    /// (0 = the initial try), or `None` when the error should be returned.
    ///
    /// Backoff is `base * 2^attempt` seconds, saturating.
    pub(crate) fn next_delay(&self, err: &ExtractionError, attempt: u32) -> Option<Duration> {
        if !is_retriable(err) || attempt >= self.max_retries {
            return None;
        }
        Some(Duration::from_secs(
            self.backoff_base_secs
                .saturating_mul(1u64 << attempt.min(62)),
        ))
    }
}
