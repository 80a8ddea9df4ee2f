//! Browser abstraction used by the extraction engine.
//!
//! A [`Browser`] hands out sessions; a [`BrowserSession`] is a single,
//! stateful, non-reentrant page that can be navigated and snapshotted. The
//! engine opens exactly one session per scrape and always closes it before
//! returning.

use std::future::Future;

use crate::error::ExtractionError;

#[cfg(feature = "chrome")]
pub mod chrome;
pub mod http;

/// A rendered document snapshot: the address it was loaded from and its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub url: String,
    pub html: String,
}

impl RawDocument {
    #[must_use]
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// `true` when the document has no markup to query.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.html.trim().is_empty()
    }
}

pub trait Browser: Send + Sync {
    type Session: BrowserSession;

    /// Acquire a fresh session.
    fn open(&self) -> impl Future<Output = Result<Self::Session, ExtractionError>> + Send;
}

pub trait BrowserSession: Send {
    /// Load `url` as the top-level document and wait until it has rendered.
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<(), ExtractionError>> + Send;

    /// Snapshot of the current top-level document.
    fn document(&mut self) -> impl Future<Output = Result<RawDocument, ExtractionError>> + Send;

    /// Snapshots of the nested documents (frames) attached to the current
    /// page, in document order. The top-level document is not included.
    fn frames(&mut self) -> impl Future<Output = Result<Vec<RawDocument>, ExtractionError>> + Send;

    /// Discard a page whose navigation was abandoned mid-flight so the next
    /// navigation starts from a clean slate.
    fn reset(&mut self) -> impl Future<Output = Result<(), ExtractionError>> + Send;

    /// Release the session and everything it holds.
    fn close(self) -> impl Future<Output = ()> + Send;
}
