//! Headless Chrome browser session for surfaces that only render with
//! JavaScript.
//!
//! `headless_chrome` is blocking, so every call runs on the blocking pool.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser as Chrome, LaunchOptions, Tab};

use super::{Browser, BrowserSession, RawDocument};
use crate::error::ExtractionError;

const FRAME_SOURCES_JS: &str = "JSON.stringify(Array.from(document.querySelectorAll('iframe[src], frame[src]')).map(f => f.src))";

fn browser_error(e: impl Display) -> ExtractionError {
    ExtractionError::Browser(e.to_string())
}

async fn blocking<T, F>(f: F) -> Result<T, ExtractionError>
where
    F: FnOnce() -> Result<T, ExtractionError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| browser_error(format!("blocking browser task failed: {e}")))?
}

/// A launched headless Chrome process. Each session is a fresh tab.
#[derive(Clone)]
pub struct ChromeBrowser {
    chrome: Chrome,
    page_timeout: Duration,
}

impl ChromeBrowser {
    /// Launches headless Chrome.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Browser`] if Chrome cannot be found or started.
    pub async fn launch(page_timeout: Duration) -> Result<Self, ExtractionError> {
        let chrome = blocking(|| {
            Chrome::new(LaunchOptions {
                headless: true,
                window_size: Some((1280, 2000)),
                idle_browser_timeout: Duration::from_secs(300),
                ..Default::default()
            })
            .map_err(browser_error)
        })
        .await?;
        Ok(Self {
            chrome,
            page_timeout,
        })
    }
}

async fn fresh_tab(chrome: &Chrome, timeout: Duration) -> Result<Arc<Tab>, ExtractionError> {
    let chrome = chrome.clone();
    blocking(move || {
        let tab = chrome.new_tab().map_err(browser_error)?;
        tab.set_default_timeout(timeout);
        Ok(tab)
    })
    .await
}

async fn close_tab(tab: Arc<Tab>) {
    if let Err(e) = blocking(move || tab.close(true).map_err(browser_error)).await {
        tracing::debug!(error = %e, "failed to close browser tab");
    }
}

impl Browser for ChromeBrowser {
    type Session = ChromeSession;

    async fn open(&self) -> Result<ChromeSession, ExtractionError> {
        let tab = fresh_tab(&self.chrome, self.page_timeout).await?;
        Ok(ChromeSession {
            chrome: self.chrome.clone(),
            tab,
            timeout: self.page_timeout,
        })
    }
}

pub struct ChromeSession {
    chrome: Chrome,
    tab: Arc<Tab>,
    timeout: Duration,
}

fn snapshot(tab: &Tab) -> Result<RawDocument, ExtractionError> {
    let html = tab.get_content().map_err(browser_error)?;
    Ok(RawDocument::new(tab.get_url(), html))
}

impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ExtractionError> {
        let tab = Arc::clone(&self.tab);
        let url = url.to_string();
        blocking(move || {
            tab.navigate_to(&url)
                .and_then(|tab| tab.wait_until_navigated())
                .map_err(browser_error)?;
            Ok(())
        })
        .await
    }

    async fn document(&mut self) -> Result<RawDocument, ExtractionError> {
        let tab = Arc::clone(&self.tab);
        blocking(move || snapshot(&tab)).await
    }

    /// Cross-origin frames cannot be read through the parent, so each frame
    /// source is loaded in its own temporary tab.
    async fn frames(&mut self) -> Result<Vec<RawDocument>, ExtractionError> {
        let tab = Arc::clone(&self.tab);
        let chrome = self.chrome.clone();
        let timeout = self.timeout;
        blocking(move || {
            let listed = tab.evaluate(FRAME_SOURCES_JS, false).map_err(browser_error)?;
            let sources: Vec<String> = listed
                .value
                .as_ref()
                .and_then(|v| v.as_str())
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_default();

            let mut frames = Vec::with_capacity(sources.len());
            for src in sources.iter().filter(|s| s.starts_with("http")) {
                let frame_tab = chrome.new_tab().map_err(browser_error)?;
                frame_tab.set_default_timeout(timeout);
                let loaded = frame_tab
                    .navigate_to(src)
                    .and_then(|t| t.wait_until_navigated())
                    .map_err(browser_error)
                    .and_then(snapshot);
                match loaded {
                    Ok(doc) => frames.push(doc),
                    Err(e) => tracing::debug!(frame = %src, error = %e, "skipping frame that failed to load"),
                }
                let _ = frame_tab.close(true);
            }
            Ok(frames)
        })
        .await
    }

    /// A timed-out `navigate_to` keeps driving its tab on the blocking pool,
    /// so the tab is swapped for a new one rather than reused.
    async fn reset(&mut self) -> Result<(), ExtractionError> {
        let fresh = fresh_tab(&self.chrome, self.timeout).await?;
        let stale = std::mem::replace(&mut self.tab, fresh);
        close_tab(stale).await;
        Ok(())
    }

    async fn close(self) {
        close_tab(self.tab).await;
    }
}
