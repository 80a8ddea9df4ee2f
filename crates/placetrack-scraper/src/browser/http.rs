//! Plain-HTTP browser session.
//!
//! Loads documents with `reqwest` and follows `<iframe>`/`<frame>` sources by
//! fetching them as separate documents. No JavaScript runs, so this suits
//! surfaces that render server-side; use the `chrome` feature otherwise.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};

use super::{Browser, BrowserSession, RawDocument};
use crate::error::ExtractionError;
use crate::urls;

#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
    timeout_secs: u64,
}

impl HttpBrowser {
    /// Creates an `HttpBrowser` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl Browser for HttpBrowser {
    type Session = HttpSession;

    async fn open(&self) -> Result<HttpSession, ExtractionError> {
        Ok(HttpSession {
            client: self.client.clone(),
            timeout_secs: self.timeout_secs,
            current: None,
        })
    }
}

pub struct HttpSession {
    client: Client,
    timeout_secs: u64,
    current: Option<RawDocument>,
}

impl BrowserSession for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ExtractionError> {
        let document = fetch_document(&self.client, url, self.timeout_secs).await?;
        self.current = Some(document);
        Ok(())
    }

    async fn document(&mut self) -> Result<RawDocument, ExtractionError> {
        self.current
            .clone()
            .ok_or_else(|| ExtractionError::NoDocument {
                url: "about:blank".to_string(),
            })
    }

    async fn frames(&mut self) -> Result<Vec<RawDocument>, ExtractionError> {
        let Some(top) = &self.current else {
            return Ok(Vec::new());
        };

        let sources = frame_sources(top);
        let mut frames = Vec::with_capacity(sources.len());
        for src in sources {
            match fetch_document(&self.client, &src, self.timeout_secs).await {
                Ok(doc) => frames.push(doc),
                Err(e) => {
                    tracing::debug!(frame = %src, error = %e, "skipping frame that failed to load");
                }
            }
        }
        Ok(frames)
    }

    async fn reset(&mut self) -> Result<(), ExtractionError> {
        self.current = None;
        Ok(())
    }

    async fn close(self) {}
}

async fn fetch_document(
    client: &Client,
    url: &str,
    timeout_secs: u64,
) -> Result<RawDocument, ExtractionError> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractionError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs,
            }
        } else {
            ExtractionError::Http(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractionError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let final_url = response.url().to_string();
    let html = response.text().await?;
    Ok(RawDocument::new(final_url, html))
}

/// Absolute addresses of the frames embedded in `document`, in document order.
fn frame_sources(document: &RawDocument) -> Vec<String> {
    let Ok(selector) = Selector::parse("iframe[src], frame[src]") else {
        return Vec::new();
    };
    let html = Html::parse_document(&document.html);
    html.select(&selector)
        .filter_map(|el| el.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty() && *src != "about:blank" && !src.starts_with("javascript:"))
        .filter_map(|src| urls::join(&document.url, src).ok())
        .collect()
}
