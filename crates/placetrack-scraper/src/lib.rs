//! Extraction engine for the local-search platform.
//!
//! Drives one browser session per call, resolves the nested document that
//! actually hosts the data, and extracts a search rank or a batch of reviews
//! using the prioritized selector chains in a [`SelectorPolicy`].

pub mod browser;
pub mod engine;
pub mod error;
pub mod frame;
pub mod policy;
pub mod types;

mod extract;
mod ranking;
mod retry;
mod reviews;
mod urls;

pub use browser::http::HttpBrowser;
pub use browser::{Browser, BrowserSession, RawDocument};
pub use engine::{EngineConfig, PlaceScraper};
pub use error::ExtractionError;
pub use frame::{resolve_document, FrameSource};
pub use policy::{FieldRule, RankingSelectors, ReviewSelectors, SelectorPolicy};
pub use types::{RankingScrape, RawReview};

#[cfg(feature = "chrome")]
pub use browser::chrome::ChromeBrowser;
