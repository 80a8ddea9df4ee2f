//! Selector policy: every address template, frame hint and selector chain the
//! extraction engine consults.
//!
//! A policy is plain data and can be loaded from YAML so markup changes on the
//! platform do not require a rebuild. Each field is an ordered fallback chain;
//! the first rule that yields a non-empty value wins.

use std::path::Path;

use chrono::FixedOffset;
use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// One extractor in a fallback chain.
///
/// `selector` picks a descendant of the current item (the item itself when
/// absent); `attr` reads an attribute instead of the element text; `pattern`
/// narrows the value to its first capture group, or to the whole match when
/// the pattern has no groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRule {
    pub selector: Option<String>,
    pub attr: Option<String>,
    pub pattern: Option<String>,
}

impl FieldRule {
    #[must_use]
    pub fn text(selector: &str) -> Self {
        Self {
            selector: Some(selector.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(selector: Option<&str>, attr: &str) -> Self {
        Self {
            selector: selector.map(str::to_string),
            attr: Some(attr.to_string()),
            pattern: None,
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSelectors {
    /// Candidate selectors for result entries; the first that matches anything wins.
    pub items: Vec<String>,
    /// Entries matching (or containing a match for) any of these are not counted.
    pub skip: Vec<String>,
    pub item_id: Vec<FieldRule>,
    /// Evaluated against the whole document.
    pub result_count: Vec<FieldRule>,
    /// Evaluated against the whole document; yields the next page's address.
    pub next_page: Vec<FieldRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSelectors {
    pub items: Vec<String>,
    pub external_id: Vec<FieldRule>,
    pub kind: Vec<FieldRule>,
    pub text: Vec<FieldRule>,
    pub rating: Vec<FieldRule>,
    pub author: Vec<FieldRule>,
    pub published_at: Vec<FieldRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorPolicy {
    /// Search surface; `{query}` is replaced with the encoded search text.
    pub search_url: String,
    /// Listing detail surface; `{id}` is replaced with the listing id.
    pub place_url: String,
    /// Path segment identifying the frame that hosts search results.
    pub ranking_frame_segment: Option<String>,
    /// Path segment identifying the frame that hosts the review list.
    pub review_frame_segment: Option<String>,
    /// Offset applied to publish dates that carry no zone.
    pub utc_offset_hours: i32,
    pub ranking: RankingSelectors,
    pub reviews: ReviewSelectors,
}

impl Default for RankingSelectors {
    fn default() -> Self {
        Self {
            items: vec![
                "li.UEzoS".to_string(),
                "li.VLTHu".to_string(),
                "#_pcmap_list_scroll_container ul > li".to_string(),
                "[role='list'] > [role='listitem']".to_string(),
            ],
            skip: vec![
                "[data-ad]".to_string(),
                ".place_ad_label_text".to_string(),
                ".cZnHG".to_string(),
            ],
            item_id: vec![
                FieldRule::attr(None, "data-id"),
                FieldRule::attr(None, "data-place-id"),
                FieldRule::attr(Some("a[href*='/place/']"), "href").with_pattern(r"/place/(\d+)"),
            ],
            result_count: vec![
                FieldRule::text(".place_section_count").with_pattern(r"([\d,]+)"),
                FieldRule::attr(Some("[data-total-count]"), "data-total-count"),
            ],
            next_page: vec![
                FieldRule::attr(Some("a[rel='next']"), "href"),
                FieldRule::attr(Some("a.eUTV2[aria-disabled='false']:last-of-type"), "href"),
            ],
        }
    }
}

impl Default for ReviewSelectors {
    fn default() -> Self {
        Self {
            items: vec![
                "li.pui__X35jYm".to_string(),
                "li.YeINN".to_string(),
                "[data-review-id]".to_string(),
                "[role='list'] > [role='listitem']".to_string(),
            ],
            external_id: vec![
                FieldRule::attr(None, "data-review-id"),
                FieldRule::attr(Some("[data-review-id]"), "data-review-id"),
                FieldRule::attr(Some("a[href*='reviewId=']"), "href")
                    .with_pattern(r"reviewId=([\w-]+)"),
            ],
            kind: vec![
                FieldRule::attr(None, "data-review-type"),
                FieldRule::text(".pui__jhpEyP"),
                FieldRule::text(".review_type"),
            ],
            text: vec![
                FieldRule::text(".pui__vn15t2 a"),
                FieldRule::text(".pui__vn15t2"),
                FieldRule::text(".review_text"),
            ],
            rating: vec![
                FieldRule::text(".pui__6aZSnR em"),
                FieldRule::attr(Some("[aria-label*='rating']"), "aria-label"),
                FieldRule::text(".rating"),
            ],
            author: vec![
                FieldRule::text(".pui__NMi-Dp"),
                FieldRule::text(".reviewer_name"),
                FieldRule::attr(Some("[data-author]"), "data-author"),
            ],
            published_at: vec![
                FieldRule::attr(Some("time[datetime]"), "datetime"),
                FieldRule::text(".pui__gfuUIT time"),
                FieldRule::text("time"),
            ],
        }
    }
}

impl Default for SelectorPolicy {
    fn default() -> Self {
        Self {
            search_url: "https://map.naver.com/p/search/{query}".to_string(),
            place_url: "https://map.naver.com/p/entry/place/{id}".to_string(),
            ranking_frame_segment: Some("/list".to_string()),
            review_frame_segment: Some("/review".to_string()),
            utc_offset_hours: 9,
            ranking: RankingSelectors::default(),
            reviews: ReviewSelectors::default(),
        }
    }
}

impl SelectorPolicy {
    /// Parses a policy from YAML. Omitted fields fall back to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Policy`] if the document is not valid YAML
    /// for this shape.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ExtractionError> {
        serde_yaml::from_str(yaml).map_err(|e| ExtractionError::Policy {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Reads and parses a YAML policy file.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Policy`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        let policy_error = |reason: String| ExtractionError::Policy {
            path: path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| policy_error(e.to_string()))?;
        serde_yaml::from_str(&raw).map_err(|e| policy_error(e.to_string()))
    }

    /// Compiles every selector and pattern up front.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidSelector`] or
    /// [`ExtractionError::InvalidPattern`] for the first rule that does not compile,
    /// and [`ExtractionError::Policy`] for an out-of-range `utc_offset_hours`.
    pub(crate) fn compile(&self) -> Result<CompiledPolicy, ExtractionError> {
        let offset = FixedOffset::east_opt(self.utc_offset_hours.saturating_mul(3600))
            .ok_or_else(|| ExtractionError::Policy {
                path: "<policy>".to_string(),
                reason: format!("utc_offset_hours out of range: {}", self.utc_offset_hours),
            })?;

        Ok(CompiledPolicy {
            search_url: self.search_url.clone(),
            place_url: self.place_url.clone(),
            ranking_frame_segment: non_blank(self.ranking_frame_segment.as_deref()),
            review_frame_segment: non_blank(self.review_frame_segment.as_deref()),
            ranking: CompiledRanking {
                items: compile_selectors(&self.ranking.items)?,
                skip: compile_selectors(&self.ranking.skip)?,
                item_id: compile_chain(&self.ranking.item_id)?,
                result_count: compile_chain(&self.ranking.result_count)?,
                next_page: compile_chain(&self.ranking.next_page)?,
            },
            reviews: CompiledReviews {
                items: compile_selectors(&self.reviews.items)?,
                external_id: compile_chain(&self.reviews.external_id)?,
                kind: compile_chain(&self.reviews.kind)?,
                text: compile_chain(&self.reviews.text)?,
                rating: compile_chain(&self.reviews.rating)?,
                author: compile_chain(&self.reviews.author)?,
                published_at: compile_chain(&self.reviews.published_at)?,
                offset,
            },
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn compile_selector(raw: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(raw).map_err(|e| ExtractionError::InvalidSelector {
        selector: raw.to_string(),
        reason: format!("{e:?}"),
    })
}

fn compile_selectors(raw: &[String]) -> Result<Vec<Selector>, ExtractionError> {
    raw.iter().map(|s| compile_selector(s)).collect()
}

fn compile_chain(rules: &[FieldRule]) -> Result<Vec<CompiledRule>, ExtractionError> {
    rules
        .iter()
        .map(|rule| {
            let selector = rule.selector.as_deref().map(compile_selector).transpose()?;
            let pattern = rule
                .pattern
                .as_deref()
                .map(|p| {
                    Regex::new(p).map_err(|source| ExtractionError::InvalidPattern {
                        pattern: p.to_string(),
                        source,
                    })
                })
                .transpose()?;
            Ok(CompiledRule {
                selector,
                attr: rule.attr.clone(),
                pattern,
            })
        })
        .collect()
}

#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub selector: Option<Selector>,
    pub attr: Option<String>,
    pub pattern: Option<Regex>,
}

impl CompiledRule {
    /// Value produced by this rule within `scope`, or `None` when nothing
    /// non-empty matched.
    pub(crate) fn apply(&self, scope: ElementRef<'_>) -> Option<String> {
        match &self.selector {
            Some(selector) => scope
                .select(selector)
                .find_map(|el| self.value_of(el)),
            None => self.value_of(scope),
        }
    }

    fn value_of(&self, el: ElementRef<'_>) -> Option<String> {
        let raw = match &self.attr {
            Some(attr) => el.value().attr(attr)?.trim().to_string(),
            None => collapse_whitespace(el.text()),
        };
        let value = match &self.pattern {
            Some(re) => {
                let caps = re.captures(&raw)?;
                caps.get(1).or_else(|| caps.get(0))?.as_str().trim().to_string()
            }
            None => raw,
        };
        (!value.is_empty()).then_some(value)
    }
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug)]
pub(crate) struct CompiledRanking {
    pub items: Vec<Selector>,
    pub skip: Vec<Selector>,
    pub item_id: Vec<CompiledRule>,
    pub result_count: Vec<CompiledRule>,
    pub next_page: Vec<CompiledRule>,
}

#[derive(Debug)]
pub(crate) struct CompiledReviews {
    pub items: Vec<Selector>,
    pub external_id: Vec<CompiledRule>,
    pub kind: Vec<CompiledRule>,
    pub text: Vec<CompiledRule>,
    pub rating: Vec<CompiledRule>,
    pub author: Vec<CompiledRule>,
    pub published_at: Vec<CompiledRule>,
    pub offset: FixedOffset,
}

#[derive(Debug)]
pub(crate) struct CompiledPolicy {
    pub search_url: String,
    pub place_url: String,
    pub ranking_frame_segment: Option<String>,
    pub review_frame_segment: Option<String>,
    pub ranking: CompiledRanking,
    pub reviews: CompiledReviews,
}
