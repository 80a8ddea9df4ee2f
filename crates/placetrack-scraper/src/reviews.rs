use placetrack_core::ReviewKind;
use scraper::Html;

use crate::extract::{first_value, parse_published_at, parse_rating};
use crate::policy::CompiledReviews;
use crate::types::RawReview;

/// Extracts up to `limit` reviews from `html`, in document order.
///
/// Items come from the first item selector that matches anything. Every field
/// is read through its own fallback chain; a chain that yields nothing leaves
/// the field `None`.
pub(crate) fn extract_reviews(html: &str, selectors: &CompiledReviews, limit: usize) -> Vec<RawReview> {
    if limit == 0 {
        return Vec::new();
    }

    let document = Html::parse_document(html);
    let Some(item_selector) = selectors
        .items
        .iter()
        .find(|selector| document.select(selector).next().is_some())
    else {
        tracing::debug!("no review items matched any item selector");
        return Vec::new();
    };

    document
        .select(item_selector)
        .take(limit)
        .map(|item| RawReview {
            external_id: first_value(item, &selectors.external_id),
            kind: first_value(item, &selectors.kind).and_then(|m| ReviewKind::classify(&m)),
            text: first_value(item, &selectors.text),
            rating: first_value(item, &selectors.rating).and_then(|r| parse_rating(&r)),
            author: first_value(item, &selectors.author),
            published_at: first_value(item, &selectors.published_at)
                .and_then(|p| parse_published_at(&p, selectors.offset)),
        })
        .collect()
}
