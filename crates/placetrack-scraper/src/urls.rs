//! URL construction for the search and listing surfaces.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

use crate::error::ExtractionError;

/// Everything except RFC 3986 unreserved characters is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Search text sent to the platform: the region, when present, is prefixed
/// to the keyword the way a user would type it.
pub(crate) fn search_query(keyword: &str, region: Option<&str>) -> String {
    match region.map(str::trim).filter(|r| !r.is_empty()) {
        Some(region) => format!("{region} {}", keyword.trim()),
        None => keyword.trim().to_string(),
    }
}

/// Fill `{query}` in a search URL template.
pub(crate) fn search_url(template: &str, keyword: &str, region: Option<&str>) -> String {
    let query = search_query(keyword, region);
    template.replace(
        "{query}",
        &utf8_percent_encode(&query, COMPONENT).to_string(),
    )
}

/// Fill `{id}` in a listing URL template.
pub(crate) fn place_url(template: &str, external_id: &str) -> String {
    template.replace(
        "{id}",
        &utf8_percent_encode(external_id.trim(), COMPONENT).to_string(),
    )
}

/// Resolve `href` against the document it was found in.
pub(crate) fn join(base: &str, href: &str) -> Result<String, ExtractionError> {
    let base_url = Url::parse(base).map_err(|e| ExtractionError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;
    base_url
        .join(href.trim())
        .map(String::from)
        .map_err(|e| ExtractionError::InvalidUrl {
            url: href.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_prefixed_to_query() {
        assert_eq!(search_query("coffee", Some("Seoul")), "Seoul coffee");
        assert_eq!(search_query(" coffee ", Some("  ")), "coffee");
        assert_eq!(search_query("coffee", None), "coffee");
    }

    #[test]
    fn search_url_encodes_query() {
        let url = search_url("https://example.com/search?q={query}", "커피", Some("Seoul"));
        assert_eq!(
            url,
            "https://example.com/search?q=Seoul%20%EC%BB%A4%ED%94%BC"
        );
    }

    #[test]
    fn place_url_substitutes_id() {
        assert_eq!(
            place_url("https://example.com/place/{id}", "np-1"),
            "https://example.com/place/np-1"
        );
    }

    #[test]
    fn join_resolves_relative_links() {
        assert_eq!(
            join("https://example.com/list?page=1", "?page=2").unwrap(),
            "https://example.com/list?page=2"
        );
        assert_eq!(
            join("https://example.com/a/b", "/c").unwrap(),
            "https://example.com/c"
        );
    }

    #[test]
    fn join_rejects_invalid_base() {
        assert!(matches!(
            join("not a url", "/c"),
            Err(ExtractionError::InvalidUrl { .. })
        ));
    }
}
