use scraper::{ElementRef, Html, Selector};

use crate::extract::{first_value, parse_count};
use crate::policy::CompiledRanking;

/// What one page of search results says about the target.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RankingPage {
    /// 1-based position of the target among the counted entries on this page.
    pub position: Option<usize>,
    /// Number of counted entries on this page.
    pub counted: usize,
    pub result_count: Option<i32>,
    pub next_page: Option<String>,
}

/// Scans one result page for `target_id`.
///
/// Entries come from the first item selector that matches anything. Entries
/// hit by a skip selector (sponsored slots and the like) are not counted.
/// Comparison with `target_id` ignores surrounding whitespace.
pub(crate) fn scan_page(html: &str, selectors: &CompiledRanking, target_id: &str) -> RankingPage {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let target_id = target_id.trim();

    let result_count = first_value(root, &selectors.result_count)
        .as_deref()
        .and_then(parse_count);
    let next_page = first_value(root, &selectors.next_page);

    let Some(items) = first_matching(&document, &selectors.items) else {
        tracing::debug!("no result entries matched any item selector");
        return RankingPage {
            result_count,
            next_page,
            ..RankingPage::default()
        };
    };

    let mut counted = 0usize;
    let mut position = None;
    for item in items {
        if is_skipped(item, &selectors.skip) {
            continue;
        }
        counted += 1;
        if position.is_none()
            && first_value(item, &selectors.item_id).is_some_and(|id| id.trim() == target_id)
        {
            position = Some(counted);
        }
    }

    RankingPage {
        position,
        counted,
        result_count,
        next_page,
    }
}

fn first_matching<'a>(document: &'a Html, candidates: &[Selector]) -> Option<Vec<ElementRef<'a>>> {
    candidates.iter().find_map(|selector| {
        let items: Vec<_> = document.select(selector).collect();
        (!items.is_empty()).then_some(items)
    })
}

fn is_skipped(item: ElementRef<'_>, skip: &[Selector]) -> bool {
    skip.iter()
        .any(|selector| selector.matches(&item) || item.select(selector).next().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{FieldRule, RankingSelectors, SelectorPolicy};

    fn selectors() -> CompiledRanking {
        let policy = SelectorPolicy {
            ranking: RankingSelectors {
                items: vec!["ul.primary > li".into(), "ul.results > li".into()],
                skip: vec![".ad".into()],
                item_id: vec![FieldRule::attr(None, "data-id")],
                result_count: vec![FieldRule::text(".count")],
                next_page: vec![FieldRule::attr(Some("a.next"), "href")],
            },
            ..SelectorPolicy::default()
        };
        policy.compile().unwrap().ranking
    }

    #[test]
    fn finds_position_excluding_sponsored_entries() {
        let html = r#"
            <span class="count">1,024</span>
            <ul class="results">
              <li data-id="np-9"><span class="ad">AD</span></li>
              <li data-id="np-5"></li>
              <li class="ad" data-id="np-7"></li>
              <li data-id="np-6"></li>
              <li data-id=" np-1 "></li>
            </ul>
            <a class="next" href="?page=2">next</a>"#;

        let page = scan_page(html, &selectors(), "np-1");
        assert_eq!(page.position, Some(3));
        assert_eq!(page.counted, 3);
        assert_eq!(page.result_count, Some(1024));
        assert_eq!(page.next_page.as_deref(), Some("?page=2"));
    }

    #[test]
    fn target_absent_reports_no_position() {
        let html = r#"<ul class="results"><li data-id="a"></li><li data-id="b"></li></ul>"#;
        let page = scan_page(html, &selectors(), "np-1");
        assert_eq!(page.position, None);
        assert_eq!(page.counted, 2);
        assert_eq!(page.result_count, None);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn zero_results_is_not_an_error() {
        let page = scan_page("<p>검색결과가 없습니다</p>", &selectors(), "np-1");
        assert_eq!(page, RankingPage::default());
    }

    #[test]
    fn entries_without_an_id_still_count() {
        let html = r#"<ul class="results"><li></li><li data-id="np-1"></li></ul>"#;
        assert_eq!(scan_page(html, &selectors(), "np-1").position, Some(2));
    }
}
