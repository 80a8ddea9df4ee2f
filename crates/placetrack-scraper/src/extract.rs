//! Fallback-chain evaluation and value parsing shared by the ranking and
//! review extractors.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use regex::Regex;
use scraper::ElementRef;

use crate::policy::CompiledRule;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));
static DIGIT_GROUPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digit regex"));
static GROUPED_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("valid count regex"));

/// First non-empty value produced by `chain` within `scope`.
pub(crate) fn first_value(scope: ElementRef<'_>, chain: &[CompiledRule]) -> Option<String> {
    chain.iter().find_map(|rule| rule.apply(scope))
}

/// First number in the text with thousands separators dropped: `"1,234개"`
/// → `1234`, `"12 of 30"` → `12`.
pub(crate) fn parse_count(raw: &str) -> Option<i32> {
    let run = GROUPED_COUNT.find(raw)?.as_str().replace(',', "");
    run.parse().ok()
}

/// First number in the text, rounded to the nearest integer.
///
/// `"별점 4.5"` → `5`, `"3"` → `3`. Range checks happen at record time.
pub(crate) fn parse_rating(raw: &str) -> Option<i16> {
    let number: f64 = NUMBER.find(raw)?.as_str().parse().ok()?;
    let rounded = number.round();
    if rounded > f64::from(i16::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(rounded as i16)
}

/// Parses a publish timestamp.
///
/// RFC 3339 values keep their own zone. Otherwise the first three digit
/// groups are read as year, month, day (`2024-01-15`, `2024.01.15`,
/// `24.1.15.월`), a two-digit year is taken as 20xx, and the date is placed at
/// local midnight in `offset`.
pub(crate) fn parse_published_at(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let mut groups = DIGIT_GROUPS.find_iter(raw).map(|m| m.as_str());
    let year_raw = groups.next()?;
    let month: u32 = groups.next()?.parse().ok()?;
    let day: u32 = groups.next()?.parse().ok()?;
    let year: i32 = match year_raw.len() {
        4 => year_raw.parse().ok()?,
        1 | 2 => 2000 + year_raw.parse::<i32>().ok()?,
        _ => return None,
    };

    let midnight = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn count_strips_separators() {
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count("42건"), Some(42));
        assert_eq!(parse_count("none"), None);
    }

    #[test]
    fn count_reads_only_the_first_number() {
        assert_eq!(parse_count("12 of 30"), Some(12));
        assert_eq!(parse_count("1,234 results, page 2"), Some(1234));
        assert_eq!(parse_count("1-10 of 1,234"), Some(1));
    }

    #[test]
    fn rating_takes_first_number_and_rounds() {
        assert_eq!(parse_rating("4"), Some(4));
        assert_eq!(parse_rating("별점 4.5점"), Some(5));
        assert_eq!(parse_rating("rating 3.2 of 5"), Some(3));
        assert_eq!(parse_rating("no stars"), None);
    }

    #[test]
    fn published_at_accepts_rfc3339() {
        let ts = parse_published_at("2024-01-15T10:30:00+09:00", kst()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T01:30:00+00:00");
    }

    #[test]
    fn published_at_accepts_plain_dates_at_local_midnight() {
        let expected = "2024-01-14T15:00:00+00:00";
        assert_eq!(parse_published_at("2024-01-15", kst()).unwrap().to_rfc3339(), expected);
        assert_eq!(parse_published_at("2024.01.15.", kst()).unwrap().to_rfc3339(), expected);
        assert_eq!(parse_published_at("24.1.15.월", kst()).unwrap().to_rfc3339(), expected);
    }

    #[test]
    fn published_at_rejects_garbage() {
        assert_eq!(parse_published_at("yesterday", kst()), None);
        assert_eq!(parse_published_at("2024.13.40", kst()), None);
        assert_eq!(parse_published_at("123.1.1", kst()), None);
    }
}
