//! Calendar dates out of narrative Russian month phrases.
//!
//! Russian month names inflect ("февраль", "февраля", "феврале"), so the
//! map below holds stems matched by prefix, never by equality.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Month stems in their inflection-safe prefix form.
pub const MONTH_STEMS: [(&str, u32); 13] = [
    ("январ", 1),
    ("феврал", 2),
    ("март", 3),
    ("апрел", 4),
    ("мая", 5),
    ("мае", 5),
    ("июн", 6),
    ("июл", 7),
    ("август", 8),
    ("сентябр", 9),
    ("октябр", 10),
    ("ноябр", 11),
    ("декабр", 12),
];

/// Day span substituted for a bare month mention ("в октябре"): roughly
/// mid-month, 5th through 25th. A deliberate approximation, not a guess at
/// real fixtures.
const BARE_MONTH_SPAN: (u32, u32) = (5, 25);

pub fn month_number(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    MONTH_STEMS
        .iter()
        .find(|(stem, _)| lower.starts_with(stem))
        .map(|&(_, num)| num)
}

fn stems_alternation() -> String {
    MONTH_STEMS
        .iter()
        .map(|(stem, _)| *stem)
        .collect::<Vec<_>>()
        .join("|")
}

fn day_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(\d{{1,2}})\s+({})", stems_alternation()))
            .expect("day-month pattern is valid")
    })
}

fn day_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(\d{{1,2}})-(\d{{1,2}})\s+({})", stems_alternation()))
            .expect("day-range pattern is valid")
    })
}

fn bare_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&stems_alternation()).expect("month pattern is valid"))
}

/// Extract a `(start, end)` date pair from a narrative phrase.
///
/// Patterns tried in priority order:
/// 1. two explicit day+month mentions ("с 5 февраля по 10 мая")
/// 2. a day range sharing one month ("12-15 мая")
/// 3. a bare month mention, expanded to the 5th..25th
///
/// Anything else yields `(None, None)`.
pub fn find_dates(txt: &str, year: i32) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let pairs: Vec<(u32, u32)> = day_month_re()
        .captures_iter(txt)
        .filter_map(|cap| {
            let day = cap[1].parse().ok()?;
            let month = month_number(&cap[2])?;
            Some((day, month))
        })
        .collect();
    if pairs.len() >= 2 {
        let start = date(year, pairs[0].1, pairs[0].0);
        let end = date(year, pairs[1].1, pairs[1].0);
        if let (Some(start), Some(end)) = (start, end) {
            return (Some(start), Some(end));
        }
    }

    if let Some(cap) = day_range_re().captures(txt) {
        let days = (cap[1].parse::<u32>().ok(), cap[2].parse::<u32>().ok());
        if let ((Some(day_start), Some(day_end)), Some(month)) = (days, month_number(&cap[3])) {
            let start = date(year, month, day_start);
            let end = date(year, month, day_end);
            if let (Some(start), Some(end)) = (start, end) {
                return (Some(start), Some(end));
            }
        }
    }

    if let Some(m) = bare_month_re().find(txt) {
        if let Some(month) = month_number(m.as_str()) {
            return (
                date(year, month, BARE_MONTH_SPAN.0),
                date(year, month, BARE_MONTH_SPAN.1),
            );
        }
    }

    (None, None)
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_range_with_two_months() {
        let (start, end) = find_dates("проходил с 5 февраля по 10 мая", 1978);
        assert_eq!(start, Some(d(1978, 2, 5)));
        assert_eq!(end, Some(d(1978, 5, 10)));
    }

    #[test]
    fn test_day_range_single_month() {
        let (start, end) = find_dates("матчи 12-15 мая", 1960);
        assert_eq!(start, Some(d(1960, 5, 12)));
        assert_eq!(end, Some(d(1960, 5, 15)));
    }

    #[test]
    fn test_bare_month_defaults_to_mid_month() {
        let (start, end) = find_dates("в октябре", 1965);
        assert_eq!(start, Some(d(1965, 10, 5)));
        assert_eq!(end, Some(d(1965, 10, 25)));
    }

    #[test]
    fn test_inflected_month_matches_by_prefix() {
        let (start, end) = find_dates("в конце сентября", 1949);
        assert_eq!(start, Some(d(1949, 9, 5)));
        assert_eq!(end, Some(d(1949, 9, 25)));
    }

    #[test]
    fn test_single_day_month_falls_back_to_bare_month() {
        // One explicit pair is not a range; the month alone drives the span.
        let (start, end) = find_dates("открытие 7 мая", 1970);
        assert_eq!(start, Some(d(1970, 5, 5)));
        assert_eq!(end, Some(d(1970, 5, 25)));
    }

    #[test]
    fn test_unparsable_text() {
        assert_eq!(find_dates("финальный турнир в Москве", 1978), (None, None));
        assert_eq!(find_dates("", 1978), (None, None));
    }

    #[test]
    fn test_month_number_prefixes() {
        assert_eq!(month_number("февраля"), Some(2));
        assert_eq!(month_number("феврале"), Some(2));
        assert_eq!(month_number("мая"), Some(5));
        assert_eq!(month_number("мартовский"), Some(3));
        assert_eq!(month_number("зимой"), None);
    }
}
