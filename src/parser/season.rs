//! Season header extraction.
//!
//! A season document opens with a title line ("Чемпионат СССР 1978"),
//! optionally followed by narrative that may name the date span. The
//! header grammar is the one place a parse is allowed to fail outright: a
//! blob with no recognisable "title + year" line cannot be attributed to a
//! season and guessing a title would poison the record.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::models::SeasonHeader;

use super::dates::find_dates;

#[derive(Debug, Error)]
pub enum SeasonParseError {
    #[error("empty season text")]
    Empty,
    #[error("header line does not match 'title + year': '{0}'")]
    BadHeader(String),
    #[error("year out of range: '{0}'")]
    BadYear(String),
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Title is everything non-digit; the year part allows "1975",
    // "1975/77" and "1999/2001".
    RE.get_or_init(|| Regex::new(r"^(\D*)([\d/-]{4,9})$").expect("header pattern is valid"))
}

/// Parse a season header block into title, year(s), date span and story.
///
/// The date span defaults to the full header year; a narrative line with a
/// recognisable date phrase overrides it.
pub fn parse_season(txt: &str) -> Result<SeasonHeader, SeasonParseError> {
    let mut lines = txt.lines();
    let first = lines.next().ok_or(SeasonParseError::Empty)?.trim();
    let rest: Vec<&str> = lines.collect();

    let cap = header_re()
        .captures(first)
        .ok_or_else(|| SeasonParseError::BadHeader(first.to_string()))?;
    let title = cap[1].trim().to_string();
    let (year, year_end) = parse_year_span(&cap[2])?;

    let (mut date_start, mut date_end) = SeasonHeader::full_year_span(year);
    for line in &rest {
        if line.trim().is_empty() {
            continue;
        }
        if let (Some(start), Some(end)) = find_dates(line, year) {
            date_start = start;
            date_end = end;
            break;
        }
    }

    Ok(SeasonHeader {
        title,
        year,
        year_end,
        date_start,
        date_end,
        story: rest.join("\n"),
    })
}

/// "1975" → (1975, None); "1975/77" → (1975, Some(1977));
/// "1999/2001" → (1999, Some(2001)).
fn parse_year_span(span: &str) -> Result<(i32, Option<i32>), SeasonParseError> {
    let bad_year = || SeasonParseError::BadYear(span.to_string());
    let mut parts = span.splitn(2, ['/', '-']);
    let year: i32 = parts
        .next()
        .and_then(|y| y.parse().ok())
        .ok_or_else(bad_year)?;
    if !(1800..=2100).contains(&year) {
        return Err(bad_year());
    }
    let year_end = match parts.next() {
        None | Some("") => None,
        Some(tail) => {
            let tail_num: i32 = tail.parse().map_err(|_| bad_year())?;
            // Two-digit second year borrows the century from the first.
            let full = if tail_num < 100 {
                year - year % 100 + tail_num
            } else {
                tail_num
            };
            Some(full)
        }
    };
    Ok((year, year_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_title_year_and_full_year_default() {
        let header = parse_season("Чемпионат СССР 1978\n").unwrap();
        assert_eq!(header.title, "Чемпионат СССР");
        assert_eq!(header.year, 1978);
        assert_eq!(header.year_end, None);
        assert_eq!(header.date_start, d(1978, 1, 1));
        assert_eq!(header.date_end, d(1978, 12, 31));
    }

    #[test]
    fn test_body_date_phrase_overrides_default() {
        let txt = "Чемпионат СССР 1978\nМатчи проходили с 5 февраля по 10 мая.\nФинал в Москве.";
        let header = parse_season(txt).unwrap();
        assert_eq!(header.date_start, d(1978, 2, 5));
        assert_eq!(header.date_end, d(1978, 5, 10));
        assert!(header.story.contains("Финал в Москве."));
    }

    #[test]
    fn test_year_range_short_form() {
        let header = parse_season("Первенство ВЦСПС 1975/77\n").unwrap();
        assert_eq!(header.year, 1975);
        assert_eq!(header.year_end, Some(1977));
    }

    #[test]
    fn test_year_range_long_form() {
        let header = parse_season("Кубок городов 1999/2001\n").unwrap();
        assert_eq!(header.year, 1999);
        assert_eq!(header.year_end, Some(2001));
    }

    #[test]
    fn test_headerless_blob_is_an_error() {
        let err = parse_season("просто какой-то текст без года").unwrap_err();
        assert!(matches!(err, SeasonParseError::BadHeader(_)));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(parse_season(""), Err(SeasonParseError::Empty)));
    }
}
