use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tournament identity and date span extracted from a season header blurb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonHeader {
    /// Tournament title with the year stripped, e.g. "Чемпионат СССР".
    pub title: String,
    pub year: i32,
    /// Second year of a "1975/77" style range, if present.
    pub year_end: Option<i32>,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Narrative remainder of the header block.
    pub story: String,
}

impl SeasonHeader {
    /// Span covering the whole header year, used when the body names no dates.
    pub fn full_year_span(year: i32) -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(year, 1, 1).expect("jan 1 is always valid"),
            NaiveDate::from_ymd_opt(year, 12, 31).expect("dec 31 is always valid"),
        )
    }
}
