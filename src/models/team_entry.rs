use serde::{Deserialize, Serialize};

/// One team parsed from an archival team list
/// (`<li><b>Динамо</b> Москва (1936-1941) ...`).
///
/// Founding/disbanding years keep their textual qualifier separately, so
/// "осн. 1936" round-trips as prefix "осн. " plus year 1936.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    pub city: String,
    pub year: Option<i32>,
    pub year_prefix: String,
    pub disband_year: Option<i32>,
    pub disband_year_prefix: String,
    pub story: String,
}
