//! Team list import.
//!
//! Archival team registers arrive as simple list markup, one team per
//! `<li>` item with the city, a founding/disbanding span and a free-text
//! tail; lines without the marker continue the previous team's story:
//!
//! ```text
//! <li><b>Динамо</b> Москва (1936-1941) воссоздана в 1946
//! ещё строка истории
//! <li><b>Спартак</b> Ленинград (осн. 1946-)
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::models::TeamEntry;

const ITEM_MARKER: &str = "<li>";

fn item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<li>(.+) \(([^-]*)-?([^-]*)\)(.*)").expect("item pattern is valid")
    })
}

/// Split a year cell into its textual qualifier and the year proper:
/// "осн. 1936" → ("осн. ", Some(1936)); "" → ("", None).
fn init_date(prefix_year: &str) -> (String, Option<i32>) {
    let year = prefix_year
        .split_whitespace()
        .last()
        .and_then(|w| w.parse::<i32>().ok());
    match year {
        Some(y) => {
            let year_str = y.to_string();
            let prefix = match prefix_year.find(&year_str) {
                Some(pos) => &prefix_year[..pos],
                None => prefix_year,
            };
            (prefix.to_string(), Some(y))
        }
        None => (prefix_year.to_string(), None),
    }
}

/// Parse a team-list block into entries. Malformed items are logged and
/// skipped; continuation lines extend the story of the previous entry.
pub fn parse_team_list(txt: &str) -> Vec<TeamEntry> {
    let mut out: Vec<TeamEntry> = Vec::new();

    for line in txt.lines() {
        if !line.starts_with(ITEM_MARKER) {
            if let Some(last) = out.last_mut() {
                if !line.trim().is_empty() {
                    if !last.story.is_empty() {
                        last.story.push('\n');
                    }
                    last.story.push_str(line.trim());
                }
            }
            continue;
        }
        let Some(cap) = item_re().captures(line) else {
            log::warn!("unreadable team list item: '{line}'");
            continue;
        };
        let team_and_city = cap[1].replace("<b>", "").replace("</b>", "");
        let team_and_city = team_and_city.trim();
        // The city is the last word; everything before it is the name.
        let (name, city) = match team_and_city.rsplit_once(' ') {
            Some((name, city)) => (name.trim().to_string(), city.to_string()),
            None => (team_and_city.to_string(), String::new()),
        };
        let (year_prefix, year) = init_date(cap[2].trim());
        let (disband_year_prefix, disband_year) = init_date(cap[3].trim());

        out.push(TeamEntry {
            name,
            city,
            year,
            year_prefix,
            disband_year,
            disband_year_prefix,
            story: cap[4].trim().to_string(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_item() {
        let out = parse_team_list("<li><b>Динамо</b> Москва (1936-1941) воссоздана в 1946");
        assert_eq!(out.len(), 1);
        let t = &out[0];
        assert_eq!(t.name, "Динамо");
        assert_eq!(t.city, "Москва");
        assert_eq!(t.year, Some(1936));
        assert_eq!(t.disband_year, Some(1941));
        assert_eq!(t.story, "воссоздана в 1946");
    }

    #[test]
    fn test_year_prefix_preserved() {
        let out = parse_team_list("<li>Спартак Ленинград (осн. 1946-)");
        let t = &out[0];
        assert_eq!(t.year_prefix, "осн. ");
        assert_eq!(t.year, Some(1946));
        assert_eq!(t.disband_year, None);
    }

    #[test]
    fn test_continuation_lines_extend_story() {
        let txt = "<li>Динамо Москва (1936-1941) первая строка\nвторая строка\nтретья";
        let out = parse_team_list(txt);
        assert_eq!(out[0].story, "первая строка\nвторая строка\nтретья");
    }

    #[test]
    fn test_malformed_item_skipped() {
        let txt = "<li>строка без скобок\n<li>Динамо Москва (1936-1941)";
        let out = parse_team_list(txt);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Динамо");
    }

    #[test]
    fn test_multiple_items() {
        let txt = "<li>Динамо Москва (1936-1941)\n<li>Спартак Ленинград (1946-1960)";
        let out = parse_team_list(txt);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].city, "Ленинград");
        assert_eq!(out[1].disband_year, Some(1960));
    }
}
