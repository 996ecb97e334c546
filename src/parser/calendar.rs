//! Match calendars out of loosely marked-up narrative text.
//!
//! The source is a season's free-text match diary: date headings, match
//! blocks wrapped in paragraph markers, commentary in between. Dates are
//! tracked with a rolling cursor — a blank line means "the next day", an
//! explicit "12 мая" heading pins the cursor. The walk is an explicit
//! state machine so each transition can be checked on its own; a line that
//! fits no grammar is logged and skipped, never fatal.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::models::MatchRecord;
use crate::registry::SeasonContext;

use super::dates::month_number;
use super::similarity_pick;

/// Markup family of the source corpus. Constants so a sibling corpus with
/// different markers only touches this block.
const MATCH_OPEN: &str = "<p>";
const MATCH_CLOSE: &str = "</p>";
const QUOTE_OPEN: &str = "<blockquote>";
const QUOTE_CLOSE: &str = "</blockquote>";

/// Scan position within the line walk.
#[derive(Debug)]
enum ScanState {
    /// Between matches: date headings, blank lines and block openers.
    AwaitingDate,
    /// Saw a block opener, the match line itself is still ahead.
    AwaitingTeams,
    /// Collecting commentary for an open match until the block closes.
    InsideMatch(Box<MatchRecord>),
}

pub struct CalendarParser<'a> {
    ctx: &'a SeasonContext,
    cursor: NaiveDate,
    date_unknown: bool,
}

impl<'a> CalendarParser<'a> {
    pub fn new(ctx: &'a SeasonContext) -> Self {
        Self {
            ctx,
            cursor: ctx.date_start,
            date_unknown: false,
        }
    }

    /// Walk the block and emit one record per match found, in source order.
    pub fn parse(mut self, txt: &str) -> Vec<MatchRecord> {
        let lines: Vec<&str> = txt.lines().collect();
        let mut out: Vec<MatchRecord> = Vec::new();
        let mut state = ScanState::AwaitingDate;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i].trim();
            state = match state {
                ScanState::AwaitingDate => {
                    if line.is_empty() {
                        // The unknown flag covers only matches directly
                        // under a placeholder heading; rolling past it
                        // resumes concrete dates.
                        self.cursor = self.cursor.succ_opt().unwrap_or(self.cursor);
                        self.date_unknown = false;
                        ScanState::AwaitingDate
                    } else if let Some((date, unknown)) = self.parse_date_line(line) {
                        self.cursor = date;
                        self.date_unknown = unknown;
                        ScanState::AwaitingDate
                    } else if line.starts_with(QUOTE_OPEN) {
                        // Trailing commentary block: belongs to the match
                        // that was just emitted.
                        let story = collect_quote(&lines, &mut i);
                        if !story.is_empty() {
                            match out.last_mut() {
                                Some(last) => last.append_story(&story),
                                None => log::warn!("commentary block before any match: '{story}'"),
                            }
                        }
                        ScanState::AwaitingDate
                    } else if let Some(rest) = line.strip_prefix(MATCH_OPEN) {
                        let rest = rest.trim();
                        if rest.is_empty() {
                            ScanState::AwaitingTeams
                        } else {
                            self.open_match(rest, &mut out)
                        }
                    } else {
                        // Narrative between matches, nothing to keep here.
                        ScanState::AwaitingDate
                    }
                }
                ScanState::AwaitingTeams => {
                    if line.is_empty() || line == MATCH_OPEN {
                        ScanState::AwaitingTeams
                    } else {
                        self.open_match(line, &mut out)
                    }
                }
                ScanState::InsideMatch(mut m) => {
                    if line.starts_with(QUOTE_OPEN) {
                        let story = collect_quote(&lines, &mut i);
                        if !story.is_empty() {
                            m.append_story(&story);
                        }
                        ScanState::InsideMatch(m)
                    } else if line.contains(MATCH_CLOSE) {
                        let leading = line.trim_end_matches(MATCH_CLOSE).trim();
                        if !leading.is_empty() {
                            m.append_story(leading);
                        }
                        out.push(self.finalize(*m));
                        ScanState::AwaitingDate
                    } else if !line.is_empty() {
                        m.append_story(line);
                        ScanState::InsideMatch(m)
                    } else {
                        ScanState::InsideMatch(m)
                    }
                }
            };
            i += 1;
        }

        // A block left open at EOF still yields its match.
        if let ScanState::InsideMatch(m) = state {
            out.push(self.finalize(*m));
        }
        out
    }

    /// Read a candidate match line. A trailing close marker means the
    /// whole block sat on one line, so the match is finalized right away
    /// instead of waiting for commentary.
    fn open_match(&self, line: &str, out: &mut Vec<MatchRecord>) -> ScanState {
        let Some(inline) = line.strip_suffix(MATCH_CLOSE) else {
            return self.try_match_line(line);
        };
        let inline = inline.trim();
        if !inline.is_empty() {
            match self.parse_match_line(inline) {
                Some(m) => out.push(self.finalize(m)),
                None => log::warn!("unparseable match line: '{inline}'"),
            }
        }
        ScanState::AwaitingDate
    }

    fn try_match_line(&self, line: &str) -> ScanState {
        match self.parse_match_line(line) {
            Some(m) => ScanState::InsideMatch(Box::new(m)),
            None => {
                log::warn!("unparseable match line: '{line}'");
                ScanState::AwaitingTeams
            }
        }
    }

    /// Date heading: `12 мая`, or `?? мая` when the archive lost the day
    /// (pins the cursor to the 1st and flags every match under it).
    fn parse_date_line(&self, line: &str) -> Option<(NaiveDate, bool)> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^(\d{1,2}|\?+)\s+([а-яА-Я]+)$").expect("date heading pattern is valid")
        });
        let cap = re.captures(line)?;
        let month = month_number(&cap[2])?;
        let year = self.cursor.year();
        if let Ok(day) = cap[1].parse::<u32>() {
            NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, false))
        } else {
            NaiveDate::from_ymd_opt(year, month, 1).map(|d| (d, true))
        }
    }

    /// Match line: `<home> - <away> - <outcome>` where outcome is a
    /// numeric score (optional halftime in parens, optional scorer tail)
    /// or a narrative phrase resolved against the two team names.
    fn parse_match_line(&self, line: &str) -> Option<MatchRecord> {
        let parts: Vec<&str> = line.splitn(3, " - ").collect();
        if parts.len() < 3 {
            return None;
        }
        let (home_label, away_label, outcome) = (parts[0].trim(), parts[1].trim(), parts[2].trim());
        let home_id = self.ctx.resolve_roster(home_label)?;
        let away_id = self.ctx.resolve_roster(away_label)?;
        let mut m = MatchRecord::new(home_id, away_id);

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^(\d{1,3}):(\d{1,3})\s*(?:\((\d{1,3}):(\d{1,3})\))?\s*(?:-\s*(.+))?$")
                .expect("outcome pattern is valid")
        });
        if let Some(cap) = re.captures(outcome) {
            m.home_score = cap[1].parse().ok();
            m.away_score = cap[2].parse().ok();
            m.home_halfscore = cap.get(3).and_then(|v| v.as_str().parse().ok());
            m.away_halfscore = cap.get(4).and_then(|v| v.as_str().parse().ok());
            if let Some(scorers) = cap.get(5) {
                m.append_story(scorers.as_str().trim());
            }
            return Some(m);
        }

        let phrase = outcome.to_lowercase();
        if phrase.contains("нич") {
            m.home_score = Some(1);
            m.away_score = Some(1);
            return Some(m);
        }
        if phrase.contains("выигр") || phrase.contains("побед") {
            // "выиграло Динамо": the winning side is named in the phrase.
            if similarity_pick(outcome, home_label, away_label) {
                m.home_score = Some(1);
                m.away_score = Some(0);
            } else {
                m.home_score = Some(0);
                m.away_score = Some(1);
            }
            return Some(m);
        }
        None
    }

    fn finalize(&self, mut m: MatchRecord) -> MatchRecord {
        m.date = Some(self.cursor);
        m.date_unknown = self.date_unknown;
        m.tourn_season_id = Some(self.ctx.id);
        m.set_tech_score();
        m
    }
}

/// Consume a `<blockquote>`…`</blockquote>` run starting at `*i`, leaving
/// `*i` on the closing line. Returns the collected inner text.
fn collect_quote(lines: &[&str], i: &mut usize) -> String {
    let mut collected: Vec<String> = Vec::new();
    loop {
        let line = lines[*i]
            .trim()
            .trim_start_matches(QUOTE_OPEN)
            .trim_end_matches(QUOTE_CLOSE)
            .trim()
            .to_string();
        if !line.is_empty() {
            collected.push(line);
        }
        if lines[*i].contains(QUOTE_CLOSE) || *i + 1 >= lines.len() {
            break;
        }
        *i += 1;
    }
    collected.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn ctx() -> SeasonContext {
        let mut roster = BTreeMap::new();
        roster.insert("Динамо".to_string(), 1);
        roster.insert("Спартак".to_string(), 2);
        roster.insert("Локомотив".to_string(), 3);
        SeasonContext {
            id: 7,
            date_start: NaiveDate::from_ymd_opt(1958, 5, 1).unwrap(),
            date_end: NaiveDate::from_ymd_opt(1958, 10, 31).unwrap(),
            roster,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_explicit_date_and_score() {
        let txt = "\
12 мая
<p>
Динамо - Спартак - 14:6 (6:3)
</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.date, Some(d(1958, 5, 12)));
        assert_eq!((m.home_id, m.away_id), (1, 2));
        assert_eq!((m.home_score, m.away_score), (Some(14), Some(6)));
        assert_eq!((m.home_halfscore, m.away_halfscore), (Some(6), Some(3)));
        assert_eq!(m.tourn_season_id, Some(7));
        assert!(!m.date_unknown);
    }

    #[test]
    fn test_blank_lines_advance_rolling_cursor() {
        let txt = "\
12 мая
<p>
Динамо - Спартак - 14:6
</p>

<p>
Локомотив - Динамо - 3:3
</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, Some(d(1958, 5, 12)));
        assert_eq!(out[1].date, Some(d(1958, 5, 13)));
    }

    #[test]
    fn test_cursor_seeds_from_season_start() {
        let txt = "<p>\nДинамо - Спартак - 9:0\n</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out[0].date, Some(d(1958, 5, 1)));
    }

    #[test]
    fn test_unknown_day_placeholder() {
        let txt = "\
?? июня
<p>
Динамо - Спартак - 14:6
</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out[0].date, Some(d(1958, 6, 1)));
        assert!(out[0].date_unknown);
    }

    #[test]
    fn test_single_line_match_block() {
        let out = CalendarParser::new(&ctx()).parse("<p>Динамо - Спартак - 3:0</p>");
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].home_score, out[0].away_score), (Some(3), Some(0)));

        // Close marker on the team line, opener on its own.
        let out = CalendarParser::new(&ctx()).parse("<p>\nДинамо - Спартак - 3:0</p>");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].home_score, Some(3));
    }

    #[test]
    fn test_unknown_day_does_not_outlive_its_heading() {
        let txt = "\
?? июня
<p>
Динамо - Спартак - 14:6
</p>

<p>
Локомотив - Динамо - 3:3
</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out.len(), 2);
        assert!(out[0].date_unknown);
        // The blank-line roll resumes concrete dates.
        assert_eq!(out[1].date, Some(d(1958, 6, 2)));
        assert!(!out[1].date_unknown);
    }

    #[test]
    fn test_narrative_outcomes() {
        let txt = "\
<p>
Динамо - Спартак - выиграло Динамо
</p>
<p>
Локомотив - Спартак - ничья
</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].home_score, out[0].away_score), (Some(1), Some(0)));
        assert_eq!((out[1].home_score, out[1].away_score), (Some(1), Some(1)));
    }

    #[test]
    fn test_commentary_collected_into_story() {
        let txt = "\
<p>
Динамо - Спартак - 14:6
Матч проходил под дождём.
Судья удалил двоих.
</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(
            out[0].story,
            "Матч проходил под дождём.\nСудья удалил двоих."
        );
    }

    #[test]
    fn test_trailing_blockquote_attaches_to_last_match() {
        let txt = "\
<p>
Динамо - Спартак - 14:6
</p>
<blockquote>
Протест гостей отклонён.
</blockquote>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].story, "Протест гостей отклонён.");
    }

    #[test]
    fn test_unparseable_line_is_skipped_not_fatal() {
        let txt = "\
<p>
какая-то строка без матча
Динамо - Спартак - 14:6
</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].home_score, Some(14));
    }

    #[test]
    fn test_unknown_team_fails_line_not_walk() {
        let txt = "\
<p>
Жальгирис - Спартак - 14:6
</p>
<p>
Динамо - Спартак - 3:0
</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].home_id, 1);
    }

    #[test]
    fn test_scorer_tail_goes_to_story() {
        let txt = "<p>\nДинамо - Спартак - 14:6 (6:3) - Иванов 2, Петров\n</p>";
        let out = CalendarParser::new(&ctx()).parse(txt);
        assert_eq!(out[0].story, "Иванов 2, Петров");
    }
}
