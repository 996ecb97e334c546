//! Column-aligned standings table reconstruction.
//!
//! Input is a block of text where every line is one team's row and columns
//! line up only through runs of spaces — the product of OCR'd or retyped
//! archival tables. Layouts handled:
//!
//! ```text
//! 1. Динамо                     xxxxx  22:6    поб   13:3   20:0    поб
//! 5. "Спартак" Ленинград      6:18   0:6    0:3    0:8   xxxxx  20:8   1 0 4  26-43  2
//! 1. "СТАКЛЕС" Каунас            6  0  2  164:72   12
//! 1. Крылья Советов Москва
//! ```
//!
//! A full round-robin matrix carries a crossed-out diagonal placeholder
//! per row; a single-leg listing has only aggregate figures and ragged,
//! typically decreasing cell counts.

use std::collections::HashSet;

use crate::models::{MatchRecord, TableRow};
use crate::registry::{SeasonContext, TeamIndex};

use super::score::{self, Outcome};

/// Crossed-out diagonal cells come in Latin and Cyrillic spellings.
const DIAG_CHARS: [char; 4] = ['x', 'X', 'х', 'Х'];

/// Everything a standings block yields: one row per team line, one match
/// per fixture pair.
#[derive(Debug, Clone, Default)]
pub struct TableParse {
    pub rows: Vec<TableRow>,
    pub matches: Vec<MatchRecord>,
}

/// Whitespace-delimited table with reconstructed column bounds.
#[derive(Debug)]
pub struct SimpleTable {
    lines: Vec<Vec<char>>,
    column_marks: Vec<Vec<usize>>,
}

impl SimpleTable {
    /// Split a text block into usable lines and find the column bounds.
    /// Separator lines (leading dash) and blank lines are discarded.
    pub fn build(txt: &str) -> Self {
        let lines: Vec<Vec<char>> = txt
            .lines()
            .filter(|line| !line.starts_with('-') && !line.trim().is_empty())
            .map(|line| line.trim().chars().collect())
            .collect();
        let column_marks = lines.iter().map(|l| mark_columns(l)).collect();
        Self {
            lines,
            column_marks,
        }
    }

    /// Bounds of the line defining the canonical (widest) column layout.
    fn longest_marks(&self) -> &[usize] {
        self.column_marks
            .iter()
            .max_by_key(|marks| marks.len())
            .map(|m| m.as_slice())
            .unwrap_or(&[])
    }

    /// Parse rows and matches, resolving team labels through `registry`
    /// constrained by the season context when given.
    pub fn parse(&self, registry: &dyn TeamIndex, ctx: Option<&SeasonContext>) -> TableParse {
        let mut out = TableParse::default();
        if self.lines.is_empty() {
            return out;
        }
        let year = ctx.map(|c| c.start_year());

        for (line, marks) in self.lines.iter().zip(&self.column_marks) {
            out.rows.push(self.parse_team(line, marks, registry, year, ctx));
        }

        // Cells sliced by the canonical layout decide matrix-ness; a
        // single-leg listing falls back to each line's own bounds.
        let canonical: Vec<Vec<String>> = self
            .lines
            .iter()
            .map(|line| split_line(line, self.longest_marks()))
            .collect();

        if is_matrix(&canonical) {
            self.parse_matrix(&canonical, &mut out, ctx);
        } else {
            for (i, (line, marks)) in self.lines.iter().zip(&self.column_marks).enumerate() {
                let cells = split_line(line, marks);
                assign_standings(&cells, &mut out.rows[i]);
            }
        }
        out
    }

    fn parse_team(
        &self,
        line: &[char],
        marks: &[usize],
        registry: &dyn TeamIndex,
        year: Option<i32>,
        ctx: Option<&SeasonContext>,
    ) -> TableRow {
        let head: String = match marks.first() {
            Some(&m) => line[..m.min(line.len())].iter().collect(),
            None => line.iter().collect(),
        };
        let (place, label) = match head.split_once('.') {
            Some((place, rest)) => (place.trim().to_string(), rest),
            None => {
                log::warn!("table line without place ordinal: '{}'", head.trim());
                (String::new(), head.as_str())
            }
        };
        let label = label.replace('"', "").trim().to_string();
        let team_id = registry.best_match(&label, year, ctx);
        TableRow::new(place, label, team_id)
    }

    /// Matrix half: cell `j` of row `i` is the outcome against team `j`.
    /// Both halves of the cross table describe the same fixtures, so
    /// matches are keyed by the unordered row/column pair and the first
    /// reading wins.
    fn parse_matrix(
        &self,
        canonical: &[Vec<String>],
        out: &mut TableParse,
        ctx: Option<&SeasonContext>,
    ) {
        let team_count = self.lines.len();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for (i, cells) in canonical.iter().enumerate() {
            for (j, cell) in cells.iter().enumerate().take(team_count) {
                if j == i || is_diag(cell) {
                    continue;
                }
                let key = (i.min(j), i.max(j));
                if seen.contains(&key) {
                    continue;
                }
                let Some(outcome) = score::parse_cell(cell) else {
                    if !cell.is_empty() {
                        log::warn!("unreadable score cell '{cell}' at row {i}, col {j}");
                    }
                    continue;
                };
                if let Some(m) = self.make_match(out, i, j, outcome, ctx) {
                    seen.insert(key);
                    out.matches.push(m);
                }
            }
            if cells.len() > team_count {
                assign_standings(&cells[team_count..], &mut out.rows[i]);
            }
        }
    }

    fn make_match(
        &self,
        out: &TableParse,
        i: usize,
        j: usize,
        outcome: Outcome,
        ctx: Option<&SeasonContext>,
    ) -> Option<MatchRecord> {
        let (Some(home_id), Some(away_id)) = (out.rows[i].team_id, out.rows[j].team_id) else {
            log::warn!(
                "skipping match {} vs {}: unresolved team",
                out.rows[i].name,
                out.rows[j].name
            );
            return None;
        };
        let mut m = MatchRecord::new(home_id, away_id);
        outcome.apply(&mut m);
        m.tourn_season_id = ctx.map(|c| c.id);
        m.set_tech_score();
        Some(m)
    }
}

/// Record the position of every double-space run in a line, coalescing a
/// bound that immediately follows the previous one so ragged internal
/// spacing is counted once.
fn mark_columns(line: &[char]) -> Vec<usize> {
    let mut bounds: Vec<usize> = Vec::new();
    let mut previous: Option<usize> = None;
    for (idx, &c) in line.iter().enumerate() {
        if c == ' ' {
            if idx > 0 && previous == Some(idx - 1) {
                match bounds.last_mut() {
                    Some(last) if Some(*last) == previous => *last += 1,
                    _ => bounds.push(idx),
                }
            }
            previous = Some(idx);
        }
    }
    bounds
}

/// Slice a line into cells by adjacent bound pairs plus the tail after the
/// last bound. Indices past the end of a short line yield empty cells.
fn split_line(line: &[char], marks: &[usize]) -> Vec<String> {
    let mut cells = Vec::with_capacity(marks.len());
    for (k, &start) in marks.iter().enumerate() {
        let end = marks.get(k + 1).copied().unwrap_or(line.len());
        let start = start.min(line.len());
        let end = end.min(line.len()).max(start);
        let cell: String = line[start..end].iter().collect();
        cells.push(cell.trim().to_string());
    }
    cells
}

fn is_diag(cell: &str) -> bool {
    cell.chars().count() >= 3 && !cell.is_empty() && cell.chars().all(|c| DIAG_CHARS.contains(&c))
}

/// A table is a round-robin matrix when nearly every row carries a
/// diagonal placeholder and the placeholders march down-right.
fn is_matrix(canonical: &[Vec<String>]) -> bool {
    let positions: Vec<usize> = canonical
        .iter()
        .filter_map(|cells| cells.iter().position(|c| is_diag(c)))
        .collect();
    if positions.len() < 2 || positions.len() + 1 < canonical.len() {
        return false;
    }
    positions.windows(2).all(|w| w[0] < w[1])
}

fn is_scoreish(cell: &str) -> bool {
    cell.chars().any(|c| c == ':' || c == '-') && cell.chars().any(|c| c.is_ascii_digit())
}

/// Fill trailing standings fields positionally from the right: points,
/// then the aggregate score (requires score punctuation), then L/D/W.
///
/// When a row has fewer cells than the canonical layout this guesses: a
/// lone trailing integer is read as points even though it may be a
/// truncated score or a loss count. The correct reading cannot be
/// recovered from the text, so the guess is kept identical to the
/// reference corpus behavior rather than "improved".
fn assign_standings(cells: &[String], row: &mut TableRow) {
    // A cell may hold several figures ("2 0 0" split only by single
    // spaces), so work on whitespace tokens rather than raw cells.
    let mut rest: Vec<&str> = cells
        .iter()
        .flat_map(|c| c.split_whitespace())
        .filter(|c| is_scoreish(c) || c.parse::<u16>().is_ok())
        .collect();

    if let Some(&last) = rest.last() {
        if !is_scoreish(last) {
            row.points = last.parse().ok();
            rest.pop();
        }
    }
    if let Some(&last) = rest.last() {
        if is_scoreish(last) {
            row.score = last.to_string();
            rest.pop();
        }
    }
    row.losses = rest.pop().and_then(|c| c.parse().ok());
    row.draws = rest.pop().and_then(|c| c.parse().ok());
    row.wins = rest.pop().and_then(|c| c.parse().ok());
}
