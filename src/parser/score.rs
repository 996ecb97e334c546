//! Score-cell normalization.
//!
//! A table cell describing a fixture comes in three families: a numeric
//! "H:A" pair, one of a small fixed vocabulary of outcome words, or the
//! dash/plus sentinels of a technical result. The canonical win/loss/draw
//! encodings are 1:0 / 0:1 / 1:1 — the source overloads `1` as a token,
//! which is why a parsed 1:1 always means "draw", never a real scoreline.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::MatchRecord;

/// Outcome-word stems, matched by lowercase prefix.
const WIN_STEMS: [&str; 2] = ["поб", "выигр"];
const LOSS_STEMS: [&str; 2] = ["пор", "проигр"];
const DRAW_STEMS: [&str; 2] = ["нич", "внич"];

/// Single-letter shorthands count only when they are the whole cell;
/// prefix-matching them would swallow any Cyrillic word.
const WIN_EXACT: &str = "в";
const LOSS_EXACT: &str = "п";

/// Normalized content of one score cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Score { home: u16, away: u16 },
    HomeWin,
    AwayWin,
    Draw,
    /// Home side lost by forfeit/ruling ("-" on the home side).
    TechHomeLoss,
    TechAwayLoss,
}

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,3}):(\d{1,3})$").expect("score pattern is valid"))
}

fn token_in(word: &str, vocab: &[&str]) -> bool {
    vocab.iter().any(|t| word.starts_with(t))
}

/// Parse one cell. Returns `None` for empty cells, diagonal placeholders
/// and anything outside the known families.
pub fn parse_cell(cell: &str) -> Option<Outcome> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    if let Some(cap) = numeric_re().captures(cell) {
        let home: u16 = cap[1].parse().ok()?;
        let away: u16 = cap[2].parse().ok()?;
        // 1:1 is the overloaded draw token, not a scoreline.
        if home == 1 && away == 1 {
            return Some(Outcome::Draw);
        }
        return Some(Outcome::Score { home, away });
    }

    match cell {
        "-" | "-:+" => return Some(Outcome::TechHomeLoss),
        "+" | "+:-" => return Some(Outcome::TechAwayLoss),
        _ => {}
    }

    let word = cell.to_lowercase();
    if token_in(&word, &DRAW_STEMS) {
        Some(Outcome::Draw)
    } else if word == WIN_EXACT || token_in(&word, &WIN_STEMS) {
        Some(Outcome::HomeWin)
    } else if word == LOSS_EXACT || token_in(&word, &LOSS_STEMS) {
        Some(Outcome::AwayWin)
    } else {
        None
    }
}

impl Outcome {
    /// Write this outcome into a match. Technical sentinels leave the
    /// canonical numerics in place until [`MatchRecord::set_tech_score`]
    /// runs, which the parsers do once before emitting the record.
    pub fn apply(self, m: &mut MatchRecord) {
        match self {
            Outcome::Score { home, away } => {
                m.home_score = Some(home);
                m.away_score = Some(away);
            }
            Outcome::HomeWin => {
                m.home_score = Some(1);
                m.away_score = Some(0);
            }
            Outcome::AwayWin => {
                m.home_score = Some(0);
                m.away_score = Some(1);
            }
            Outcome::Draw => {
                m.home_score = Some(1);
                m.away_score = Some(1);
            }
            Outcome::TechHomeLoss => {
                m.home_score = Some(0);
                m.away_score = Some(1);
                m.tech_home_loss = true;
            }
            Outcome::TechAwayLoss => {
                m.home_score = Some(1);
                m.away_score = Some(0);
                m.tech_away_loss = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_scores() {
        assert_eq!(parse_cell("22:6"), Some(Outcome::Score { home: 22, away: 6 }));
        assert_eq!(parse_cell(" 13:3 "), Some(Outcome::Score { home: 13, away: 3 }));
        let mut m = MatchRecord::new(1, 2);
        Outcome::Score { home: 22, away: 6 }.apply(&mut m);
        assert_eq!((m.home_score, m.away_score), (Some(22), Some(6)));
        assert!(!m.tech_home_loss && !m.tech_away_loss);
    }

    #[test]
    fn test_one_one_is_a_draw_marker() {
        assert_eq!(parse_cell("1:1"), Some(Outcome::Draw));
    }

    #[test]
    fn test_outcome_words() {
        assert_eq!(parse_cell("поб"), Some(Outcome::HomeWin));
        assert_eq!(parse_cell("победа"), Some(Outcome::HomeWin));
        assert_eq!(parse_cell("пор"), Some(Outcome::AwayWin));
        assert_eq!(parse_cell("ничья"), Some(Outcome::Draw));
        assert_eq!(parse_cell("нич"), Some(Outcome::Draw));
    }

    #[test]
    fn test_technical_sentinels() {
        let mut m = MatchRecord::new(1, 2);
        parse_cell("+:-").unwrap().apply(&mut m);
        m.set_tech_score();
        assert!(m.technical && m.tech_away_loss && !m.tech_home_loss);
        assert_eq!(m.home_score, None);
        assert_eq!(m.away_score, None);

        let mut m = MatchRecord::new(1, 2);
        parse_cell("-").unwrap().apply(&mut m);
        m.set_tech_score();
        assert!(m.technical && m.tech_home_loss && !m.tech_away_loss);
    }

    #[test]
    fn test_single_letter_tokens_match_exactly() {
        assert_eq!(parse_cell("в"), Some(Outcome::HomeWin));
        assert_eq!(parse_cell("п"), Some(Outcome::AwayWin));
        // Words merely starting with the shorthand letters are not outcomes.
        assert_eq!(parse_cell("перенесён"), None);
        assert_eq!(parse_cell("вторник"), None);
    }

    #[test]
    fn test_draw_adverb_form() {
        assert_eq!(parse_cell("вничью"), Some(Outcome::Draw));
    }

    #[test]
    fn test_unknown_cells() {
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("xxxxx"), None);
        assert_eq!(parse_cell("26-43"), None);
    }
}
