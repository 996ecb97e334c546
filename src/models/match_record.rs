use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{SeasonId, TeamId};

/// One parsed fixture outcome between two resolved teams.
///
/// Exactly one of three shapes describes the outcome at any time: a numeric
/// score pair, a technical-loss flag, or fully unknown. Setting a technical
/// flag clears the numeric fields (see [`MatchRecord::set_tech_score`]).
///
/// Source data overloads the numeric `1` as a win/draw token, so a stored
/// `1:1` is a draw marker and never a literal 1:1 scoreline. A genuine 1:1
/// result cannot be recovered from the historical tables; we keep the
/// overload rather than guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub home_halfscore: Option<u16>,
    pub away_halfscore: Option<u16>,
    /// Result decided by forfeit or ruling rather than play.
    pub technical: bool,
    pub tech_home_loss: bool,
    pub tech_away_loss: bool,
    /// Free-text commentary collected around the match line.
    pub story: String,
    pub date: Option<NaiveDate>,
    /// The source gave no usable day for this match; `date` holds the
    /// first of the month as a stand-in.
    pub date_unknown: bool,
    pub tourn_season_id: Option<SeasonId>,
}

impl MatchRecord {
    pub fn new(home_id: TeamId, away_id: TeamId) -> Self {
        Self {
            home_id,
            away_id,
            home_score: None,
            away_score: None,
            home_halfscore: None,
            away_halfscore: None,
            technical: false,
            tech_home_loss: false,
            tech_away_loss: false,
            story: String::new(),
            date: None,
            date_unknown: false,
            tourn_season_id: None,
        }
    }

    pub fn with_score(mut self, home: u16, away: u16) -> Self {
        self.home_score = Some(home);
        self.away_score = Some(away);
        self
    }

    /// True when the stored scores are the `1:1` draw marker rather than
    /// numbers that came off a scoreboard.
    pub fn is_draw_marker(&self) -> bool {
        self.home_score == Some(1) && self.away_score == Some(1)
    }

    /// Collapse a pending technical result into its final shape: numeric
    /// fields cleared, `technical` raised. Must run once per match before
    /// the record is handed to a collaborator.
    pub fn set_tech_score(&mut self) {
        if self.tech_home_loss || self.tech_away_loss {
            self.technical = true;
            self.home_score = None;
            self.away_score = None;
            self.home_halfscore = None;
            self.away_halfscore = None;
        }
    }

    pub fn append_story(&mut self, line: &str) {
        if !self.story.is_empty() {
            self.story.push('\n');
        }
        self.story.push_str(line);
    }

    /// Orientation-free key: the same fixture reported from either side
    /// collapses to one value.
    pub fn fixture_key(&self) -> (TeamId, Option<u16>, TeamId, Option<u16>) {
        if self.home_id <= self.away_id {
            (self.home_id, self.home_score, self.away_id, self.away_score)
        } else {
            (self.away_id, self.away_score, self.home_id, self.home_score)
        }
    }
}

/// Two records are equal when they describe the same fixture, regardless
/// of which team the source happened to list first.
impl PartialEq for MatchRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fixture_key() == other.fixture_key()
    }
}

impl Eq for MatchRecord {}

impl std::fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let score = |s: Option<u16>| s.map_or("??".to_string(), |v| v.to_string());
        write!(
            f,
            "{} - {} - {}:{}",
            self.home_id,
            self.away_id,
            score(self.home_score),
            score(self.away_score)
        )?;
        if self.home_halfscore.is_some() || self.away_halfscore.is_some() {
            write!(
                f,
                " ({}:{})",
                score(self.home_halfscore),
                score(self.away_halfscore)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_symmetric_under_swap() {
        let a = MatchRecord::new(1, 2).with_score(2, 1);
        let b = MatchRecord::new(2, 1).with_score(1, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_distinguishes_orientation_of_score() {
        let a = MatchRecord::new(1, 2).with_score(2, 1);
        let b = MatchRecord::new(1, 2).with_score(1, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_set_tech_score_clears_numeric_fields() {
        let mut m = MatchRecord::new(1, 2).with_score(1, 0);
        m.tech_away_loss = true;
        m.set_tech_score();
        assert!(m.technical);
        assert_eq!(m.home_score, None);
        assert_eq!(m.away_score, None);
        assert!(m.tech_away_loss);
        assert!(!m.tech_home_loss);
    }

    #[test]
    fn test_set_tech_score_is_noop_without_flags() {
        let mut m = MatchRecord::new(1, 2).with_score(13, 3);
        m.set_tech_score();
        assert!(!m.technical);
        assert_eq!(m.home_score, Some(13));
    }

    #[test]
    fn test_draw_marker() {
        let m = MatchRecord::new(1, 2).with_score(1, 1);
        assert!(m.is_draw_marker());
        assert!(!MatchRecord::new(1, 2).with_score(1, 0).is_draw_marker());
    }
}
