use serde::{Deserialize, Serialize};

use super::{GroupId, SeasonId, TeamId};

/// One parsed standings line for a team.
///
/// Trailing aggregate fields are all optional: short rows absorb the
/// deficit silently rather than failing. An unresolved team leaves
/// `team_id` empty; downstream consumers are expected to surface that to
/// an operator, not to drop the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Standings place as written, may be empty or a placeholder like "..".
    pub place: String,
    /// Team label as written in the source (quotes and ordinal stripped).
    pub name: String,
    pub team_id: Option<TeamId>,
    pub wins: Option<u16>,
    pub draws: Option<u16>,
    pub losses: Option<u16>,
    /// Aggregate points-for/points-against string, e.g. "26-43".
    pub score: String,
    pub points: Option<u16>,
}

impl TableRow {
    pub fn new(place: impl Into<String>, name: impl Into<String>, team_id: Option<TeamId>) -> Self {
        Self {
            place: place.into(),
            name: name.into(),
            team_id,
            wins: None,
            draws: None,
            losses: None,
            score: String::new(),
            points: None,
        }
    }

    /// Bind the row to a season or group, producing a persistence-ready
    /// record. The caller picks the scope; the parser never decides it.
    pub fn build(&self, scope: StandingsScope) -> TeamSeasonRecord {
        TeamSeasonRecord {
            row: self.clone(),
            scope,
        }
    }
}

/// Context a standings row is committed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandingsScope {
    Season(SeasonId),
    Group(GroupId),
}

/// A [`TableRow`] bound to its season/group context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonRecord {
    pub row: TableRow,
    pub scope: StandingsScope,
}
