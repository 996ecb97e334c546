use serde::{Deserialize, Serialize};

use super::{PersonId, SeasonId, TeamId};

/// Playing role a person held for a season, keyed off shirt-number groups
/// in the archival roster notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Fullback,
    Back,
    FlyHalf,
    ScrumHalf,
    Half,
    Center,
    Winger,
    BackRow,
    Lock,
    FirstRow,
    Prop,
    Hooker,
    Forward,
    /// Fallback when the number group is not recognised.
    Player,
}

/// One player-season assignment produced by the roster importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterAssignment {
    pub person_id: PersonId,
    pub role: Role,
    pub season_id: SeasonId,
    pub team_id: TeamId,
    pub year: i32,
    /// True when the person did not exist and was created during import.
    pub created: bool,
}
