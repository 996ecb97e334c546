pub mod match_record;
pub mod roster;
pub mod season;
pub mod table_row;
pub mod team_entry;

pub use match_record::MatchRecord;
pub use roster::{Role, RosterAssignment};
pub use season::SeasonHeader;
pub use table_row::{StandingsScope, TableRow, TeamSeasonRecord};
pub use team_entry::TeamEntry;

/// Registry identity of a team.
pub type TeamId = u32;
/// Registry identity of a person.
pub type PersonId = u32;
/// Registry identity of a tournament season.
pub type SeasonId = u32;
/// Registry identity of a group within a season.
pub type GroupId = u32;
