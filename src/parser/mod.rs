pub mod calendar;
pub mod dates;
pub mod roster;
pub mod score;
pub mod season;
pub mod table;
pub mod teamlist;

pub use calendar::CalendarParser;
pub use dates::find_dates;
pub use roster::parse_rosters;
pub use score::{parse_cell, Outcome};
pub use season::{parse_season, SeasonParseError};
pub use table::{SimpleTable, TableParse};
pub use teamlist::parse_team_list;

use crate::registry::similarity::token_set_ratio;

/// True when a phrase names the first of two labels more closely than the
/// second. Used to pin "выиграло Динамо" to one side of a match line.
pub(crate) fn similarity_pick(phrase: &str, first: &str, second: &str) -> bool {
    token_set_ratio(phrase, first) >= token_set_ratio(phrase, second)
}
