// Scrumbook - historical rugby records ingestion
// Parsers that turn OCR'd standings tables, match calendars and rosters
// into structured records, reconciled against a registry of known teams.

pub mod models;
pub mod parser;
pub mod registry;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{MatchRecord, RosterAssignment, SeasonHeader, TableRow, TeamEntry};
pub use parser::{CalendarParser, SimpleTable};
pub use registry::{MemoryRegistry, PersonIndex, SeasonContext, TeamIndex};
