//! Roster list import.
//!
//! Archival rosters come as shirt-number groups with player names:
//!
//! ```text
//! 15. Иванов Сергей; 14-11. Петров Николай, Сидоров Андрей / 10. Кузнецов Олег
//! ```
//!
//! The number group maps to a playing role; each player is fuzzy-resolved
//! against the person registry, optionally creating a minimal person when
//! the import explicitly allows it.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Role, RosterAssignment, SeasonId, TeamId};
use crate::registry::PersonIndex;

/// Shirt-number groups of the source notation mapped to roles.
const POSITIONS: [(&str, Role); 24] = [
    ("15", Role::Fullback),
    ("14-11", Role::Back),
    ("10", Role::FlyHalf),
    ("9", Role::ScrumHalf),
    ("6-8", Role::BackRow),
    ("4-5", Role::Lock),
    ("1-3", Role::FirstRow),
    ("14", Role::Winger),
    ("13", Role::Center),
    ("12", Role::Center),
    ("12-13", Role::Center),
    ("11", Role::Winger),
    ("9-10", Role::Half),
    ("8", Role::BackRow),
    ("7", Role::BackRow),
    ("6", Role::BackRow),
    ("5", Role::Lock),
    ("4", Role::Lock),
    ("4/5", Role::Lock),
    ("3", Role::Prop),
    ("2", Role::Hooker),
    ("1", Role::Prop),
    ("1/3", Role::Prop),
    ("1-8", Role::Forward),
];

fn role_for(number: &str) -> Role {
    POSITIONS
        .iter()
        .find(|(n, _)| *n == number)
        .map(|&(_, role)| role)
        .unwrap_or(Role::Player)
}

fn group_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2}-?\d{0,2}).(.*)").expect("group pattern is valid"))
}

/// Context a roster import binds its assignments to.
#[derive(Debug, Clone, Copy)]
pub struct RosterTarget {
    pub season_id: SeasonId,
    pub team_id: TeamId,
    pub year: i32,
}

/// Parse a roster block, resolving every player through `persons`.
///
/// `create` opts in to creating a person when nothing in the registry
/// matches; without it unresolved players are logged and skipped.
pub fn parse_rosters(
    input: &str,
    persons: &mut dyn PersonIndex,
    target: RosterTarget,
    create: bool,
) -> Vec<RosterAssignment> {
    let normalized = input.replace("\r\n", " ").replace('\n', " ").replace(" / ", ";");
    let mut out = Vec::new();

    for group in normalized.trim().split(';') {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }
        let Some(cap) = group_re().captures(group) else {
            log::warn!("roster group without a number prefix: '{group}'");
            continue;
        };
        let role = role_for(&cap[1]);
        for player in cap[2].split(',') {
            let player = player.trim();
            if player.is_empty() {
                continue;
            }
            // "Иванов Сергей" → (surname, first name); a single token is
            // a bare surname.
            let (name, first_name) = match player.split_once(' ') {
                Some((last, first)) => (last.trim(), first.trim()),
                None => (player, ""),
            };
            match persons.resolve_or_create(name, first_name, create) {
                Some((person_id, created)) => out.push(RosterAssignment {
                    person_id,
                    role,
                    season_id: target.season_id,
                    team_id: target.team_id,
                    year: target.year,
                    created,
                }),
                None => log::warn!("no person match for '{player}'"),
            }
        }
    }
    out
}
