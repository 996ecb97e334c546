//! Read-only name registry and the fuzzy resolution seams.
//!
//! Parsers never talk to storage. They consume two capabilities:
//! [`TeamIndex`] and [`PersonIndex`], each with one contract — map a
//! free-text fragment to the best registry identity, or nothing. The
//! bundled [`MemoryRegistry`] backs both for tests and the CLI; the
//! surrounding system may substitute whatever store it owns.

pub mod similarity;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{PersonId, SeasonId, TeamId};
use similarity::{ratio, token_set_ratio, SIM_THRESHOLD};

/// A known team with its name variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Founding year, if known.
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub disband_year: Option<i32>,
}

impl TeamRecord {
    /// All name variants a candidate may be scored against: base name and
    /// aliases, each alone and combined with the city.
    fn variants(&self) -> Vec<String> {
        let mut out = Vec::new();
        for name in std::iter::once(&self.name).chain(self.aliases.iter()) {
            out.push(name.clone());
            if let Some(city) = &self.city {
                out.push(format!("{name} {city}"));
            }
        }
        out
    }

    fn active_in(&self, year: i32) -> bool {
        match (self.year, self.disband_year) {
            (Some(founded), _) if year < founded => false,
            (_, Some(disbanded)) if year > disbanded => false,
            _ => true,
        }
    }
}

/// A known person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub first_name: String,
}

/// Season/group context handed to the parsers: the date span the records
/// fall into plus the season's own roster of team labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonContext {
    pub id: SeasonId,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Team label as it appears in this season's sources → identity.
    #[serde(default)]
    pub roster: BTreeMap<String, TeamId>,
}

impl SeasonContext {
    pub fn start_year(&self) -> i32 {
        use chrono::Datelike;
        self.date_start.year()
    }

    /// Resolve a fragment against the season's own roster. Exact label
    /// match wins; otherwise best token-set score above threshold.
    pub fn resolve_roster(&self, candidate: &str) -> Option<TeamId> {
        if let Some(id) = self.roster.get(candidate) {
            return Some(*id);
        }
        let mut best: Option<(f64, TeamId)> = None;
        for (label, id) in &self.roster {
            let score = token_set_ratio(candidate, label);
            if best.map_or(true, |(b, _)| score > b) {
                best = Some((score, *id));
            }
        }
        match best {
            Some((score, id)) if score > SIM_THRESHOLD => Some(id),
            _ => None,
        }
    }
}

/// Fuzzy lookup over known teams.
pub trait TeamIndex {
    /// Best-matching identity for `candidate`, or `None` when nothing
    /// scores above threshold. `year` constrains to teams active in that
    /// year; `scope` is preferred over the full registry when it resolves.
    fn best_match(
        &self,
        candidate: &str,
        year: Option<i32>,
        scope: Option<&SeasonContext>,
    ) -> Option<TeamId>;
}

/// Fuzzy lookup over known persons, with the one opt-in mutating path.
/// The lookup is named apart from [`TeamIndex::best_match`] so one store
/// can implement both indexes.
pub trait PersonIndex {
    fn best_person_match(&self, name: &str, first_name: &str) -> Option<PersonId>;

    /// Resolve, falling back from surname-filtered candidates to the full
    /// pool. When nothing matches and `create` is set, a minimal person is
    /// created; the bool in the result reports that. This is the only
    /// place fuzzy resolution may mutate state.
    fn resolve_or_create(
        &mut self,
        name: &str,
        first_name: &str,
        create: bool,
    ) -> Option<(PersonId, bool)>;
}

/// In-memory registry fixture; loadable from JSON for the CLI and built
/// directly in tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryRegistry {
    #[serde(default)]
    pub teams: Vec<TeamRecord>,
    #[serde(default)]
    pub persons: Vec<PersonRecord>,
}

impl MemoryRegistry {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        use crate::Context;
        serde_json::from_str(json).context("invalid registry JSON")
    }

    fn next_person_id(&self) -> PersonId {
        self.persons.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }
}

impl TeamIndex for MemoryRegistry {
    fn best_match(
        &self,
        candidate: &str,
        year: Option<i32>,
        scope: Option<&SeasonContext>,
    ) -> Option<TeamId> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }

        if let Some(ctx) = scope {
            if let Some(id) = ctx.resolve_roster(candidate) {
                return Some(id);
            }
        }

        // Cheap pre-filter before scoring: a variant must share the
        // candidate's first three characters.
        let prefix: String = candidate.to_lowercase().chars().take(3).collect();

        let mut best: Option<(f64, TeamId)> = None;
        for team in &self.teams {
            if let Some(y) = year {
                if !team.active_in(y) {
                    continue;
                }
            }
            let prefix_hit = std::iter::once(&team.name)
                .chain(team.aliases.iter())
                .any(|n| n.to_lowercase().starts_with(&prefix));
            if !prefix_hit {
                continue;
            }
            for variant in team.variants() {
                let score = token_set_ratio(candidate, &variant);
                if best.map_or(true, |(b, _)| score > b) {
                    best = Some((score, team.id));
                }
            }
        }
        match best {
            Some((score, id)) if score > SIM_THRESHOLD => {
                log::debug!("resolved '{candidate}' -> team {id} ({score:.2})");
                Some(id)
            }
            _ => {
                log::debug!("no team match for '{candidate}'");
                None
            }
        }
    }
}

impl PersonIndex for MemoryRegistry {
    fn best_person_match(&self, name: &str, first_name: &str) -> Option<PersonId> {
        best_person(self.persons.iter().filter(|p| p.name == name), name, first_name)
            .or_else(|| best_person(self.persons.iter(), name, first_name))
    }

    fn resolve_or_create(
        &mut self,
        name: &str,
        first_name: &str,
        create: bool,
    ) -> Option<(PersonId, bool)> {
        if let Some(id) = self.best_person_match(name, first_name) {
            return Some((id, false));
        }
        if !create {
            return None;
        }
        let id = self.next_person_id();
        self.persons.push(PersonRecord {
            id,
            name: name.to_string(),
            first_name: first_name.to_string(),
        });
        Some((id, true))
    }
}

fn best_person<'a>(
    pool: impl Iterator<Item = &'a PersonRecord>,
    name: &str,
    first_name: &str,
) -> Option<PersonId> {
    let wanted = format!("{first_name} {name}");
    let mut best: Option<(f64, PersonId)> = None;
    for person in pool {
        let full = format!("{} {}", person.first_name, person.name);
        let score = ratio(full.trim(), wanted.trim());
        if best.map_or(true, |(b, _)| score > b) {
            best = Some((score, person.id));
        }
    }
    best.and_then(|(score, id)| (score > SIM_THRESHOLD).then_some(id))
}
