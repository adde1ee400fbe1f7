//! T9 roster configuration
//!
//! A fixed, per-league allow-list of team names used to scope analysis.
//! Loaded once at startup and injected into the filter pipeline and ranking
//! engine; never consulted as ambient global state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded default roster table
const DEFAULT_ROSTER_JSON: &str = include_str!("../../data/t9_teams.json");

/// Per-league team allow-list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    leagues: HashMap<String, Vec<String>>,
}

impl Roster {
    /// Build a roster from an explicit league table
    pub fn new(leagues: HashMap<String, Vec<String>>) -> Self {
        Self { leagues }
    }

    /// Empty roster: every league passes through unfiltered
    pub fn empty() -> Self {
        Self {
            leagues: HashMap::new(),
        }
    }

    /// Parse a roster table from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Teams configured for a league, if any
    pub fn teams(&self, league: &str) -> Option<&[String]> {
        self.leagues.get(league).map(|t| t.as_slice())
    }

    /// Whether a team is on the allow-list of a league
    pub fn contains(&self, league: &str, team: &str) -> bool {
        self.leagues
            .get(league)
            .is_some_and(|teams| teams.iter().any(|t| t == team))
    }

    /// Configured league names, sorted
    pub fn leagues(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.leagues.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Roster {
    /// The embedded T9 table shipped with the crate
    fn default() -> Self {
        Self::from_json(DEFAULT_ROSTER_JSON).expect("embedded roster table is valid JSON")
    }
}
