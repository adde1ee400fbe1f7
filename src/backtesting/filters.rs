//! Record filtering and trade ordering
//!
//! Filters apply in a fixed order: season, league, roster, then trade
//! ordering. Two season semantics exist at different call sites of the
//! historical system and both are kept as explicitly named modes; which one
//! is "correct" is an open product question, so callers must choose.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::data::{MatchRecord, Roster};

/// Sentinel season value meaning "no restriction"
pub const ALL_SEASONS: &str = "all";

/// Season filter semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonMode {
    /// Keep only records whose season equals the given label
    Exact,
    /// Keep records whose season sorts at or after the given label among the
    /// distinct season labels present in the dataset. An unmatched label
    /// keeps nothing.
    #[default]
    From,
}

/// Apply the season filter in the selected mode.
///
/// The sentinel `"all"` disables the filter in both modes.
pub fn filter_by_season(records: &[MatchRecord], mode: SeasonMode, season: &str) -> Vec<MatchRecord> {
    if season == ALL_SEASONS {
        return records.to_vec();
    }

    match mode {
        SeasonMode::Exact => records
            .iter()
            .filter(|r| r.season == season)
            .cloned()
            .collect(),
        SeasonMode::From => {
            let sorted = distinct_seasons(records);
            let included: HashSet<&String> = match sorted.iter().position(|s| s == season) {
                Some(start) => sorted[start..].iter().collect(),
                None => HashSet::new(),
            };
            records
                .iter()
                .filter(|r| included.contains(&r.season))
                .cloned()
                .collect()
        }
    }
}

/// Keep records whose league matches exactly
pub fn filter_by_league(records: &[MatchRecord], league: &str) -> Vec<MatchRecord> {
    records
        .iter()
        .filter(|r| r.league == league)
        .cloned()
        .collect()
}

/// Apply the T9 roster filter for a league.
///
/// When inactive, or when the league has no configured roster, all records
/// pass through. Otherwise a record survives if its home or away team is on
/// the league's allow-list.
pub fn filter_by_roster(
    records: &[MatchRecord],
    league: &str,
    roster: &Roster,
    active: bool,
) -> Vec<MatchRecord> {
    if !active || roster.teams(league).is_none() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|r| roster.contains(league, &r.home_team) || roster.contains(league, &r.away_team))
        .cloned()
        .collect()
}

/// Drop records without a valid trade number and sort ascending by it.
///
/// The sort stands in for chronological sequence; capital compounding in the
/// simulator depends on this exact order.
pub fn order_by_trade(records: &[MatchRecord]) -> Vec<MatchRecord> {
    let mut ordered: Vec<MatchRecord> = records
        .iter()
        .filter(|r| r.trade_number.is_some())
        .cloned()
        .collect();
    ordered.sort_by_key(|r| r.trade_number);
    ordered
}

/// Distinct non-empty season labels, lexically sorted
pub fn distinct_seasons(records: &[MatchRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.season.is_empty())
        .map(|r| r.season.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty league names, lexically sorted
pub fn distinct_leagues(records: &[MatchRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.league.is_empty())
        .map(|r| r.league.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize;

    fn fixture() -> Vec<MatchRecord> {
        normalize(
            "Season,League,HomeTeam,AwayTeam,Trade\n\
             2018,SPL,Celtic,Rangers,t3\n\
             2019,SPL,Hearts,Celtic,t1\n\
             2020,SPL,Rangers,Aberdeen,t2\n\
             2020,EPL,Arsenal,Chelsea,t4\n\
             2019,EPL,Leeds,Fulham,bad\n",
        )
    }

    #[test]
    fn test_season_exact_mode() {
        let records = fixture();
        let filtered = filter_by_season(&records, SeasonMode::Exact, "2019");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.season == "2019"));
    }

    #[test]
    fn test_season_all_sentinel() {
        let records = fixture();
        assert_eq!(
            filter_by_season(&records, SeasonMode::Exact, ALL_SEASONS).len(),
            5
        );
        assert_eq!(
            filter_by_season(&records, SeasonMode::From, ALL_SEASONS).len(),
            5
        );
    }

    #[test]
    fn test_season_from_mode_lower_bound() {
        let records = fixture();
        let filtered = filter_by_season(&records, SeasonMode::From, "2019");
        assert_eq!(filtered.len(), 4);
        assert!(filtered.iter().all(|r| r.season != "2018"));
    }

    #[test]
    fn test_season_from_mode_unmatched_keeps_nothing() {
        let records = fixture();
        assert!(filter_by_season(&records, SeasonMode::From, "2017").is_empty());
    }

    #[test]
    fn test_league_filter() {
        let records = fixture();
        let filtered = filter_by_league(&records, "SPL");
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_roster_filter() {
        let records = fixture();
        let roster = Roster::from_json(r#"{"SPL": ["Celtic"]}"#).unwrap();

        let spl = filter_by_league(&records, "SPL");
        let filtered = filter_by_roster(&spl, "SPL", &roster, true);
        assert_eq!(filtered.len(), 2); // Celtic home once, away once

        // Inactive passes through
        assert_eq!(filter_by_roster(&spl, "SPL", &roster, false).len(), 3);
        // No roster for the league passes through
        assert_eq!(filter_by_roster(&spl, "EPL", &roster, true).len(), 3);
    }

    #[test]
    fn test_order_by_trade() {
        let records = fixture();
        let ordered = order_by_trade(&records);
        assert_eq!(ordered.len(), 4); // "bad" trade id dropped
        let numbers: Vec<u32> = ordered.iter().filter_map(|r| r.trade_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_distinct_seasons_and_leagues() {
        let records = fixture();
        assert_eq!(distinct_seasons(&records), vec!["2018", "2019", "2020"]);
        assert_eq!(distinct_leagues(&records), vec!["EPL", "SPL"]);
    }
}
