//! Team ranking by market outcome
//!
//! Counts market-success occurrences per team over filtered (not simulated)
//! records. A qualifying match credits both its home and away team, so a
//! single record can advance two distinct teams.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::filters::{filter_by_league, filter_by_roster, filter_by_season, SeasonMode};
use super::simulator::Market;
use crate::data::{resolve_total_goals, MatchRecord, Roster};

/// Maximum number of teams returned per ranking
const RANKING_LIMIT: usize = 30;

/// Parallel label/value sequences, descending by count, ties in first-seen
/// order, at most 30 entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResult {
    pub labels: Vec<String>,
    pub values: Vec<u32>,
}

/// Single-record success predicate for a market.
///
/// under6 uses the per-record threshold here; ranking never applies the
/// grouped-triplet rule.
fn market_predicate(market: Market, total: f64) -> bool {
    match market {
        Market::Over25 => total > 2.0,
        Market::Under25 => total <= 2.0,
        Market::Under6 => total < 6.0,
    }
}

/// Rank teams by market success over already-filtered records.
///
/// With `opposite` set, the market's defined opposite is ranked instead.
pub fn rank_teams_filtered(records: &[MatchRecord], market: Market, opposite: bool) -> RankingResult {
    let market = if opposite { market.opposite() } else { market };

    // First-seen order is the tie-break, so counts keep encounter order
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u32> = HashMap::new();

    for record in records {
        let total = match resolve_total_goals(record) {
            Some(t) => t,
            None => continue,
        };
        if !market_predicate(market, total) {
            continue;
        }

        for team in [&record.home_team, &record.away_team] {
            if team.is_empty() {
                continue;
            }
            if !counts.contains_key(team.as_str()) {
                order.push(team.clone());
            }
            *counts.entry(team.clone()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, u32)> = order
        .into_iter()
        .map(|team| {
            let count = counts[&team];
            (team, count)
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(RANKING_LIMIT);

    let (labels, values) = ranked.into_iter().unzip();
    RankingResult { labels, values }
}

/// Full ranking entry point: applies league, season (lower-bound mode) and
/// roster scoping before counting.
pub fn rank_teams(
    records: &[MatchRecord],
    league: &str,
    season: &str,
    market: Market,
    roster: &Roster,
    roster_active: bool,
    opposite: bool,
) -> RankingResult {
    let filtered = filter_by_season(records, SeasonMode::From, season);
    let filtered = filter_by_league(&filtered, league);
    let filtered = filter_by_roster(&filtered, league, roster, roster_active);
    rank_teams_filtered(&filtered, market, opposite)
}
