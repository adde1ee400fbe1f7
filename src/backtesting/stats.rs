//! Summary statistics and dataset-wide analyses
//!
//! Pure reductions over simulation output plus two dataset scans kept from
//! the historical system: a per-league market scan and per-team market
//! percentages.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::filters::{filter_by_season, order_by_trade, SeasonMode};
use super::simulator::TradeEntry;
use crate::data::{resolve_total_goals, MatchRecord};

/// Default bankroll used by the league market scan
const SCAN_STARTING_CAPITAL: f64 = 1000.0;
const SCAN_STAKE_PERCENTAGE: f64 = 5.0;
/// Odds fallback applied by the scan when the odds column is missing or zero
const SCAN_DEFAULT_ODDS: f64 = 1.8;

/// Aggregate metrics of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_games: usize,
    pub final_capital: f64,
    pub total_return: f64,
    /// Percentage of winning trades, 0-100
    pub win_rate: f64,
    pub max_capital: f64,
    pub min_capital: f64,
    /// Total return as a percentage of starting capital
    pub roi: f64,
}

/// Reduce a trade sequence to summary metrics.
///
/// An empty sequence yields capitals pinned at the starting value and zero
/// counts/returns.
pub fn summarize(entries: &[TradeEntry], starting_capital: f64) -> StatsSummary {
    if entries.is_empty() {
        return StatsSummary {
            total_games: 0,
            final_capital: starting_capital,
            total_return: 0.0,
            win_rate: 0.0,
            max_capital: starting_capital,
            min_capital: starting_capital,
            roi: 0.0,
        };
    }

    let total_games = entries.len();
    let final_capital = entries[total_games - 1].capital_after;
    let total_return = final_capital - starting_capital;
    let wins = entries.iter().filter(|e| e.is_win()).count();
    let win_rate = wins as f64 / total_games as f64 * 100.0;
    let max_capital = entries.iter().map(|e| e.capital_after).fold(f64::MIN, f64::max);
    let min_capital = entries.iter().map(|e| e.capital_after).fold(f64::MAX, f64::min);
    let roi = total_return / starting_capital * 100.0;

    StatsSummary {
        total_games,
        final_capital,
        total_return,
        win_rate,
        max_capital,
        min_capital,
        roi,
    }
}

/// Per-league result of the over/under market scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueMarketStats {
    pub id: String,
    pub league: String,
    /// "over" or "under"
    pub strategy: String,
    pub wins: usize,
    pub losses: usize,
    /// Games with a resolvable total
    pub total_games: usize,
    pub win_rate: f64,
    pub roi: f64,
    pub income: f64,
    pub final_capital: f64,
}

fn scan_strategy(records: &[MatchRecord], strategy: &str, league: &str) -> LeagueMarketStats {
    let stake = SCAN_STARTING_CAPITAL * SCAN_STAKE_PERCENTAGE / 100.0;

    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut total_return = 0.0;
    let mut capital = SCAN_STARTING_CAPITAL;
    let mut valid_games = 0usize;

    for record in order_by_trade(records) {
        let total = match resolve_total_goals(&record) {
            Some(t) => t,
            // Unlike the staged simulation, the scan skips unresolvable
            // records entirely instead of scoring them as losses
            None => continue,
        };
        valid_games += 1;

        let (won, odds_key) = if strategy == "over" {
            (total > 2.0, "odd")
        } else {
            (total <= 2.0, "odd2")
        };

        let profit = if won {
            wins += 1;
            let odds = match record.odds(odds_key) {
                o if o > 0.0 => o,
                _ => SCAN_DEFAULT_ODDS,
            };
            stake * (odds - 1.0)
        } else {
            losses += 1;
            -stake
        };

        total_return += profit;
        capital += profit;
    }

    let win_rate = if valid_games > 0 {
        wins as f64 / valid_games as f64 * 100.0
    } else {
        0.0
    };

    LeagueMarketStats {
        id: format!("{}-{}", league, strategy),
        league: league.to_string(),
        strategy: strategy.to_string(),
        wins,
        losses,
        total_games: valid_games,
        win_rate,
        roi: total_return / SCAN_STARTING_CAPITAL * 100.0,
        income: total_return,
        final_capital: capital,
    }
}

/// Run the over and under strategies for every league in the dataset with
/// the default bankroll; leagues with no valid games are omitted. Results
/// are sorted by ROI descending.
pub fn scan_league_markets(records: &[MatchRecord]) -> Vec<LeagueMarketStats> {
    let leagues = super::filters::distinct_leagues(records);
    let mut markets = Vec::with_capacity(leagues.len() * 2);

    for league in leagues {
        let league_records: Vec<MatchRecord> =
            super::filters::filter_by_league(records, &league);

        for strategy in ["over", "under"] {
            let stats = scan_strategy(&league_records, strategy, &league);
            if stats.total_games > 0 {
                markets.push(stats);
            }
        }
    }

    markets.sort_by(|a, b| b.roi.partial_cmp(&a.roi).unwrap_or(std::cmp::Ordering::Equal));
    markets
}

/// Per-team market success percentages over valid matches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPopularity {
    pub over25_percentage: f64,
    pub under25_percentage: f64,
    pub under6_percentage: f64,
    pub total_matches: usize,
    pub valid_matches: usize,
    pub over25_count: usize,
    pub under25_count: usize,
    pub under6_count: usize,
}

/// Compute per-league, per-team market percentages.
///
/// The season argument uses lower-bound (`From`) semantics; a team's
/// percentages are taken over its matches with a resolvable total.
pub fn team_popularity(
    records: &[MatchRecord],
    season: &str,
) -> HashMap<String, HashMap<String, TeamPopularity>> {
    let filtered = filter_by_season(records, SeasonMode::From, season);

    let mut popularity: HashMap<String, HashMap<String, TeamPopularity>> = HashMap::new();

    for league in super::filters::distinct_leagues(&filtered) {
        let league_records = super::filters::filter_by_league(&filtered, &league);
        let mut teams: Vec<String> = Vec::new();
        for record in &league_records {
            for team in [&record.home_team, &record.away_team] {
                if !team.is_empty() && !teams.contains(team) {
                    teams.push(team.clone());
                }
            }
        }

        let league_entry = popularity.entry(league).or_default();
        for team in teams {
            let matches: Vec<&MatchRecord> = league_records
                .iter()
                .filter(|r| r.home_team == team || r.away_team == team)
                .collect();
            if matches.is_empty() {
                continue;
            }

            let totals: Vec<f64> = matches
                .iter()
                .filter_map(|r| resolve_total_goals(r))
                .collect();
            let valid = totals.len();
            let over25 = totals.iter().filter(|&&t| t > 2.0).count();
            let under25 = totals.iter().filter(|&&t| t <= 2.0).count();
            let under6 = totals.iter().filter(|&&t| t < 6.0).count();

            let pct = |count: usize| {
                if valid > 0 {
                    count as f64 / valid as f64 * 100.0
                } else {
                    0.0
                }
            };

            league_entry.insert(
                team,
                TeamPopularity {
                    over25_percentage: pct(over25),
                    under25_percentage: pct(under25),
                    under6_percentage: pct(under6),
                    total_matches: matches.len(),
                    valid_matches: valid,
                    over25_count: over25,
                    under25_count: under25,
                    under6_count: under6,
                },
            );
        }
    }

    popularity
}
