//! Market simulation
//!
//! Runs the staged-capital simulation over a filtered, trade-ordered record
//! sequence. Stake sizing is fixed: the stake is computed once from the
//! starting capital and never rescaled, even though capital itself compounds
//! trade to trade.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::{resolve_total_goals, MatchRecord, RawRecord};

/// Precomputed under-2.5 flag column used by the `Flag` rule
const UNDER25_FLAG_KEY: &str = "Under2.5";

/// Records per group in the grouped under-6 market
const UNDER6_GROUP_SIZE: usize = 3;

/// Supported markets and their odds source columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    #[serde(rename = "over2.5")]
    Over25,
    #[serde(rename = "under2.5")]
    Under25,
    #[serde(rename = "under6")]
    Under6,
}

impl Market {
    /// Wire / CLI name of the market
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Over25 => "over2.5",
            Market::Under25 => "under2.5",
            Market::Under6 => "under6",
        }
    }

    /// Parse a market name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "over2.5" => Some(Market::Over25),
            "under2.5" => Some(Market::Under25),
            "under6" => Some(Market::Under6),
            _ => None,
        }
    }

    /// The opposing market used for comparison rankings.
    ///
    /// under6 has no symmetric "over6"; over2.5 is the chosen default.
    pub fn opposite(&self) -> Market {
        match self {
            Market::Over25 => Market::Under25,
            Market::Under25 => Market::Over25,
            Market::Under6 => Market::Over25,
        }
    }

    /// Column the market's odds are read from
    pub fn odds_key(&self) -> &'static str {
        match self {
            Market::Over25 => "odd",
            Market::Under25 => "odd2",
            Market::Under6 => "odd3",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

/// How the under-2.5 win condition is decided.
///
/// Two call sites of the historical system disagree: one recomputes the
/// threshold from resolved total goals, the other trusts a precomputed
/// `Under2.5` flag column. Both are kept selectable; neither is silently
/// preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Under25Rule {
    /// Win iff the resolved total is <= 2
    #[default]
    Recompute,
    /// Win iff the `Under2.5` column equals 1
    Flag,
}

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub starting_capital: f64,
    /// Percentage of starting capital staked per trade (0-100)
    pub stake_percentage: f64,
    pub market: Market,
    pub under25_rule: Under25Rule,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            starting_capital: 1000.0,
            stake_percentage: 5.0,
            market: Market::Over25,
            under25_rule: Under25Rule::default(),
        }
    }
}

impl SimulationConfig {
    /// Fixed stake amount for the whole run
    pub fn stake_amount(&self) -> f64 {
        self.starting_capital * self.stake_percentage / 100.0
    }
}

/// One simulated stake: a single record, or a group of three for the
/// grouped under-6 market. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEntry {
    pub trade_id: String,
    /// 1-based position in this simulation run, independent of the
    /// original trade id
    pub sequence_number: usize,
    pub stake: f64,
    pub outcome: Outcome,
    pub profit: f64,
    /// Running capital immediately after this trade's profit is applied
    pub capital_after: f64,
    pub market_type: Market,
    pub odds_used: f64,
    /// Pass-through columns of the (representative) source record
    #[serde(flatten)]
    pub fields: RawRecord,
}

impl TradeEntry {
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

/// Canonical profit rule, shared by all markets.
///
/// A win with non-positive odds is scored as a loss-equivalent debit.
fn profit_for(won: bool, odds: f64, stake: f64) -> f64 {
    if won && odds > 0.0 {
        stake * (odds - 1.0)
    } else {
        -stake
    }
}

/// Run the market simulation over filtered, trade-ordered records.
///
/// Standard markets produce one [`TradeEntry`] per record. The grouped
/// under-6 market partitions the sequence into consecutive triplets, discards
/// a trailing partial group, and produces one entry per triplet with trade
/// ids renumbered `t1`, `t2`, ...
pub fn simulate(records: &[MatchRecord], config: &SimulationConfig) -> Vec<TradeEntry> {
    match config.market {
        Market::Under6 => simulate_grouped(records, config),
        Market::Over25 | Market::Under25 => simulate_standard(records, config),
    }
}

fn simulate_standard(records: &[MatchRecord], config: &SimulationConfig) -> Vec<TradeEntry> {
    let stake = config.stake_amount();
    let mut capital = config.starting_capital;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let won = match config.market {
                Market::Over25 => resolve_total_goals(record).is_some_and(|total| total > 2.0),
                Market::Under25 => match config.under25_rule {
                    Under25Rule::Recompute => {
                        resolve_total_goals(record).is_some_and(|total| total <= 2.0)
                    }
                    Under25Rule::Flag => record.numeric_field(UNDER25_FLAG_KEY) == Some(1.0),
                },
                Market::Under6 => unreachable!("grouped market handled separately"),
            };

            let odds = record.odds(config.market.odds_key());
            let profit = profit_for(won, odds, stake);
            capital += profit;

            TradeEntry {
                trade_id: record.trade_id.clone(),
                sequence_number: index + 1,
                stake,
                outcome: if won { Outcome::Win } else { Outcome::Loss },
                profit,
                capital_after: capital,
                market_type: config.market,
                odds_used: odds,
                fields: record.fields.clone(),
            }
        })
        .collect()
}

fn simulate_grouped(records: &[MatchRecord], config: &SimulationConfig) -> Vec<TradeEntry> {
    let stake = config.stake_amount();
    let mut capital = config.starting_capital;
    let mut entries = Vec::with_capacity(records.len() / UNDER6_GROUP_SIZE);

    // chunks_exact discards the trailing partial group
    for group in records.chunks_exact(UNDER6_GROUP_SIZE) {
        let won = group.iter().all(|record| {
            resolve_total_goals(record).is_some_and(|total| total < 6.0)
        });

        let representative = &group[0];
        let odds = representative.odds(Market::Under6.odds_key());
        let profit = profit_for(won, odds, stake);
        capital += profit;

        let sequence_number = entries.len() + 1;
        entries.push(TradeEntry {
            trade_id: format!("t{}", sequence_number),
            sequence_number,
            stake,
            outcome: if won { Outcome::Win } else { Outcome::Loss },
            profit,
            capital_after: capital,
            market_type: Market::Under6,
            odds_used: odds,
            fields: representative.fields.clone(),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize;

    const EPS: f64 = 1e-9;

    fn config(market: Market) -> SimulationConfig {
        SimulationConfig {
            starting_capital: 1000.0,
            stake_percentage: 5.0,
            market,
            under25_rule: Under25Rule::Recompute,
        }
    }

    #[test]
    fn test_market_parse_and_display() {
        assert_eq!(Market::parse("over2.5"), Some(Market::Over25));
        assert_eq!(Market::parse("under2.5"), Some(Market::Under25));
        assert_eq!(Market::parse("under6"), Some(Market::Under6));
        assert_eq!(Market::parse("over6"), None);
        assert_eq!(Market::Under6.to_string(), "under6");
    }

    #[test]
    fn test_opposite_mapping() {
        assert_eq!(Market::Over25.opposite(), Market::Under25);
        assert_eq!(Market::Under25.opposite(), Market::Over25);
        assert_eq!(Market::Under6.opposite(), Market::Over25);
    }

    #[test]
    fn test_stake_is_fixed_from_starting_capital() {
        let config = config(Market::Over25);
        assert!((config.stake_amount() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_under25_loss_then_win() {
        // t1 total=3 -> loss; t2 total=1 -> win at odd2=1.8
        let records = normalize(
            "Season,League,Trade,FTHG,FTAG,odd2\n\
             2019,SPL,t1,2,1,1.9\n\
             2019,SPL,t2,1,0,1.8\n",
        );
        let entries = simulate(&records, &config(Market::Under25));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].outcome, Outcome::Loss);
        assert!((entries[0].profit + 50.0).abs() < EPS);
        assert!((entries[0].capital_after - 950.0).abs() < EPS);
        assert_eq!(entries[1].outcome, Outcome::Win);
        assert!((entries[1].profit - 40.0).abs() < EPS);
        assert!((entries[1].capital_after - 990.0).abs() < EPS);
        // Standard markets keep the original trade id
        assert_eq!(entries[0].trade_id, "t1");
        assert_eq!(entries[1].sequence_number, 2);
    }

    #[test]
    fn test_over25_wins_above_threshold() {
        let records = normalize(
            "Season,League,Trade,FTHG,FTAG,odd\n\
             2019,SPL,t1,2,1,2.0\n\
             2019,SPL,t2,1,1,2.0\n",
        );
        let entries = simulate(&records, &config(Market::Over25));

        assert_eq!(entries[0].outcome, Outcome::Win);
        assert!((entries[0].profit - 50.0).abs() < EPS);
        assert_eq!(entries[1].outcome, Outcome::Loss);
        assert!((entries[1].capital_after - 1000.0).abs() < EPS);
    }

    #[test]
    fn test_unresolvable_total_is_a_loss_trade() {
        let records = normalize("Season,League,Trade,odd\n2019,SPL,t1,2.0\n");
        let entries = simulate(&records, &config(Market::Over25));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, Outcome::Loss);
        assert!((entries[0].capital_after - 950.0).abs() < EPS);
    }

    #[test]
    fn test_win_with_zero_odds_is_debited() {
        // total <= 2 wins under2.5, but odd2 is missing -> odds 0 -> debit
        let records = normalize("Season,League,Trade,FTHG,FTAG\n2019,SPL,t1,0,0\n");
        let entries = simulate(&records, &config(Market::Under25));

        assert_eq!(entries[0].outcome, Outcome::Win);
        assert!((entries[0].profit + 50.0).abs() < EPS);
        assert_eq!(entries[0].odds_used, 0.0);
    }

    #[test]
    fn test_under25_flag_rule() {
        // Flag says win even though the total recomputes to a loss
        let records = normalize(
            "Season,League,Trade,FTHG,FTAG,Under2.5,odd2\n\
             2019,SPL,t1,2,1,1,2.0\n\
             2019,SPL,t2,0,0,0,2.0\n",
        );
        let mut cfg = config(Market::Under25);
        cfg.under25_rule = Under25Rule::Flag;
        let entries = simulate(&records, &cfg);

        assert_eq!(entries[0].outcome, Outcome::Win);
        assert_eq!(entries[1].outcome, Outcome::Loss);
    }

    #[test]
    fn test_grouped_under6_win() {
        let records = normalize(
            "Season,League,Trade,FTHG,FTAG,odd3\n\
             2019,SPL,t1,2,1,2.5\n\
             2019,SPL,t2,0,0,1.1\n\
             2019,SPL,t3,3,2,1.2\n",
        );
        let entries = simulate(&records, &config(Market::Under6));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trade_id, "t1");
        assert_eq!(entries[0].outcome, Outcome::Win);
        // Odds come from the first (representative) record
        assert!((entries[0].odds_used - 2.5).abs() < EPS);
        assert!((entries[0].profit - 75.0).abs() < EPS);
        assert!((entries[0].capital_after - 1075.0).abs() < EPS);
    }

    #[test]
    fn test_grouped_under6_any_high_total_fails_group() {
        let records = normalize(
            "Season,League,Trade,FTHG,FTAG,odd3\n\
             2019,SPL,t1,2,1,2.5\n\
             2019,SPL,t2,4,2,1.1\n\
             2019,SPL,t3,0,0,1.2\n",
        );
        let entries = simulate(&records, &config(Market::Under6));
        assert_eq!(entries[0].outcome, Outcome::Loss);
    }

    #[test]
    fn test_grouped_under6_unresolvable_fails_group() {
        let records = normalize(
            "Season,League,Trade,FTHG,FTAG,odd3\n\
             2019,SPL,t1,2,1,2.5\n\
             2019,SPL,t2,,,1.1\n\
             2019,SPL,t3,0,0,1.2\n",
        );
        let entries = simulate(&records, &config(Market::Under6));
        assert_eq!(entries[0].outcome, Outcome::Loss);
    }

    #[test]
    fn test_grouped_under6_discards_partial_group() {
        let records = normalize(
            "Season,League,Trade,FTHG,FTAG,odd3\n\
             2019,SPL,t1,0,0,2.5\n\
             2019,SPL,t2,0,0,2.5\n\
             2019,SPL,t3,0,0,2.5\n\
             2019,SPL,t4,0,0,2.5\n\
             2019,SPL,t5,0,0,2.5\n",
        );
        let entries = simulate(&records, &config(Market::Under6));
        // floor(5 / 3) == 1 group
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_grouped_entries_are_renumbered() {
        let records = normalize(
            "Season,League,Trade,FTHG,FTAG,odd3\n\
             2019,SPL,t40,0,0,1.5\n\
             2019,SPL,t41,0,0,1.5\n\
             2019,SPL,t42,0,0,1.5\n\
             2019,SPL,t43,0,0,1.5\n\
             2019,SPL,t44,0,0,1.5\n\
             2019,SPL,t45,0,0,1.5\n",
        );
        let entries = simulate(&records, &config(Market::Under6));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].trade_id, "t1");
        assert_eq!(entries[1].trade_id, "t2");
        assert_eq!(entries[1].sequence_number, 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(simulate(&[], &config(Market::Over25)).is_empty());
        assert!(simulate(&[], &config(Market::Under6)).is_empty());
    }

    #[test]
    fn test_trade_entry_serializes_camel_case_with_fields() {
        let records = normalize("Season,League,Trade,FTHG,FTAG,odd\n2019,SPL,t1,2,1,2.0\n");
        let entries = simulate(&records, &config(Market::Over25));
        let json = serde_json::to_value(&entries[0]).unwrap();

        assert_eq!(json["marketType"], "over2.5");
        assert_eq!(json["sequenceNumber"], 1);
        assert!(json["capitalAfter"].is_number());
        // Pass-through columns are merged into the entry
        assert_eq!(json["Season"], 2019.0);
        assert_eq!(json["FTHG"], 2.0);
    }
}
