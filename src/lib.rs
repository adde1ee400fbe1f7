//! Goalpost - Staged betting backtest engine for football match data
//!
//! This library provides:
//! - Normalization of raw tabular match records (column coercion, trade ids)
//! - A canonical total-goals resolver with an ordered fallback chain
//! - Season / league / roster filtering and trade ordering
//! - Market simulation (over 2.5, under 2.5, grouped under 6) with
//!   fixed-stake capital tracking
//! - Summary statistics and team-level market rankings
//!
//! # Example
//!
//! ```no_run
//! use goalpost::backtesting::{simulate, summarize, SimulationConfig};
//! use goalpost::data::normalize;
//!
//! let csv_text = std::fs::read_to_string("data/MAINRAW.csv").unwrap();
//! let records = normalize(&csv_text);
//!
//! let config = SimulationConfig::default();
//! let entries = simulate(&records, &config);
//! let stats = summarize(&entries, config.starting_capital);
//! println!("Final capital: {:.2}", stats.final_capital);
//! ```

pub mod backtesting;
pub mod data;
pub mod models;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;
#[cfg(feature = "api")]
pub mod handlers;

// Re-export commonly used types
pub use backtesting::{
    order_by_trade, rank_teams, simulate, summarize, Market, Outcome, RankingResult, SeasonMode,
    SimulationConfig, StatsSummary, TradeEntry, Under25Rule,
};
pub use data::{normalize, normalize_rows, resolve_total_goals, CellValue, MatchRecord, Roster};
