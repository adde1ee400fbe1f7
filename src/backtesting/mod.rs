//! Backtesting engine: filtering, market simulation, statistics, rankings

pub mod filters;
pub mod ranking;
pub mod simulator;
pub mod stats;

pub use filters::{
    distinct_leagues, distinct_seasons, filter_by_league, filter_by_roster, filter_by_season,
    order_by_trade, SeasonMode, ALL_SEASONS,
};
pub use ranking::{rank_teams, rank_teams_filtered, RankingResult};
pub use simulator::{simulate, Market, Outcome, SimulationConfig, TradeEntry, Under25Rule};
pub use stats::{
    scan_league_markets, summarize, team_popularity, LeagueMarketStats, StatsSummary,
    TeamPopularity,
};
