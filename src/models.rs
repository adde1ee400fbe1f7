//! API request and response shapes

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::backtesting::{
    LeagueMarketStats, RankingResult, SeasonMode, StatsSummary, TeamPopularity, TradeEntry,
    Under25Rule,
};
use crate::data::Roster;

fn default_starting_capital() -> f64 {
    1000.0
}

fn default_stake_percentage() -> f64 {
    5.0
}

fn default_season() -> String {
    "all".to_string()
}

/// One point of the capital trajectory chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: usize,
    pub y: f64,
}

impl ChartPoint {
    /// Capital trajectory of a trade sequence
    pub fn from_entries(entries: &[TradeEntry]) -> Vec<ChartPoint> {
        entries
            .iter()
            .map(|e| ChartPoint {
                x: e.sequence_number,
                y: e.capital_after,
            })
            .collect()
    }
}

/// Investment calculation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    #[serde(default = "default_starting_capital")]
    pub starting_capital: f64,
    #[serde(default = "default_stake_percentage")]
    pub stake_percentage: f64,
    #[serde(default = "default_season")]
    pub selected_season: String,
    #[serde(default)]
    pub season_mode: SeasonMode,
    pub selected_league: Option<String>,
    pub selected_market: Option<String>,
    #[serde(default)]
    pub t9_teams_active: bool,
    #[serde(default)]
    pub under25_rule: Under25Rule,
}

/// Investment calculation response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub success: bool,
    pub processed_data: Vec<TradeEntry>,
    pub stats: StatsSummary,
    pub chart_data: Vec<ChartPoint>,
}

/// Team ranking request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRequest {
    pub selected_league: Option<String>,
    #[serde(default = "default_season")]
    pub selected_season: String,
    pub selected_market: Option<String>,
    #[serde(default)]
    pub t9_teams_active: bool,
}

/// Team ranking response: the selected market and its defined opposite
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub success: bool,
    pub selected_market_ranking: RankingResult,
    pub opposite_market_ranking: RankingResult,
}

/// Filter discovery response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersResponse {
    pub success: bool,
    pub seasons: Vec<String>,
    pub leagues: Vec<String>,
    pub t9_teams: Roster,
}

/// Season-list response
#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    pub success: bool,
    pub seasons: Vec<String>,
}

/// Query parameters of the team popularity endpoint
#[derive(Debug, Deserialize)]
pub struct TeamsQuery {
    pub season: Option<String>,
}

/// Team popularity response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsResponse {
    pub success: bool,
    pub team_popularity: HashMap<String, HashMap<String, TeamPopularity>>,
    pub total_teams: usize,
}

/// Backtest-by-selected-teams request; teams are `league:team` keys
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub selected_teams: Vec<String>,
    pub market: Option<String>,
    #[serde(default = "default_season")]
    pub season_filter: String,
    #[serde(default = "default_starting_capital")]
    pub starting_capital: f64,
    #[serde(default = "default_stake_percentage")]
    pub stake_percentage: f64,
}

/// Backtest-by-selected-teams response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub success: bool,
    pub processed_data: Vec<TradeEntry>,
    pub stats: StatsSummary,
    pub total_games: usize,
    pub selected_teams_count: usize,
}

/// League market scan response
#[derive(Debug, Serialize)]
pub struct MarketsAnalysisResponse {
    pub markets: Vec<LeagueMarketStats>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub data_loaded: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
