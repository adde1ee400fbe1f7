use actix_web::{web, HttpResponse};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use super::AppState;
use crate::backtesting::{
    distinct_seasons, filter_by_season, order_by_trade, simulate, summarize, SeasonMode,
    SimulationConfig, Under25Rule,
};
use crate::error::{
    validate_market, validate_selected_teams, validate_stake_percentage,
    validate_starting_capital, AppError,
};
use crate::models::{RunRequest, RunResponse, SeasonsResponse, TeamsQuery, TeamsResponse};

/// Backtest over a caller-supplied selection of `league:team` keys
pub async fn run(
    state: web::Data<Arc<AppState>>,
    req: web::Json<RunRequest>,
) -> Result<HttpResponse, AppError> {
    validate_selected_teams(&req.selected_teams)?;
    let market = validate_market(req.market.as_deref())?;
    validate_starting_capital(req.starting_capital)?;
    validate_stake_percentage(req.stake_percentage)?;

    let records = state.load_records()?;
    let filtered = filter_by_season(&records, SeasonMode::From, &req.season_filter);

    let selected: HashSet<&str> = req.selected_teams.iter().map(String::as_str).collect();
    let filtered: Vec<_> = filtered
        .into_iter()
        .filter(|r| {
            let home_key = format!("{}:{}", r.league, r.home_team);
            let away_key = format!("{}:{}", r.league, r.away_team);
            selected.contains(home_key.as_str()) || selected.contains(away_key.as_str())
        })
        .collect();
    let ordered = order_by_trade(&filtered);

    let config = SimulationConfig {
        starting_capital: req.starting_capital,
        stake_percentage: req.stake_percentage,
        market,
        under25_rule: Under25Rule::default(),
    };
    let processed_data = simulate(&ordered, &config);
    let stats = summarize(&processed_data, req.starting_capital);

    info!(
        teams = req.selected_teams.len(),
        market = %market,
        trades = processed_data.len(),
        "team backtest complete"
    );

    let total_games = processed_data.len();
    Ok(HttpResponse::Ok().json(RunResponse {
        success: true,
        processed_data,
        stats,
        total_games,
        selected_teams_count: req.selected_teams.len(),
    }))
}

/// Per-league, per-team market percentages
pub async fn teams(
    state: web::Data<Arc<AppState>>,
    query: web::Query<TeamsQuery>,
) -> Result<HttpResponse, AppError> {
    let records = state.load_records()?;
    let season = query.season.as_deref().unwrap_or("all");

    let team_popularity = crate::backtesting::team_popularity(&records, season);
    let total_teams = team_popularity.values().map(|league| league.len()).sum();

    Ok(HttpResponse::Ok().json(TeamsResponse {
        success: true,
        team_popularity,
        total_teams,
    }))
}

/// Distinct seasons present in the dataset
pub async fn seasons(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let records = state.load_records()?;

    Ok(HttpResponse::Ok().json(SeasonsResponse {
        success: true,
        seasons: distinct_seasons(&records),
    }))
}
