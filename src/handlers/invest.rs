use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use super::AppState;
use crate::backtesting::{
    distinct_leagues, distinct_seasons, filter_by_league, filter_by_roster, filter_by_season,
    order_by_trade, rank_teams, simulate, summarize, SimulationConfig,
};
use crate::error::{
    validate_league, validate_market, validate_stake_percentage, validate_starting_capital,
    AppError,
};
use crate::models::{
    CalculateRequest, CalculateResponse, ChartPoint, FiltersResponse, RankingRequest,
    RankingResponse,
};

/// Run the staged investment calculation
pub async fn calculate(
    state: web::Data<Arc<AppState>>,
    req: web::Json<CalculateRequest>,
) -> Result<HttpResponse, AppError> {
    let league = validate_league(req.selected_league.as_deref())?;
    let market = validate_market(req.selected_market.as_deref())?;
    validate_starting_capital(req.starting_capital)?;
    validate_stake_percentage(req.stake_percentage)?;

    let records = state.load_records()?;

    let filtered = filter_by_season(&records, req.season_mode, &req.selected_season);
    let filtered = filter_by_league(&filtered, &league);
    let filtered = filter_by_roster(&filtered, &league, &state.roster, req.t9_teams_active);
    let ordered = order_by_trade(&filtered);

    let config = SimulationConfig {
        starting_capital: req.starting_capital,
        stake_percentage: req.stake_percentage,
        market,
        under25_rule: req.under25_rule,
    };
    let processed_data = simulate(&ordered, &config);
    let stats = summarize(&processed_data, req.starting_capital);

    info!(
        league = %league,
        market = %market,
        trades = processed_data.len(),
        final_capital = stats.final_capital,
        "calculation complete"
    );

    let chart_data = ChartPoint::from_entries(&processed_data);
    Ok(HttpResponse::Ok().json(CalculateResponse {
        success: true,
        processed_data,
        stats,
        chart_data,
    }))
}

/// Rank teams for the selected market and its defined opposite
pub async fn teams_ranking(
    state: web::Data<Arc<AppState>>,
    req: web::Json<RankingRequest>,
) -> Result<HttpResponse, AppError> {
    let league = validate_league(req.selected_league.as_deref())?;
    let market = validate_market(req.selected_market.as_deref())?;

    let records = state.load_records()?;

    let selected_market_ranking = rank_teams(
        &records,
        &league,
        &req.selected_season,
        market,
        &state.roster,
        req.t9_teams_active,
        false,
    );
    let opposite_market_ranking = rank_teams(
        &records,
        &league,
        &req.selected_season,
        market,
        &state.roster,
        req.t9_teams_active,
        true,
    );

    Ok(HttpResponse::Ok().json(RankingResponse {
        success: true,
        selected_market_ranking,
        opposite_market_ranking,
    }))
}

/// List the distinct seasons and leagues of the dataset plus the roster table
pub async fn filters(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let records = state.load_records()?;

    Ok(HttpResponse::Ok().json(FiltersResponse {
        success: true,
        seasons: distinct_seasons(&records),
        leagues: distinct_leagues(&records),
        t9_teams: state.roster.clone(),
    }))
}
