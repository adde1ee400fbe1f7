use actix_web::{web, HttpResponse};
use std::sync::Arc;

use super::AppState;
use crate::backtesting::scan_league_markets;
use crate::error::AppError;
use crate::models::MarketsAnalysisResponse;

/// Over/under market scan across every league in the dataset
pub async fn analysis(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let records = state.load_records()?;

    Ok(HttpResponse::Ok().json(MarketsAnalysisResponse {
        markets: scan_league_markets(&records),
    }))
}
