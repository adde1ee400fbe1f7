use actix_web::{web, HttpResponse};
use std::sync::Arc;

use super::AppState;
use crate::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_loaded: state.data_path.exists(),
    })
}
