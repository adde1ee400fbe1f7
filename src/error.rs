use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::backtesting::Market;
use crate::models::ErrorResponse;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid or missing request parameters
    ValidationError(String),
    /// Data source could not be read
    DataSourceError(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::DataSourceError(msg) => write!(f, "Data source error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DataSourceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::DataSourceError(msg) => ("data_source_error", msg.clone()),
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}

/// Validation functions
pub fn validate_league(league: Option<&str>) -> Result<String, AppError> {
    match league {
        Some(l) if !l.trim().is_empty() => Ok(l.to_string()),
        _ => Err(AppError::ValidationError("No league selected".to_string())),
    }
}

pub fn validate_market(market: Option<&str>) -> Result<Market, AppError> {
    let name = market
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("No market selected".to_string()))?;
    Market::parse(name).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Unknown market '{}'; expected over2.5, under2.5 or under6",
            name
        ))
    })
}

pub fn validate_starting_capital(capital: f64) -> Result<(), AppError> {
    if capital <= 0.0 {
        return Err(AppError::ValidationError(format!(
            "Starting capital must be positive, got {}",
            capital
        )));
    }
    Ok(())
}

pub fn validate_stake_percentage(pct: f64) -> Result<(), AppError> {
    if !(0.0..=100.0).contains(&pct) {
        return Err(AppError::ValidationError(format!(
            "Stake percentage must be between 0 and 100, got {}",
            pct
        )));
    }
    Ok(())
}

pub fn validate_selected_teams(teams: &[String]) -> Result<(), AppError> {
    if teams.is_empty() {
        return Err(AppError::ValidationError("No teams selected".to_string()));
    }
    Ok(())
}
