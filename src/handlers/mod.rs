//! HTTP request handlers

pub mod backtest;
pub mod health;
pub mod invest;
pub mod markets;

use std::fs;
use std::path::PathBuf;

use crate::data::{normalize, MatchRecord, Roster};
use crate::error::AppError;

/// Application state shared across handlers
pub struct AppState {
    /// Source CSV of historical match records
    pub data_path: PathBuf,
    /// T9 roster configuration, loaded once at startup
    pub roster: Roster,
}

impl AppState {
    pub fn new(data_path: PathBuf, roster: Roster) -> Self {
        Self { data_path, roster }
    }

    /// Re-read and normalize the data source.
    ///
    /// Every request parses the source afresh; runs stay independent and the
    /// engine itself never performs I/O.
    pub fn load_records(&self) -> Result<Vec<MatchRecord>, AppError> {
        let text = fs::read_to_string(&self.data_path).map_err(|e| {
            AppError::DataSourceError(format!(
                "Failed to read {}: {}",
                self.data_path.display(),
                e
            ))
        })?;
        Ok(normalize(&text))
    }
}
