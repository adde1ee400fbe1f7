//! Data normalization modules: cell coercion, goal resolution, roster config

pub mod goals;
pub mod loader;
pub mod roster;

// Re-export commonly used types
pub use goals::resolve_total_goals;
pub use loader::{normalize, normalize_rows, CellValue, MatchRecord, RawRecord};
pub use roster::Roster;
