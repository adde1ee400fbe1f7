//! Raw record normalization for match CSV data
//!
//! Converts comma-separated text (or pre-split field maps) into typed
//! [`MatchRecord`]s. Column order is irrelevant; column names are the join
//! key with the roster table and the goal-resolver synonym lists.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical identity columns of a match row
const SEASON_KEY: &str = "Season";
const LEAGUE_KEY: &str = "League";
const HOME_TEAM_KEY: &str = "HomeTeam";
const AWAY_TEAM_KEY: &str = "AwayTeam";
const TRADE_KEY: &str = "Trade";

/// One coerced cell from a tabular row.
///
/// An empty (or whitespace-only) cell stays empty, a cell that parses fully
/// as a number becomes numeric, everything else stays text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Coerce a raw cell string
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(trimmed.to_string()),
        }
    }

    /// Numeric view of the cell, if it holds a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of the cell: numbers render without a trailing `.0`,
    /// empty cells render as an empty string.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            CellValue::Number(n) => format!("{}", n),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            Some(Repr::Number(n)) => Ok(CellValue::Number(n)),
            Some(Repr::Text(s)) if s.trim().is_empty() => Ok(CellValue::Empty),
            Some(Repr::Text(s)) => Ok(CellValue::Text(s)),
            None => Ok(CellValue::Empty),
        }
    }
}

/// A raw tabular row: column name to coerced cell
pub type RawRecord = HashMap<String, CellValue>;

/// A normalized, immutable match record.
///
/// Identity columns are lifted into typed fields; everything else (goal
/// variants, odds, precomputed flags) stays in the pass-through map and is
/// carried unmodified into simulation output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub season: String,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub trade_id: String,
    /// Parsed from `trade_id` (`t<n>` with n > 0); `None` drops the record
    /// during trade ordering
    pub trade_number: Option<u32>,
    #[serde(flatten)]
    pub fields: RawRecord,
}

impl MatchRecord {
    /// Build a record from a raw row, deriving the trade number
    pub fn from_raw(raw: RawRecord) -> Self {
        let text = |key: &str| raw.get(key).map(|c| c.as_text()).unwrap_or_default();

        let trade_id = text(TRADE_KEY);
        let trade_number = parse_trade_number(raw.get(TRADE_KEY));

        Self {
            season: text(SEASON_KEY),
            league: text(LEAGUE_KEY),
            home_team: text(HOME_TEAM_KEY),
            away_team: text(AWAY_TEAM_KEY),
            trade_id,
            trade_number,
            fields: raw,
        }
    }

    /// Look up a pass-through field by column name
    pub fn field(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    /// Numeric value of a field, if present and numeric
    pub fn numeric_field(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(CellValue::as_number)
    }

    /// Odds field accessor: absent or non-numeric is treated as 0
    pub fn odds(&self, key: &str) -> f64 {
        self.numeric_field(key).unwrap_or(0.0)
    }
}

/// Derive a trade number from the trade cell.
///
/// Strips a leading `t` and parses the remainder as a positive integer;
/// bare positive integers are accepted as well.
fn parse_trade_number(cell: Option<&CellValue>) -> Option<u32> {
    match cell? {
        CellValue::Number(n) if *n > 0.0 && n.fract() == 0.0 => Some(*n as u32),
        CellValue::Text(s) => {
            let digits = s.trim().strip_prefix('t').unwrap_or(s.trim());
            match digits.parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Parse raw CSV text into normalized match records.
///
/// The first line is the header; blank lines are skipped. Cells are coerced
/// per [`CellValue::coerce`]; rows shorter than the header get empty cells
/// for the missing columns.
pub fn normalize(csv_text: &str) -> Vec<MatchRecord> {
    let mut lines = csv_text.lines();

    let headers: Vec<String> = match lines.next() {
        Some(header_line) => header_line.split(',').map(|h| h.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split(',').collect();
        let mut raw = RawRecord::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            let cell = values.get(i).map(|v| CellValue::coerce(v)).unwrap_or(CellValue::Empty);
            raw.insert(header.clone(), cell);
        }
        records.push(MatchRecord::from_raw(raw));
    }

    records
}

/// Normalize rows that have already been split into field maps
pub fn normalize_rows(rows: Vec<RawRecord>) -> Vec<MatchRecord> {
    rows.into_iter().map(MatchRecord::from_raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_empty() {
        assert_eq!(CellValue::coerce(""), CellValue::Empty);
        assert_eq!(CellValue::coerce("   "), CellValue::Empty);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(CellValue::coerce("3"), CellValue::Number(3.0));
        assert_eq!(CellValue::coerce(" 1.85 "), CellValue::Number(1.85));
        assert_eq!(CellValue::coerce("-2"), CellValue::Number(-2.0));
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(
            CellValue::coerce("Celtic"),
            CellValue::Text("Celtic".to_string())
        );
        // Partial numbers stay text
        assert_eq!(
            CellValue::coerce("2-1"),
            CellValue::Text("2-1".to_string())
        );
        assert_eq!(
            CellValue::coerce("t12"),
            CellValue::Text("t12".to_string())
        );
    }

    #[test]
    fn test_as_text_number_formatting() {
        assert_eq!(CellValue::Number(2019.0).as_text(), "2019");
        assert_eq!(CellValue::Number(1.85).as_text(), "1.85");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_parse_trade_number() {
        let t = |s: &str| parse_trade_number(Some(&CellValue::coerce(s)));
        assert_eq!(t("t12"), Some(12));
        assert_eq!(t("t1"), Some(1));
        assert_eq!(t("7"), Some(7));
        assert_eq!(t("t0"), None);
        assert_eq!(t("tx"), None);
        assert_eq!(t(""), None);
        assert_eq!(parse_trade_number(None), None);
    }

    #[test]
    fn test_normalize_basic() {
        let csv = "Season,League,HomeTeam,AwayTeam,Trade,FTHG,FTAG,odd\n\
                   2019,Premier League,Arsenal,Chelsea,t2,2,1,1.85\n\
                   \n\
                   2020,Premier League,Liverpool,Everton,t1,0,0,2.10\n";
        let records = normalize(csv);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].season, "2019");
        assert_eq!(records[0].league, "Premier League");
        assert_eq!(records[0].home_team, "Arsenal");
        assert_eq!(records[0].away_team, "Chelsea");
        assert_eq!(records[0].trade_id, "t2");
        assert_eq!(records[0].trade_number, Some(2));
        assert_eq!(records[0].numeric_field("FTHG"), Some(2.0));
        assert!((records[0].odds("odd") - 1.85).abs() < 1e-9);
        assert_eq!(records[1].trade_number, Some(1));
    }

    #[test]
    fn test_normalize_short_row_pads_empty() {
        let csv = "Season,League,HomeTeam,AwayTeam,Trade\n2019,SPL,Celtic\n";
        let records = normalize(csv);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].away_team, "");
        assert_eq!(records[0].trade_number, None);
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("Season,League\n").is_empty());
    }

    #[test]
    fn test_odds_defaults_to_zero() {
        let records = normalize("Season,League,Trade,odd\n2019,SPL,t1,n/a\n");
        assert_eq!(records[0].odds("odd"), 0.0);
        assert_eq!(records[0].odds("odd2"), 0.0);
    }

    #[test]
    fn test_cell_value_serde() {
        let json = serde_json::to_string(&CellValue::Number(1.85)).unwrap();
        assert_eq!(json, "1.85");
        let json = serde_json::to_string(&CellValue::Text("Celtic".into())).unwrap();
        assert_eq!(json, "\"Celtic\"");
        let json = serde_json::to_string(&CellValue::Empty).unwrap();
        assert_eq!(json, "\"\"");

        let back: CellValue = serde_json::from_str("1.85").unwrap();
        assert_eq!(back, CellValue::Number(1.85));
        let back: CellValue = serde_json::from_str("\"\"").unwrap();
        assert_eq!(back, CellValue::Empty);
    }
}
