//! Canonical total-goals resolution
//!
//! Historical feeds disagree on column naming, so the resolver walks an
//! ordered fallback chain. The chain order is a cross-cutting contract shared
//! by simulation and ranking: changing precedence changes results.

use regex::Regex;
use std::sync::OnceLock;

use super::loader::{CellValue, MatchRecord};

/// Home-goal column synonyms, in precedence order
const HOME_GOAL_KEYS: [&str; 6] = ["FTHG", "HomeGoals", "HG", "home_goals", "FHG", "HomeG"];

/// Away-goal column synonyms, in precedence order
const AWAY_GOAL_KEYS: [&str; 6] = ["FTAG", "AwayGoals", "AG", "away_goals", "FAG", "AwayG"];

/// Full-time score string columns, e.g. "2-1" or "2:1"
const SCORE_KEYS: [&str; 4] = ["FTScore", "Score", "FullTimeScore", "Result"];

/// Pre-aggregated total columns
const AGGREGATE_KEYS: [&str; 2] = ["Goals", "totalgoals"];

fn score_pattern() -> &'static Regex {
    static SCORE_RE: OnceLock<Regex> = OnceLock::new();
    SCORE_RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*[-:]\s*(\d+)\s*$").expect("score pattern is valid")
    })
}

/// Resolve the total goals of a match record.
///
/// Fallback chain, first success wins:
/// 1. Sum of the first-present home and away synonym columns, when both
///    coerce to numbers. Presence decides, not quality: a present but
///    non-numeric `FTHG` shadows a numeric `HomeGoals`.
/// 2. A score-string column matching `<digits>-<digits>` or
///    `<digits>:<digits>`, summed.
/// 3. A numeric aggregate column (`Goals` / `totalgoals`).
/// 4. `None` - the record is excluded from market evaluation.
pub fn resolve_total_goals(record: &MatchRecord) -> Option<f64> {
    let first_present = |keys: &[&str]| -> Option<Option<f64>> {
        keys.iter()
            .find(|k| record.field(k).is_some())
            .map(|k| record.numeric_field(k))
    };

    if let (Some(home), Some(away)) = (
        first_present(&HOME_GOAL_KEYS).flatten(),
        first_present(&AWAY_GOAL_KEYS).flatten(),
    ) {
        return Some(home + away);
    }

    for key in SCORE_KEYS {
        if let Some(CellValue::Text(value)) = record.field(key) {
            if let Some(caps) = score_pattern().captures(value) {
                let home: f64 = caps[1].parse().ok()?;
                let away: f64 = caps[2].parse().ok()?;
                return Some(home + away);
            }
        }
    }

    for key in AGGREGATE_KEYS {
        if let Some(total) = record.numeric_field(key) {
            return Some(total);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::RawRecord;

    fn record(pairs: &[(&str, &str)]) -> MatchRecord {
        let mut raw = RawRecord::new();
        for (key, value) in pairs {
            raw.insert(key.to_string(), CellValue::coerce(value));
        }
        MatchRecord::from_raw(raw)
    }

    #[test]
    fn test_home_away_sum() {
        let rec = record(&[("FTHG", "2"), ("FTAG", "1")]);
        assert_eq!(resolve_total_goals(&rec), Some(3.0));
    }

    #[test]
    fn test_synonym_precedence_is_first_present() {
        // FTHG comes before HomeGoals in the synonym list
        let rec = record(&[("HomeGoals", "5"), ("FTHG", "1"), ("FTAG", "1")]);
        assert_eq!(resolve_total_goals(&rec), Some(2.0));
    }

    #[test]
    fn test_present_but_invalid_key_shadows_later_synonyms() {
        // FTHG is present but non-numeric, so the numeric HomeGoals is never
        // consulted and resolution falls through to the score string
        let rec = record(&[
            ("FTHG", "abandoned"),
            ("HomeGoals", "2"),
            ("FTAG", "1"),
            ("Score", "2-1"),
        ]);
        assert_eq!(resolve_total_goals(&rec), Some(3.0));
    }

    #[test]
    fn test_score_string_dash() {
        let rec = record(&[("Score", "2-1")]);
        assert_eq!(resolve_total_goals(&rec), Some(3.0));
    }

    #[test]
    fn test_score_string_colon_with_whitespace() {
        let rec = record(&[("FTScore", " 2 : 1 ")]);
        assert_eq!(resolve_total_goals(&rec), Some(3.0));
    }

    #[test]
    fn test_score_string_invalid_falls_through() {
        let rec = record(&[("Score", "postponed"), ("Goals", "4")]);
        assert_eq!(resolve_total_goals(&rec), Some(4.0));
    }

    #[test]
    fn test_score_key_order() {
        // FTScore is checked before Result
        let rec = record(&[("Result", "0-0"), ("FTScore", "3-2")]);
        assert_eq!(resolve_total_goals(&rec), Some(5.0));
    }

    #[test]
    fn test_aggregate_fields() {
        let rec = record(&[("totalgoals", "6")]);
        assert_eq!(resolve_total_goals(&rec), Some(6.0));

        let rec = record(&[("Goals", "2"), ("totalgoals", "6")]);
        assert_eq!(resolve_total_goals(&rec), Some(2.0));
    }

    #[test]
    fn test_unresolvable() {
        let rec = record(&[("HomeTeam", "Celtic"), ("AwayTeam", "Rangers")]);
        assert_eq!(resolve_total_goals(&rec), None);

        let rec = record(&[("Goals", "unknown")]);
        assert_eq!(resolve_total_goals(&rec), None);
    }
}
