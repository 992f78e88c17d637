use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::data::DEFAULT_GAMES_CSV;
use crate::faction::MatchMode;
use crate::report::ReportOptions;
use crate::window::TimeRange;

/// Render-pass settings. Every default reproduces the plain dashboard: the
/// games table in the working directory, a one-year window, independent
/// faction matching, today's local date and the report on stdout.
#[derive(Debug, Clone)]
pub struct Config {
    pub games_csv: PathBuf,
    /// Kept raw: an unknown key is legal and means a zero offset.
    pub time_range: String,
    pub match_mode: MatchMode,
    pub today: NaiveDate,
    pub report_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            games_csv: get("GAMES_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GAMES_CSV)),
            time_range: get("TIME_RANGE").unwrap_or_else(|| TimeRange::default().key().to_string()),
            match_mode: get("MATCH_MODE").and_then(|v| MatchMode::parse(&v)).unwrap_or_default(),
            today: get("TODAY")
                .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
                .unwrap_or_else(|| Local::now().date_naive()),
            report_path: get("REPORT_PATH").filter(|v| !v.trim().is_empty()).map(PathBuf::from),
        }
    }

    pub fn report_options(&self, source_sha256: Option<String>) -> ReportOptions {
        ReportOptions {
            time_range: self.time_range.clone(),
            today: self.today,
            match_mode: self.match_mode,
            source_sha256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_plain_dashboard() {
        let cfg = Config::from_lookup(lookup(&[]));
        assert_eq!(cfg.games_csv, PathBuf::from("Finished Games.csv"));
        assert_eq!(cfg.time_range, "1y");
        assert_eq!(cfg.match_mode, MatchMode::Independent);
        assert!(cfg.report_path.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = Config::from_lookup(lookup(&[
            ("GAMES_CSV", "data/games.csv"),
            ("TIME_RANGE", "3mo"),
            ("MATCH_MODE", "first_match"),
            ("TODAY", "2025-01-01"),
            ("REPORT_PATH", "out/report.json"),
        ]));
        assert_eq!(cfg.games_csv, PathBuf::from("data/games.csv"));
        assert_eq!(cfg.time_range, "3mo");
        assert_eq!(cfg.match_mode, MatchMode::FirstMatch);
        assert_eq!(cfg.today, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(cfg.report_path, Some(PathBuf::from("out/report.json")));
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = Config::from_lookup(lookup(&[
            ("MATCH_MODE", "both"),
            ("TODAY", "tomorrow"),
            ("REPORT_PATH", " "),
        ]));
        assert_eq!(cfg.match_mode, MatchMode::Independent);
        assert!((Local::now().date_naive() - cfg.today).num_days().abs() <= 1);
        assert!(cfg.report_path.is_none());
    }
}
