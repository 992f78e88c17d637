//! Trailing windows for the headline-metric deltas.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "2w")]
    TwoWeeks,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        TimeRange::TwoWeeks,
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::TwoYears,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TimeRange::TwoWeeks => "2w",
            TimeRange::OneMonth => "1mo",
            TimeRange::ThreeMonths => "3mo",
            TimeRange::SixMonths => "6mo",
            TimeRange::OneYear => "1y",
            TimeRange::TwoYears => "2y",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.key() == key.trim())
    }

    pub fn days(&self) -> i64 {
        match self {
            TimeRange::TwoWeeks => 14,
            TimeRange::OneMonth => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::SixMonths => 180,
            TimeRange::OneYear => 365,
            TimeRange::TwoYears => 730,
        }
    }

    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.days())
    }
}

/// Cutoff for a raw selection key. Unknown keys fall back to a zero offset,
/// so the cutoff is `today` itself.
pub fn window_cutoff(selection: &str, today: NaiveDate) -> NaiveDate {
    match TimeRange::from_key(selection) {
        Some(range) => range.cutoff(today),
        None => today,
    }
}
