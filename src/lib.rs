//! Summary statistics for a table of finished Town/Mafia/third-party games.
//!
//! A render pass loads the games table ([`data`]), runs three engines over it
//! ([`overview`], [`occupancy`], [`trend`]) and bundles their output for the
//! dashboard front end ([`report`]).

pub mod config;
pub mod data;
pub mod error;
pub mod faction;
pub mod logging;
pub mod occupancy;
pub mod overview;
pub mod report;
pub mod trend;
pub mod window;

pub use data::{load_history, parse_history, GameHistory, GameRecord};
pub use error::StatsError;
pub use faction::{Faction, MatchMode};
pub use occupancy::{compute_daily_occupancy, DailyCount};
pub use overview::{compute_overview, OverviewStats, WinBreakdown};
pub use report::{build_report, DashboardReport, ReportOptions};
pub use trend::{compute_winrate_trend, TrendPoint};
pub use window::{window_cutoff, TimeRange};
