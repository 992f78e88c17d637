//! Render-pass output: everything the dashboard front end draws, as JSON.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::data::GameHistory;
use crate::error::Result;
use crate::faction::{Faction, MatchMode};
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::occupancy::{compute_daily_occupancy, DailyCount};
use crate::overview::{compute_overview, OverviewStats};
use crate::trend::{compute_winrate_trend, round2, TrendPoint};
use crate::window::window_cutoff;

pub const DASHBOARD_TITLE: &str = "Flight Rising IMH Game Statistics";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Raw window key ("2w", "1mo", ...). Unknown keys mean a zero offset.
    pub time_range: String,
    pub today: NaiveDate,
    pub match_mode: MatchMode,
    /// sha256 of the source table, when the caller has it.
    pub source_sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub delta: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarHeatmap {
    pub name: String,
    pub colorscale: String,
    pub month_lines: bool,
    pub days: Vec<DailyCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub color: Option<String>,
    pub opacity: f64,
    pub hovertemplate: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<f64>>,
    /// Per-point hover labels; only the game-label series carries them.
    pub text: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendChart {
    pub yaxis_title: String,
    pub hovermode: String,
    pub series: Vec<ChartSeries>,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub title: String,
    pub generated_at: String,
    pub time_range: String,
    pub match_mode: MatchMode,
    pub source_sha256: Option<String>,
    pub overview: OverviewStats,
    pub metrics: Vec<MetricCard>,
    pub calendar: CalendarHeatmap,
    pub trend: TrendChart,
}

impl DashboardReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Whole numbers keep one decimal place (`50.0%`), as the dashboard shows them.
fn percent(x: f64) -> String {
    format!("{:?}%", round2(x))
}

/// The three headline cards as the dashboard labels them.
pub fn metric_cards(stats: &OverviewStats) -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "Games Played".to_string(),
            value: stats.total_games.to_string(),
            delta: stats.total_games_delta.to_string(),
        },
        MetricCard {
            label: "Town Win Rate".to_string(),
            value: percent(stats.town_win_rate),
            delta: percent(stats.town_win_rate_delta),
        },
        MetricCard {
            label: "Mafia Win Rate".to_string(),
            value: percent(stats.mafia_win_rate),
            delta: percent(stats.mafia_win_rate_delta),
        },
    ]
}

fn faction_color(faction: Faction) -> &'static str {
    match faction {
        Faction::Town => "#4dd668",
        Faction::Mafia => "#ff5b38",
        Faction::ThirdParty => "#a4a3a2",
    }
}

/// Series in draw order: an invisible game-label line pinned at zero that
/// carries the game names for hover, then 3P, Town and Mafia.
pub fn trend_chart(points: Vec<TrendPoint>) -> TrendChart {
    let x: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
    let mut series = vec![ChartSeries {
        name: "Game".to_string(),
        color: None,
        opacity: 0.0,
        hovertemplate: "%{text}".to_string(),
        x: x.clone(),
        y: vec![Some(0.0); points.len()],
        text: Some(points.iter().map(|p| p.game_name.clone()).collect()),
    }];
    for faction in [Faction::ThirdParty, Faction::Town, Faction::Mafia] {
        series.push(ChartSeries {
            name: faction.label().to_string(),
            color: Some(faction_color(faction).to_string()),
            opacity: 1.0,
            hovertemplate: "%{y}%".to_string(),
            x: x.clone(),
            y: points.iter().map(|p| p.winrate(faction)).collect(),
            text: None,
        });
    }
    TrendChart {
        yaxis_title: "Winrate (%)".to_string(),
        hovermode: "x unified".to_string(),
        series,
        points,
    }
}

/// Run all three engines over `history` and bundle the results. Any engine
/// failure fails the whole pass.
pub fn build_report(history: &GameHistory, opts: &ReportOptions) -> Result<DashboardReport> {
    let cutoff = window_cutoff(&opts.time_range, opts.today);
    let overview = compute_overview(history, cutoff, opts.match_mode)?;
    let days = compute_daily_occupancy(history)?;
    let points = compute_winrate_trend(history, opts.match_mode)?;

    log(
        Level::Info,
        Domain::Report,
        "report_built",
        obj(&[
            ("time_range", v_str(&opts.time_range)),
            ("window_cutoff", v_str(&cutoff.to_string())),
            ("calendar_days", json!(days.len())),
            ("trend_points", json!(points.len())),
        ]),
    );

    Ok(DashboardReport {
        title: DASHBOARD_TITLE.to_string(),
        generated_at: crate::logging::ts_now(),
        time_range: opts.time_range.clone(),
        match_mode: opts.match_mode,
        source_sha256: opts.source_sha256.clone(),
        metrics: metric_cards(&overview),
        overview,
        calendar: CalendarHeatmap {
            name: "Ongoing Games".to_string(),
            colorscale: "greens".to_string(),
            month_lines: false,
            days,
        },
        trend: trend_chart(points),
    })
}
