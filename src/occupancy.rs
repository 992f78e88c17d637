//! Ongoing-games-per-day series for the calendar heatmap.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::data::GameHistory;
use crate::error::{Result, StatsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// One entry per calendar day from the earliest start to the latest end,
/// counting the games whose inclusive `[start, end]` covers that day. Days
/// with no games are present with a zero count.
pub fn compute_daily_occupancy(history: &GameHistory) -> Result<Vec<DailyCount>> {
    let (first, last) = history.date_span().ok_or_else(|| {
        StatsError::InsufficientData("no games in history, calendar span is undefined".to_string())
    })?;
    let span = (last - first).num_days() as usize + 1;

    // +1 at each start day, -1 the day after each end day.
    let mut deltas = vec![0i64; span + 1];
    for record in history {
        if record.end_date < record.start_date {
            return Err(StatsError::data_format(
                None,
                "End Date",
                format!("`{}` ends before it starts", record.game_name),
            ));
        }
        let start = (record.start_date - first).num_days() as usize;
        let end = (record.end_date - first).num_days() as usize;
        deltas[start] += 1;
        deltas[end + 1] -= 1;
    }

    let mut running = 0i64;
    let series = deltas[..span]
        .iter()
        .enumerate()
        .map(|(offset, delta)| {
            running += delta;
            DailyCount {
                date: first + Duration::days(offset as i64),
                count: running as u32,
            }
        })
        .collect();
    Ok(series)
}
