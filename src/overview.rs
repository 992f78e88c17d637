//! Headline metrics: games played and Town/Mafia win rates, each with a delta
//! against the games that had already finished before the window cutoff.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::{GameHistory, GameRecord};
use crate::error::{Result, StatsError};
use crate::faction::{Faction, MatchMode};
use crate::logging::log_overview;

/// Factions the headline metrics report on.
const HEADLINE_FACTIONS: [Faction; 2] = [Faction::Town, Faction::Mafia];

/// Win counts over one set of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinBreakdown {
    pub total: usize,
    pub town_wins: usize,
    pub mafia_wins: usize,
    /// Games whose winner text names neither Town nor Mafia.
    pub other_wins: usize,
    /// Games whose winner text names both. Under `Independent` these are
    /// counted twice, so `town + mafia + other == total + overlapping`.
    pub overlapping: usize,
}

impl WinBreakdown {
    pub fn tally<'a, I>(records: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let mut b = WinBreakdown::default();
        for record in records {
            b.total += 1;
            let text = record.winning_faction.as_str();
            if HEADLINE_FACTIONS.iter().all(|f| f.is_named_in(text)) {
                b.overlapping += 1;
            }
            let winners = mode.winners(&HEADLINE_FACTIONS, |f| f.is_named_in(text));
            if winners.is_empty() {
                b.other_wins += 1;
            }
            for faction in winners {
                match faction {
                    Faction::Town => b.town_wins += 1,
                    Faction::Mafia => b.mafia_wins += 1,
                    Faction::ThirdParty => {}
                }
            }
        }
        b
    }

    /// `(town, mafia)` rates in percent; `None` when there are no games.
    pub fn rates(&self) -> Option<(f64, f64)> {
        if self.total == 0 {
            return None;
        }
        let total = self.total as f64;
        Some((
            self.town_wins as f64 * 100.0 / total,
            self.mafia_wins as f64 * 100.0 / total,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub window_cutoff: NaiveDate,
    pub total_games: usize,
    pub total_games_delta: i64,
    pub town_win_rate: f64,
    pub town_win_rate_delta: f64,
    pub mafia_win_rate: f64,
    pub mafia_win_rate_delta: f64,
    /// True when no game finished before the cutoff; baseline rates were then
    /// taken as 0%.
    pub baseline_empty: bool,
    pub current: WinBreakdown,
    pub baseline: WinBreakdown,
}

/// Compare the whole history against the games that ended before
/// `window_cutoff`.
///
/// An empty history is an error. An empty baseline is not: its rates count as
/// 0%, so each rate delta equals the current rate.
pub fn compute_overview(
    history: &GameHistory,
    window_cutoff: NaiveDate,
    mode: MatchMode,
) -> Result<OverviewStats> {
    let current = WinBreakdown::tally(history, mode);
    let (town_win_rate, mafia_win_rate) = current.rates().ok_or_else(|| {
        StatsError::InsufficientData("no games in history, win rates are undefined".to_string())
    })?;

    let baseline = WinBreakdown::tally(
        history.iter().filter(|r| r.end_date < window_cutoff),
        mode,
    );
    let baseline_empty = baseline.total == 0;
    let (base_town, base_mafia) = baseline.rates().unwrap_or((0.0, 0.0));

    log_overview(current.total, baseline.total, town_win_rate, mafia_win_rate);

    Ok(OverviewStats {
        window_cutoff,
        total_games: current.total,
        total_games_delta: current.total as i64 - baseline.total as i64,
        town_win_rate,
        town_win_rate_delta: town_win_rate - base_town,
        mafia_win_rate,
        mafia_win_rate_delta: mafia_win_rate - base_mafia,
        baseline_empty,
        current,
        baseline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn game(end: NaiveDate, winner: &str) -> GameRecord {
        GameRecord {
            game_name: format!("{} {}", winner, end),
            start_date: end,
            end_date: end,
            winning_faction: winner.to_string(),
            alignments_present: "Town, Mafia".to_string(),
        }
    }

    fn sample() -> GameHistory {
        GameHistory::new(vec![
            game(ymd(2023, 6, 1), "Town"),
            game(ymd(2023, 9, 1), "Mafia"),
            game(ymd(2024, 3, 1), "Town"),
            game(ymd(2024, 8, 1), "Town"),
            game(ymd(2024, 11, 1), "3P (Serial Killer)"),
        ])
    }

    #[test]
    fn current_figures_use_whole_history() {
        let stats = compute_overview(&sample(), ymd(2024, 1, 1), MatchMode::Independent).unwrap();
        assert_eq!(stats.total_games, 5);
        assert_eq!(stats.total_games_delta, 3);
        assert!((stats.town_win_rate - 60.0).abs() < 1e-9);
        assert!((stats.mafia_win_rate - 20.0).abs() < 1e-9);
        // baseline: Town, Mafia -> 50% each
        assert!((stats.town_win_rate_delta - 10.0).abs() < 1e-9);
        assert!((stats.mafia_win_rate_delta + 30.0).abs() < 1e-9);
        assert!(!stats.baseline_empty);
    }

    #[test]
    fn baseline_is_strictly_before_cutoff() {
        let stats = compute_overview(&sample(), ymd(2023, 9, 1), MatchMode::Independent).unwrap();
        assert_eq!(stats.baseline.total, 1);
        assert_eq!(stats.baseline.town_wins, 1);
    }

    #[test]
    fn empty_baseline_counts_as_zero_percent() {
        let stats = compute_overview(&sample(), ymd(2020, 1, 1), MatchMode::Independent).unwrap();
        assert!(stats.baseline_empty);
        assert_eq!(stats.total_games_delta, 5);
        assert_eq!(stats.town_win_rate_delta, stats.town_win_rate);
        assert_eq!(stats.mafia_win_rate_delta, stats.mafia_win_rate);
    }

    #[test]
    fn empty_history_is_insufficient_data() {
        let err = compute_overview(&GameHistory::default(), ymd(2024, 1, 1), MatchMode::Independent)
            .unwrap_err();
        assert!(matches!(err, StatsError::InsufficientData(_)));
    }

    #[test]
    fn win_counts_are_case_sensitive() {
        let history = GameHistory::new(vec![game(ymd(2024, 1, 1), "town")]);
        let stats = compute_overview(&history, ymd(2024, 1, 1), MatchMode::Independent).unwrap();
        assert_eq!(stats.current.town_wins, 0);
        assert_eq!(stats.current.other_wins, 1);
    }

    #[test]
    fn totals_balance_when_winners_are_exclusive() {
        let b = WinBreakdown::tally(&sample(), MatchMode::Independent);
        assert_eq!(b.overlapping, 0);
        assert_eq!(b.total, b.town_wins + b.mafia_wins + b.other_wins);
    }

    #[test]
    fn overlapping_winner_text_double_counts_only_when_independent() {
        let history = GameHistory::new(vec![
            game(ymd(2024, 1, 1), "Town & Mafia (shared win)"),
            game(ymd(2024, 1, 2), "Mafia"),
        ]);

        let independent = WinBreakdown::tally(&history, MatchMode::Independent);
        assert_eq!(independent.town_wins, 1);
        assert_eq!(independent.mafia_wins, 2);
        assert_eq!(independent.overlapping, 1);
        assert_eq!(
            independent.town_wins + independent.mafia_wins + independent.other_wins,
            independent.total + independent.overlapping
        );

        let first = WinBreakdown::tally(&history, MatchMode::FirstMatch);
        assert_eq!(first.town_wins, 1);
        assert_eq!(first.mafia_wins, 1);
        assert_eq!(first.overlapping, 1);
        assert_eq!(first.town_wins + first.mafia_wins + first.other_wins, first.total);
    }
}
