//! Rolling win rate per faction, one point per finished game.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::{GameHistory, GameRecord};
use crate::error::{Result, StatsError};
use crate::faction::{Faction, FactionTally, MatchMode};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub game_name: String,
    /// `None` until Town has appeared in at least one game.
    pub town_winrate: Option<f64>,
    pub mafia_winrate: Option<f64>,
    pub third_party_winrate: Option<f64>,
}

impl TrendPoint {
    pub fn winrate(&self, faction: Faction) -> Option<f64> {
        match faction {
            Faction::Town => self.town_winrate,
            Faction::Mafia => self.mafia_winrate,
            Faction::ThirdParty => self.third_party_winrate,
        }
    }
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Default)]
struct Tallies {
    games: FactionTally,
    wins: FactionTally,
}

impl Tallies {
    fn record(mut self, game: &GameRecord, mode: MatchMode) -> Self {
        for faction in Faction::ALL {
            if faction.is_present_in(&game.alignments_present) {
                self.games.increment(faction);
            }
        }
        let winners = mode.winners(&Faction::ALL, |f| {
            f.is_named_in_ignore_case(&game.winning_faction)
        });
        for faction in winners {
            self.wins.increment(faction);
        }
        self
    }

    fn rate(&self, faction: Faction, game: &GameRecord) -> Result<Option<f64>> {
        let games = self.games.get(faction);
        let wins = self.wins.get(faction);
        if wins > games {
            return Err(StatsError::InsufficientData(format!(
                "{} has {} wins in {} games by `{}`; \
                 a win was credited to a faction not listed as present",
                faction.label(),
                wins,
                games,
                game.game_name
            )));
        }
        if games == 0 {
            return Ok(None);
        }
        Ok(Some(round2(wins as f64 * 100.0 / games as f64)))
    }
}

/// Cumulative win rate after each game, in `end_date` order.
///
/// Games are stable-sorted by end date first, so same-day games keep their
/// source order. A faction's rate is `None` until it has appeared in some
/// game's alignments; a win credited to it before then fails on that game.
pub fn compute_winrate_trend(history: &GameHistory, mode: MatchMode) -> Result<Vec<TrendPoint>> {
    let mut ordered: Vec<&GameRecord> = history.iter().collect();
    ordered.sort_by_key(|r| r.end_date);

    let mut points = Vec::with_capacity(ordered.len());
    let mut tallies = Tallies::default();
    for game in ordered {
        tallies = tallies.record(game, mode);
        points.push(TrendPoint {
            date: game.end_date,
            game_name: game.game_name.clone(),
            town_winrate: tallies.rate(Faction::Town, game)?,
            mafia_winrate: tallies.rate(Faction::Mafia, game)?,
            third_party_winrate: tallies.rate(Faction::ThirdParty, game)?,
        });
    }
    Ok(points)
}
