//! Factions and the free-text matching rules used to recognise them.
//!
//! Both `Winning Faction` and `Alignments Present` are free text, so a record
//! can plausibly name several factions as winners (or none). Two readings are
//! supported and callers pick one with [`MatchMode`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Town,
    Mafia,
    #[serde(rename = "3P")]
    ThirdParty,
}

impl Faction {
    /// Fixed precedence used by [`MatchMode::FirstMatch`].
    pub const ALL: [Faction; 3] = [Faction::Town, Faction::Mafia, Faction::ThirdParty];

    pub fn label(&self) -> &'static str {
        match self {
            Faction::Town => "Town",
            Faction::Mafia => "Mafia",
            Faction::ThirdParty => "3P",
        }
    }

    fn index(&self) -> usize {
        match self {
            Faction::Town => 0,
            Faction::Mafia => 1,
            Faction::ThirdParty => 2,
        }
    }

    /// Case-sensitive substring test against `Alignments Present`.
    pub fn is_present_in(&self, alignments: &str) -> bool {
        alignments.contains(self.label())
    }

    /// Case-sensitive substring test, as the headline metrics count wins.
    pub fn is_named_in(&self, winning_faction: &str) -> bool {
        winning_faction.contains(self.label())
    }

    /// Case-insensitive substring test, as the rolling trend counts wins.
    pub fn is_named_in_ignore_case(&self, winning_faction: &str) -> bool {
        winning_faction
            .to_lowercase()
            .contains(&self.label().to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every faction whose name appears is credited; a record naming both
    /// Town and Mafia counts for both.
    #[default]
    Independent,
    /// Only the first faction in [`Faction::ALL`] order that appears is
    /// credited.
    FirstMatch,
}

impl MatchMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "independent" => Some(MatchMode::Independent),
            "first_match" | "first-match" | "first" => Some(MatchMode::FirstMatch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Independent => "independent",
            MatchMode::FirstMatch => "first_match",
        }
    }

    /// Factions credited with a win among `candidates`, given a predicate
    /// that decides whether the winner text names a faction.
    pub fn winners<F>(&self, candidates: &[Faction], names: F) -> Vec<Faction>
    where
        F: Fn(Faction) -> bool,
    {
        let mut matched = candidates.iter().copied().filter(|f| names(*f));
        match self {
            MatchMode::Independent => matched.collect(),
            MatchMode::FirstMatch => matched.next().into_iter().collect(),
        }
    }
}

/// Per-faction counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactionTally([u32; 3]);

impl FactionTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, faction: Faction) {
        self.0[faction.index()] += 1;
    }

    pub fn get(&self, faction: Faction) -> u32 {
        self.0[faction.index()]
    }
}
