//! Session record — status, clock and roll counter for the current game.

use serde::{Deserialize, Serialize};

use crate::game::rules::GameRules;

/// Lifecycle of one game. Moves idle → playing → won|lost, then back to
/// idle only through a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Idle,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Idle => "idle",
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(GameStatus::Idle),
            "playing" => Some(GameStatus::Playing),
            "won" => Some(GameStatus::Won),
            "lost" => Some(GameStatus::Lost),
            _ => None,
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

/// Timer and roll state for the game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Seconds left on the clock.
    pub timer: u32,
    pub roll_count: u32,
    pub max_rolls: u32,
    /// Epoch milliseconds when the game moved to playing.
    pub start_time: Option<u64>,
    pub status: GameStatus,
}

impl GameSession {
    /// A fresh idle session under `rules`.
    pub fn new(rules: &GameRules) -> Self {
        Self {
            timer: rules.round_seconds,
            roll_count: 0,
            max_rolls: rules.max_rolls,
            start_time: None,
            status: GameStatus::Idle,
        }
    }

    pub fn rolls_remaining(&self) -> u32 {
        self.max_rolls.saturating_sub(self.roll_count)
    }

    /// Seconds spent so far out of `round_seconds`.
    pub fn time_used(&self, round_seconds: u32) -> u32 {
        round_seconds.saturating_sub(self.timer)
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(&GameRules::default())
    }
}
