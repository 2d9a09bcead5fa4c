//! Reward and statistics records, and how a finished game updates them.

use serde::{Deserialize, Serialize};

use crate::game::rules::{AIRDROP_THRESHOLD, TOKEN_SYMBOL};

/// Airdrop reward state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoState {
    pub airdrop_points: u32,
    pub airdrop_threshold: u32,
    pub token_symbol: String,
    /// Carried through storage untouched; nothing awards achievements yet.
    pub achievements: Vec<String>,
}

impl Default for CryptoState {
    fn default() -> Self {
        Self {
            airdrop_points: 0,
            airdrop_threshold: AIRDROP_THRESHOLD,
            token_symbol: TOKEN_SYMBOL.to_string(),
            achievements: Vec::new(),
        }
    }
}

impl CryptoState {
    pub fn airdrop_eligible(&self) -> bool {
        self.airdrop_points >= self.airdrop_threshold
    }

    /// Progress toward the threshold as a percentage, capped at 100.
    pub fn airdrop_progress(&self) -> u32 {
        if self.airdrop_threshold == 0 {
            return 100;
        }
        let pct = u64::from(self.airdrop_points) * 100 / u64::from(self.airdrop_threshold);
        pct.min(100) as u32
    }

    pub fn award(&mut self, points: u32) {
        self.airdrop_points = self.airdrop_points.saturating_add(points);
    }
}

/// Lifetime statistics across games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    pub total_games: u32,
    pub total_wins: u32,
    /// Fastest win in seconds.
    pub best_time: Option<u32>,
    pub current_streak: u32,
    pub total_points: u32,
}

impl PlayerProgress {
    pub fn record_win(&mut self, time_used: u32, points: u32) {
        self.total_games += 1;
        self.total_wins += 1;
        self.best_time = Some(match self.best_time {
            Some(best) => best.min(time_used),
            None => time_used,
        });
        self.current_streak += 1;
        self.total_points = self.total_points.saturating_add(points);
    }

    pub fn record_loss(&mut self) {
        self.total_games += 1;
        self.current_streak = 0;
    }
}
