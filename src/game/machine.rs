//! The game state machine.
//!
//! Owns the four records (dice, reward, session, progress) and is the only
//! place they change during play. Each operation returns a [`Transition`]
//! describing what happened so callers can log and render without
//! re-deriving it.
//!
//! ```text
//!   idle ──roll──▶ playing ──hold (board complete)──▶ won
//!                     │  ├──roll (rolls exhausted)──▶ lost
//!                     │  └──tick (clock at 0)───────▶ lost
//!   won|lost ──roll──▶ idle (fresh dice)
//! ```
//!
//! Settlement into the reward and progress records happens exactly once,
//! on the transition into won or lost.

use rand::Rng;
use uuid::Uuid;

use crate::game::dice::{self, Die};
use crate::game::progress::{CryptoState, PlayerProgress};
use crate::game::rules::{GameRules, calculate_points};
use crate::game::session::{GameSession, GameStatus};

/// Why a game was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossReason {
    OutOfRolls,
    OutOfTime,
}

/// Result of a single machine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Operation not allowed in the current state; nothing changed.
    Ignored,
    /// Finished game cleared; a fresh idle game is ready.
    Reset,
    /// First roll of a game: clock started and dice rolled.
    Started,
    Rolled { roll_count: u32 },
    Held { id: Uuid, held: bool },
    Ticked { timer: u32 },
    Won { points: u32, time_used: u32 },
    Lost(LossReason),
}

/// Single-player game: the live board plus everything persisted with it.
#[derive(Debug, Clone)]
pub struct GameMachine {
    pub dice: Vec<Die>,
    pub crypto: CryptoState,
    pub session: GameSession,
    pub progress: PlayerProgress,
    rules: GameRules,
}

impl GameMachine {
    /// Fresh machine with new dice and default records.
    pub fn new<R: Rng + ?Sized>(rules: GameRules, rng: &mut R) -> Self {
        Self {
            dice: dice::generate_all_new_dice(rng, rules.dice_count),
            crypto: CryptoState {
                airdrop_threshold: rules.airdrop_threshold,
                ..CryptoState::default()
            },
            session: GameSession::new(&rules),
            progress: PlayerProgress::default(),
            rules,
        }
    }

    /// Rebuild a machine from restored records. Rule-controlled fields in
    /// the records are overwritten with the live rules. A playing session
    /// that is already out of time or rolls is settled as lost here, since
    /// neither `tick` nor `roll` can move it any further.
    pub fn from_parts(
        rules: GameRules,
        dice: Vec<Die>,
        mut crypto: CryptoState,
        mut session: GameSession,
        progress: PlayerProgress,
    ) -> Self {
        crypto.airdrop_threshold = rules.airdrop_threshold;
        session.max_rolls = rules.max_rolls;
        session.roll_count = session.roll_count.min(rules.max_rolls);
        session.timer = session.timer.min(rules.round_seconds);
        let mut machine = Self {
            dice,
            crypto,
            session,
            progress,
            rules,
        };
        if machine.session.is_playing() {
            if machine.session.timer == 0 {
                tracing::warn!("restored session has no time left");
                machine.settle_loss(LossReason::OutOfTime);
            } else if machine.session.rolls_remaining() == 0 {
                tracing::warn!("restored session has no rolls left");
                machine.settle_loss(LossReason::OutOfRolls);
            }
        }
        machine
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    pub fn is_winning_board(&self) -> bool {
        dice::is_winning_board(&self.dice)
    }

    /// Seconds used so far in the current game.
    pub fn time_used(&self) -> u32 {
        self.session.time_used(self.rules.round_seconds)
    }

    /// Points the current board is worth (what a win right now would award).
    pub fn current_points(&self) -> u32 {
        calculate_points(self.time_used(), self.session.roll_count)
    }

    /// Roll button.
    ///
    /// - won/lost: reset to a fresh idle game.
    /// - idle: start the clock (recording `now_ms`), then roll.
    /// - playing: re-roll unheld dice and count the roll; the last allowed
    ///   roll without a win loses the game.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R, now_ms: Option<u64>) -> Transition {
        if self.session.status.is_finished() {
            self.reset(rng);
            tracing::debug!("finished game reset");
            return Transition::Reset;
        }
        if self.session.rolls_remaining() == 0 {
            return Transition::Ignored;
        }

        let started = self.session.status == GameStatus::Idle;
        if started {
            self.session.status = GameStatus::Playing;
            self.session.start_time = now_ms;
            tracing::debug!(start_time = ?now_ms, "game started");
        }

        dice::roll_unheld(&mut self.dice, rng);
        self.session.roll_count += 1;
        tracing::debug!(roll_count = self.session.roll_count, "dice rolled");

        if self.session.roll_count >= self.session.max_rolls {
            return self.settle_loss(LossReason::OutOfRolls);
        }
        if started {
            Transition::Started
        } else {
            Transition::Rolled {
                roll_count: self.session.roll_count,
            }
        }
    }

    /// Toggle a die's held flag. Only while playing; completing the board
    /// settles the win.
    pub fn hold(&mut self, id: Uuid) -> Transition {
        if !self.session.is_playing() {
            return Transition::Ignored;
        }
        let Some(held) = dice::toggle_hold(&mut self.dice, id) else {
            tracing::debug!(%id, "hold for unknown die ignored");
            return Transition::Ignored;
        };
        if self.is_winning_board() {
            return self.settle_win();
        }
        Transition::Held { id, held }
    }

    /// One second off the clock while playing. Hitting zero loses the game.
    pub fn tick(&mut self) -> Transition {
        if !self.session.is_playing() || self.session.timer == 0 {
            return Transition::Ignored;
        }
        self.session.timer -= 1;
        if self.session.timer == 0 {
            return self.settle_loss(LossReason::OutOfTime);
        }
        Transition::Ticked {
            timer: self.session.timer,
        }
    }

    fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.dice = dice::generate_all_new_dice(rng, self.rules.dice_count);
        self.session = GameSession::new(&self.rules);
    }

    fn settle_win(&mut self) -> Transition {
        let time_used = self.time_used();
        let points = calculate_points(time_used, self.session.roll_count);
        self.session.status = GameStatus::Won;
        self.crypto.award(points);
        self.progress.record_win(time_used, points);
        tracing::info!(
            points,
            time_used,
            rolls = self.session.roll_count,
            streak = self.progress.current_streak,
            "game won"
        );
        Transition::Won { points, time_used }
    }

    fn settle_loss(&mut self, reason: LossReason) -> Transition {
        self.session.status = GameStatus::Lost;
        self.progress.record_loss();
        tracing::info!(?reason, total_games = self.progress.total_games, "game lost");
        Transition::Lost(reason)
    }
}
