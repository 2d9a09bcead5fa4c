//! Global game state container.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The Web Worker keeps the WASM module alive, so the machine persists
//! across `handle_request` calls for the entire browser session.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::cell::RefCell;

use crate::game::machine::GameMachine;
use crate::game::rules::GameRules;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_entropy());
    static STATE: RefCell<GameMachine> =
        RefCell::new(GameMachine::new(GameRules::default(), &mut SmallRng::from_entropy()));
}

/// Execute a closure with read access to the machine.
pub fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&GameMachine) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the machine.
pub fn with_state_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut GameMachine) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

/// Execute a closure with mutable access to the machine and the RNG.
pub fn with_state_and_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut GameMachine, &mut SmallRng) -> R,
{
    RNG.with(|r| STATE.with(|s| f(&mut s.borrow_mut(), &mut r.borrow_mut())))
}

/// Execute a closure with the worker's RNG.
pub fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|r| f(&mut r.borrow_mut()))
}

/// Replace the whole machine (used by restore and import).
pub fn replace_state(machine: GameMachine) {
    STATE.with(|s| {
        *s.borrow_mut() = machine;
    });
}

/// Start over with a fresh machine and default records.
pub fn reset_state() {
    let machine = with_rng(|rng| GameMachine::new(GameRules::default(), rng));
    replace_state(machine);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::GameStatus;

    #[test]
    fn default_state_is_idle() {
        reset_state();
        with_state(|m| {
            assert_eq!(m.status(), GameStatus::Idle);
            assert_eq!(m.dice.len(), 10);
            assert_eq!(m.progress.total_games, 0);
        });
    }

    #[test]
    fn mutations_persist_between_calls() {
        reset_state();
        with_state_and_rng(|m, rng| {
            m.roll(rng, Some(5));
        });
        with_state(|m| {
            assert_eq!(m.status(), GameStatus::Playing);
            assert_eq!(m.session.roll_count, 1);
        });
        with_state_mut(|m| {
            m.tick();
        });
        with_state(|m| assert_eq!(m.session.timer, 179));
        reset_state();
    }

    #[test]
    fn replace_state_swaps_machine() {
        reset_state();
        let mut m = with_rng(|rng| GameMachine::new(GameRules::default(), rng));
        m.progress.total_wins = 9;
        replace_state(m);
        with_state(|m| assert_eq!(m.progress.total_wins, 9));
        reset_state();
    }
}
