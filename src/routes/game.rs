//! `/api/game/*` routes — roll, hold, clock ticks and record persistence.
//!
//! Every mutating route answers with the re-rendered board followed by a
//! persist script, so localStorage is rewritten after each change.

use uuid::Uuid;

use crate::game::machine::Transition;
use crate::game::persist::{self, StoredRecords};
use crate::game::rules::GameRules;
use crate::game::{board, state};
use crate::routes::util::{error_fragment, get_param, get_parsed, parse_form_body};

fn board_with_persist() -> String {
    state::with_state(|m| {
        let mut html = board::render_board(m);
        html.push_str(&board::render_persist_script(m));
        html
    })
}

// ── GET /api/game/board ────────────────────────────────────────────

/// Handle GET /api/game/board
/// Returns the full board fragment.
pub fn handle_board_get(_query: &str) -> String {
    state::with_state(board::render_board)
}

// ── POST /api/game/roll ────────────────────────────────────────────

/// Handle POST /api/game/roll
/// Body: now={epoch ms} (optional; recorded as the start time of a new game)
pub fn handle_roll_post(body: &str) -> String {
    let params = parse_form_body(body);
    let now: Option<u64> = get_parsed(&params, "now");
    let transition = state::with_state_and_rng(|m, rng| m.roll(rng, now));
    tracing::debug!(?transition, "roll");
    board_with_persist()
}

// ── POST /api/game/hold ────────────────────────────────────────────

/// Handle POST /api/game/hold
/// Body: id={die uuid}
pub fn handle_hold_post(body: &str) -> String {
    let params = parse_form_body(body);
    let id = match get_param(&params, "id").map(|s| Uuid::parse_str(s.trim())) {
        Some(Ok(id)) => id,
        Some(Err(_)) => return error_fragment("Invalid die id"),
        None => return error_fragment("Missing die id"),
    };
    let transition = state::with_state_mut(|m| m.hold(id));
    tracing::debug!(?transition, "hold");
    board_with_persist()
}

// ── POST /api/game/tick ────────────────────────────────────────────

/// Handle POST /api/game/tick
/// Called by the board's ticker once per second while playing.
/// Ticks outside the playing state are ignored, and the board rendered
/// back no longer contains the ticker.
pub fn handle_tick_post(_body: &str) -> String {
    let transition = state::with_state_mut(|m| m.tick());
    if transition == Transition::Ignored {
        return state::with_state(board::render_board);
    }
    board_with_persist()
}

// ── GET /api/game/state ────────────────────────────────────────────

/// Handle GET /api/game/state
/// Returns the four records as one JSON object keyed by storage key.
pub fn handle_state_get(_query: &str) -> String {
    state::with_state(persist::export_state_json)
}

// ── POST /api/game/persist ─────────────────────────────────────────

/// Handle POST /api/game/persist
/// Returns a `<script>` writing all four records to localStorage.
pub fn handle_persist_post(_body: &str) -> String {
    state::with_state(board::render_persist_script)
}

// ── POST /api/game/restore ─────────────────────────────────────────

/// Handle POST /api/game/restore
/// Body: dice=..&cryptoState=..&gameSession=..&playerProgress=.. (each the
/// raw localStorage JSON; any may be missing). Called once on page load.
/// Never fails: unusable fields fall back to defaults.
pub fn handle_restore_post(body: &str) -> String {
    let params = parse_form_body(body);
    let field = |key: &str| get_param(&params, key).map(str::to_string);
    let records = StoredRecords {
        dice: field(persist::DICE_KEY),
        crypto_state: field(persist::CRYPTO_KEY),
        game_session: field(persist::SESSION_KEY),
        player_progress: field(persist::PROGRESS_KEY),
    };
    let machine = state::with_rng(|rng| {
        persist::restore_machine(&records, GameRules::default(), rng)
    });
    tracing::debug!(status = machine.status().as_str(), "records restored");
    state::replace_state(machine);
    state::with_state(board::render_board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::GameStatus;

    fn reset() {
        state::reset_state();
    }

    #[test]
    fn board_get_renders_idle_board() {
        reset();
        let html = handle_board_get("");
        assert!(html.contains("tenzies-board"));
        assert!(html.contains(r#"data-status="idle""#));
        assert!(!html.contains("<script>"));
        reset();
    }

    #[test]
    fn roll_starts_game_and_persists() {
        reset();
        let html = handle_roll_post("now=1700000000000");
        assert!(html.contains(r#"data-status="playing""#));
        assert!(html.contains("game-ticker"));
        assert!(html.contains("localStorage.setItem(\"gameSession\""));
        state::with_state(|m| {
            assert_eq!(m.session.start_time, Some(1_700_000_000_000));
            assert_eq!(m.session.roll_count, 1);
        });
        reset();
    }

    #[test]
    fn hold_requires_valid_id() {
        reset();
        assert!(handle_hold_post("").contains("Missing die id"));
        assert!(handle_hold_post("id=not-a-uuid").contains("Invalid die id"));
        reset();
    }

    #[test]
    fn hold_toggles_die() {
        reset();
        handle_roll_post("");
        let id = state::with_state(|m| m.dice[4].id);
        let html = handle_hold_post(&format!("id={}", id));
        assert!(html.contains(r#"aria-pressed="true""#));
        state::with_state(|m| assert!(m.dice[4].is_held));
        reset();
    }

    #[test]
    fn tick_while_idle_does_not_persist() {
        reset();
        let html = handle_tick_post("");
        assert!(!html.contains("<script>"));
        state::with_state(|m| assert_eq!(m.session.timer, 180));
        reset();
    }

    #[test]
    fn tick_while_playing_counts_down() {
        reset();
        handle_roll_post("");
        let html = handle_tick_post("");
        assert!(html.contains("2:59"));
        assert!(html.contains("<script>"));
        reset();
    }

    #[test]
    fn state_get_is_json() {
        reset();
        let json = handle_state_get("");
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["dice"].as_array().unwrap().len(), 10);
        assert_eq!(v["cryptoState"]["tokenSymbol"], "TENZ");
        reset();
    }

    #[test]
    fn persist_post_returns_script() {
        reset();
        let html = handle_persist_post("");
        assert!(html.contains("localStorage.setItem(\"playerProgress\""));
        reset();
    }

    #[test]
    fn restore_applies_records() {
        reset();
        let progress = r#"{"totalGames":5,"totalWins":2,"bestTime":41,"currentStreak":1,"totalPoints":77}"#;
        let session = r#"{"timer":100,"rollCount":3,"maxRolls":15,"startTime":null,"status":"playing"}"#;
        let body = format!(
            "playerProgress={}&gameSession={}",
            encode(progress),
            encode(session)
        );
        let html = handle_restore_post(&body);
        assert!(html.contains("1:40"));
        assert!(html.contains("game-ticker"));
        state::with_state(|m| {
            assert_eq!(m.status(), GameStatus::Playing);
            assert_eq!(m.progress.total_points, 77);
            assert_eq!(m.progress.best_time, Some(41));
            assert_eq!(m.dice.len(), 10);
        });
        reset();
    }

    #[test]
    fn restore_with_garbage_falls_back() {
        reset();
        let html = handle_restore_post("dice=%5B1%2C2&gameSession=nope");
        assert!(html.contains(r#"data-status="idle""#));
        state::with_state(|m| assert_eq!(m.dice.len(), 10));
        reset();
    }

    fn encode(s: &str) -> String {
        s.bytes()
            .map(|b| match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => (b as char).to_string(),
                _ => format!("%{:02X}", b),
            })
            .collect()
    }
}
