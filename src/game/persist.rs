//! Persistence of the four game records.
//!
//! ## Storage layout
//!
//! ```text
//! localStorage
//! ├── "dice"           [{ "id": uuid, "value": 1-6, "isHeld": bool }, ... x10]
//! ├── "cryptoState"    { "airdropPoints", "airdropThreshold", "tokenSymbol", "achievements" }
//! ├── "gameSession"    { "timer", "rollCount", "maxRolls", "startTime", "status" }
//! └── "playerProgress" { "totalGames", "totalWins", "bestTime", "currentStreak", "totalPoints" }
//! ```
//!
//! Records are written whole after every change and read once on page load.
//! Reading never fails: each field that is missing or malformed falls back
//! to its default, and a record that is not a JSON object falls back
//! entirely. The dice record is all-or-nothing since a partial board
//! cannot be played.
//!
//! The save file is the same four records wrapped in a versioned JSON
//! bundle and encoded as URL-safe base64.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::game::dice::{self, Die};
use crate::game::machine::GameMachine;
use crate::game::progress::{CryptoState, PlayerProgress};
use crate::game::rules::GameRules;
use crate::game::session::{GameSession, GameStatus};

pub const DICE_KEY: &str = "dice";
pub const CRYPTO_KEY: &str = "cryptoState";
pub const SESSION_KEY: &str = "gameSession";
pub const PROGRESS_KEY: &str = "playerProgress";

/// Storage keys in write order.
pub const RECORD_KEYS: [&str; 4] = [DICE_KEY, CRYPTO_KEY, SESSION_KEY, PROGRESS_KEY];

/// Current save file format.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("invalid save data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("save data is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),
    #[error("save data is empty")]
    Empty,
}

/// Raw record strings as read from storage. `None` or empty means absent.
#[derive(Debug, Clone, Default)]
pub struct StoredRecords {
    pub dice: Option<String>,
    pub crypto_state: Option<String>,
    pub game_session: Option<String>,
    pub player_progress: Option<String>,
}

/// Versioned export wrapper around the four records.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveBundle {
    version: u32,
    #[serde(default)]
    dice: Value,
    #[serde(default)]
    crypto_state: Value,
    #[serde(default)]
    game_session: Value,
    #[serde(default)]
    player_progress: Value,
}

// ── Writing ────────────────────────────────────────────────────────

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Each record serialized for its storage key, in [`RECORD_KEYS`] order.
pub fn export_records(machine: &GameMachine) -> [(&'static str, String); 4] {
    [
        (DICE_KEY, to_json(&machine.dice)),
        (CRYPTO_KEY, to_json(&machine.crypto)),
        (SESSION_KEY, to_json(&machine.session)),
        (PROGRESS_KEY, to_json(&machine.progress)),
    ]
}

/// All four records as one JSON object keyed by storage key.
pub fn export_state_json(machine: &GameMachine) -> String {
    let state = serde_json::json!({
        DICE_KEY: machine.dice,
        CRYPTO_KEY: machine.crypto,
        SESSION_KEY: machine.session,
        PROGRESS_KEY: machine.progress,
    });
    state.to_string()
}

/// Encode the save file: versioned bundle, URL-safe base64.
pub fn encode_save(machine: &GameMachine) -> Result<String, PersistError> {
    let bundle = SaveBundle {
        version: SAVE_VERSION,
        dice: serde_json::to_value(&machine.dice)?,
        crypto_state: serde_json::to_value(&machine.crypto)?,
        game_session: serde_json::to_value(&machine.session)?,
        player_progress: serde_json::to_value(&machine.progress)?,
    };
    let json = serde_json::to_vec(&bundle)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

// ── Reading ────────────────────────────────────────────────────────

/// Rebuild a machine from stored record strings. Never fails.
pub fn restore_machine<R: Rng + ?Sized>(
    records: &StoredRecords,
    rules: GameRules,
    rng: &mut R,
) -> GameMachine {
    let parse = |key: &str, raw: &Option<String>| -> Option<Value> {
        let raw = raw.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored record is not JSON, using defaults");
                None
            }
        }
    };
    from_values(
        parse(DICE_KEY, &records.dice).as_ref(),
        parse(CRYPTO_KEY, &records.crypto_state).as_ref(),
        parse(SESSION_KEY, &records.game_session).as_ref(),
        parse(PROGRESS_KEY, &records.player_progress).as_ref(),
        rules,
        rng,
    )
}

/// Decode a save file and rebuild the machine from it.
pub fn decode_save<R: Rng + ?Sized>(
    encoded: &str,
    rules: GameRules,
    rng: &mut R,
) -> Result<GameMachine, PersistError> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(PersistError::Empty);
    }
    let bytes = URL_SAFE_NO_PAD.decode(encoded)?;
    let json = String::from_utf8(bytes)?;
    let bundle: SaveBundle = serde_json::from_str(&json)?;
    if bundle.version != SAVE_VERSION {
        return Err(PersistError::UnsupportedVersion(bundle.version));
    }
    Ok(from_values(
        Some(&bundle.dice),
        Some(&bundle.crypto_state),
        Some(&bundle.game_session),
        Some(&bundle.player_progress),
        rules,
        rng,
    ))
}

fn from_values<R: Rng + ?Sized>(
    dice: Option<&Value>,
    crypto: Option<&Value>,
    session: Option<&Value>,
    progress: Option<&Value>,
    rules: GameRules,
    rng: &mut R,
) -> GameMachine {
    GameMachine::from_parts(
        rules,
        read_dice(dice, &rules, rng),
        read_crypto(crypto),
        read_session(session, &rules),
        read_progress(progress),
    )
}

fn read_dice<R: Rng + ?Sized>(value: Option<&Value>, rules: &GameRules, rng: &mut R) -> Vec<Die> {
    let parsed = value.and_then(|v| serde_json::from_value::<Vec<Die>>(v.clone()).ok());
    match parsed {
        Some(board) if board.len() == rules.dice_count && board.iter().all(dice::is_valid_die) => board,
        _ => {
            if value.is_some() {
                tracing::warn!("stored dice unusable, dealing a fresh board");
            }
            dice::generate_all_new_dice(rng, rules.dice_count)
        }
    }
}

fn read_crypto(value: Option<&Value>) -> CryptoState {
    let defaults = CryptoState::default();
    let Some(obj) = as_object(CRYPTO_KEY, value) else {
        return defaults;
    };
    CryptoState {
        airdrop_points: u32_field(obj, "airdropPoints").unwrap_or(defaults.airdrop_points),
        airdrop_threshold: u32_field(obj, "airdropThreshold")
            .unwrap_or(defaults.airdrop_threshold),
        token_symbol: obj
            .get("tokenSymbol")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.token_symbol),
        achievements: obj
            .get("achievements")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|a| a.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or(defaults.achievements),
    }
}

fn read_session(value: Option<&Value>, rules: &GameRules) -> GameSession {
    let defaults = GameSession::new(rules);
    let Some(obj) = as_object(SESSION_KEY, value) else {
        return defaults;
    };
    GameSession {
        timer: u32_field(obj, "timer").unwrap_or(defaults.timer),
        roll_count: u32_field(obj, "rollCount").unwrap_or(defaults.roll_count),
        max_rolls: u32_field(obj, "maxRolls").unwrap_or(defaults.max_rolls),
        start_time: obj.get("startTime").and_then(Value::as_u64),
        status: obj
            .get("status")
            .and_then(Value::as_str)
            .and_then(GameStatus::parse)
            .unwrap_or(defaults.status),
    }
}

fn read_progress(value: Option<&Value>) -> PlayerProgress {
    let defaults = PlayerProgress::default();
    let Some(obj) = as_object(PROGRESS_KEY, value) else {
        return defaults;
    };
    PlayerProgress {
        total_games: u32_field(obj, "totalGames").unwrap_or(defaults.total_games),
        total_wins: u32_field(obj, "totalWins").unwrap_or(defaults.total_wins),
        best_time: u32_field(obj, "bestTime"),
        current_streak: u32_field(obj, "currentStreak").unwrap_or(defaults.current_streak),
        total_points: u32_field(obj, "totalPoints").unwrap_or(defaults.total_points),
    }
}

fn as_object<'a>(key: &str, value: Option<&'a Value>) -> Option<&'a Map<String, Value>> {
    let value = value?;
    let obj = value.as_object();
    if obj.is_none() {
        tracing::warn!(key, "stored record is not an object, using defaults");
    }
    obj
}

/// Read a non-negative integer field. Accepts integers, non-negative
/// floats (floored) and numeric strings.
fn u32_field(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    let n = match obj.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    Some(n.min(u64::from(u32::MAX)) as u32)
}
