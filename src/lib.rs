//! Crypto Tenzies in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the Service Worker
//! bridge to call. Uses `matchit` for URL routing — the same router
//! engine that powers Axum.
//!
//! The game lives in worker memory (see [`game::state`]); every response is
//! an HTML fragment for HTMX to swap, or a `<script>` that writes the
//! records back to localStorage.

use wasm_bindgen::prelude::*;

pub mod game;
pub mod routes;

/// Process an HTTP-like request and return an HTML fragment.
///
/// Called from JavaScript (Web Worker) via wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method (e.g., "GET", "POST")
/// * `path`   — URL path (e.g., "/api/game/roll")
/// * `query`  — Query string, possibly empty
/// * `body`   — Request body (form data). Empty string for GET requests.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    let mut router = matchit::Router::new();

    router.insert("/api/game/board", "game_board").ok();
    router.insert("/api/game/roll", "game_roll").ok();
    router.insert("/api/game/hold", "game_hold").ok();
    router.insert("/api/game/tick", "game_tick").ok();
    router.insert("/api/game/state", "game_state").ok();
    router.insert("/api/game/persist", "game_persist").ok();
    router.insert("/api/game/restore", "game_restore").ok();

    router.insert("/api/player/stats", "player_stats").ok();
    router.insert("/api/player/export", "player_export").ok();
    router.insert("/api/player/import", "player_import").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("game_board", "GET") => routes::game::handle_board_get(query),
            ("game_state", "GET") => routes::game::handle_state_get(query),
            ("game_roll", "POST") => routes::game::handle_roll_post(body),
            ("game_hold", "POST") => routes::game::handle_hold_post(body),
            ("game_tick", "POST") => routes::game::handle_tick_post(body),
            ("game_persist", "POST") => routes::game::handle_persist_post(body),
            ("game_restore", "POST") => routes::game::handle_restore_post(body),

            ("player_stats", "GET") => routes::player::handle_stats_get(query),
            ("player_export", "GET") => routes::player::handle_export_get(query),
            ("player_import", "POST") => routes::player::handle_import_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"<span class="text-red-400">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-400">405 — method not allowed</span>"#.to_string()
}
