//! Board rendering — the HTML fragment HTMX swaps into `#tenzies-board`.
//!
//! The clock is driven from here: while a game is playing the board carries
//! a ticker element that POSTs `/api/game/tick` every second. Any board
//! rendered outside the playing state leaves it out, so the polling stops
//! as soon as the game is won, lost or reset.

use crate::game::machine::GameMachine;
use crate::game::persist;
use crate::game::rules::{URGENT_ROLLS, URGENT_SECONDS, format_time};
use crate::game::session::GameStatus;
use crate::routes::util::escape_html;

/// Roll button text for the current state.
pub fn button_label(machine: &GameMachine) -> &'static str {
    match machine.status() {
        GameStatus::Won => "New Game",
        GameStatus::Lost => "Try Again",
        _ if machine.session.rolls_remaining() == 0 => "Game Over",
        _ => "Roll",
    }
}

/// The roll button is dead only when rolls ran out without the game ending.
pub fn roll_disabled(machine: &GameMachine) -> bool {
    machine.session.rolls_remaining() == 0 && !machine.status().is_finished()
}

/// Render the complete board.
pub fn render_board(machine: &GameMachine) -> String {
    let mut html = String::with_capacity(6144);
    let token = escape_html(&machine.crypto.token_symbol);

    html.push_str(&format!(
        r#"<div id="tenzies-board" data-status="{}" class="bg-white/5 backdrop-blur-lg rounded-2xl p-6 max-w-lg w-full border border-white/10 shadow-xl">"#,
        machine.status().as_str()
    ));

    if machine.session.is_playing() {
        html.push_str(
            r##"<div id="game-ticker" hx-post="/api/game/tick" hx-trigger="every 1s" hx-target="#tenzies-board" hx-swap="outerHTML"></div>"##,
        );
    }

    // Header
    html.push_str(&format!(
        r#"<h1 class="text-3xl font-extrabold text-center bg-gradient-to-r from-cyan-400 via-indigo-500 to-pink-500 bg-clip-text text-transparent">₿ Crypto Tenzies <span class="text-yellow-400">{}</span></h1>"#,
        token
    ));
    html.push_str(r#"<p class="text-center text-gray-300 mt-2">Earn tokens through skillful play!</p>"#);

    html.push_str(&render_session_stats(machine));

    match machine.status() {
        GameStatus::Won => html.push_str(&format!(
            r#"<p class="text-green-400 bg-green-900/20 p-3 mt-4 rounded-lg text-center">🎉 Victory! You earned {} {} tokens!</p>"#,
            machine.current_points(),
            token
        )),
        GameStatus::Lost => html.push_str(
            r#"<p class="text-red-400 bg-red-900/20 p-3 mt-4 rounded-lg text-center">💔 Game Over! Try again to earn tokens!</p>"#,
        ),
        _ => {}
    }

    html.push_str(
        r#"<p class="text-center text-gray-300 mt-4">Roll until all dice match. Click each die to hold it.</p>"#,
    );

    html.push_str(&render_dice(machine));
    html.push_str(&render_roll_button(machine));
    html.push_str(&render_airdrop(machine));
    html.push_str(&render_lifetime_stats(machine));

    html.push_str("</div>");
    html
}

/// Time / rolls left / streak row.
fn render_session_stats(machine: &GameMachine) -> String {
    let timer = machine.session.timer;
    let rolls_left = machine.session.rolls_remaining();
    let urgent = |flag: bool| {
        if flag {
            "text-orange-400 animate-pulse"
        } else {
            "text-cyan-400"
        }
    };

    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div class="grid grid-cols-3 gap-4 bg-white/10 p-4 rounded-lg mt-6">"#);
    for (label, value, class) in [
        ("Time", format_time(timer), urgent(timer <= URGENT_SECONDS)),
        ("Rolls Left", rolls_left.to_string(), urgent(rolls_left <= URGENT_ROLLS)),
        ("Streak", machine.progress.current_streak.to_string(), urgent(false)),
    ] {
        html.push_str(&format!(
            r#"<div class="text-center"><p class="text-xs text-gray-400 uppercase">{}</p><p class="{} font-mono text-lg">{}</p></div>"#,
            label, class, value
        ));
    }
    html.push_str("</div>");
    html
}

fn render_dice(machine: &GameMachine) -> String {
    let mut html = String::with_capacity(2560);
    html.push_str(r#"<div class="grid grid-cols-5 gap-3 mt-5 bg-black/20 p-4 rounded-xl cursor-pointer">"#);
    for die in &machine.dice {
        let (class, state) = if die.is_held {
            ("bg-green-500 text-white", "held")
        } else {
            ("bg-white text-black", "not held")
        };
        html.push_str(&format!(
            r##"<button class="die p-4 rounded-lg text-2xl font-bold transition-colors {class} cursor-pointer" hx-post="/api/game/hold" hx-vals='{{"id": "{id}"}}' hx-target="#tenzies-board" hx-swap="outerHTML" aria-pressed="{held}" aria-label="Die with value {value}, {state}">{symbol}</button>"##,
            class = class,
            id = die.id,
            held = die.is_held,
            value = die.value,
            state = state,
            symbol = die.symbol(),
        ));
    }
    html.push_str("</div>");
    html
}

fn render_roll_button(machine: &GameMachine) -> String {
    let color = match machine.status() {
        GameStatus::Won => "bg-green-500 hover:bg-green-600",
        GameStatus::Lost => "bg-red-500 hover:bg-red-600",
        _ => "bg-indigo-500 hover:bg-indigo-600",
    };
    let disabled = if roll_disabled(machine) { " disabled" } else { "" };
    // The ticker swaps the board every second; focusing on every swap would
    // pull keyboard focus off the dice.
    let focus = if machine.status() == GameStatus::Won { " autofocus" } else { "" };
    format!(
        r##"<button id="roll-button" class="w-full mt-5 py-3 rounded-xl font-bold uppercase tracking-wide transition-all {} cursor-pointer" hx-post="/api/game/roll" hx-vals='js:{{now: Date.now()}}' hx-target="#tenzies-board" hx-swap="outerHTML"{}{}>{}</button>"##,
        color,
        focus,
        disabled,
        button_label(machine)
    )
}

/// Airdrop progress bar.
pub fn render_airdrop(machine: &GameMachine) -> String {
    let crypto = &machine.crypto;
    let eligible = crypto.airdrop_eligible();
    let (badge_class, badge) = if eligible {
        ("text-green-400", "✅ Eligible")
    } else {
        ("text-gray-400", "⏳ In Progress")
    };

    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div id="airdrop-progress" class="mt-6">"#);
    html.push_str(&format!(
        r#"<div class="flex justify-between items-center"><h3 class="text-cyan-400 font-semibold">Airdrop Progress</h3><span class="{}">{}</span></div>"#,
        badge_class, badge
    ));
    html.push_str(&format!(
        r#"<div class="w-full bg-white/10 rounded-full h-3 mt-2"><div class="h-3 bg-gradient-to-r from-cyan-400 to-indigo-500 rounded-full transition-all" style="width: {}%"></div></div>"#,
        crypto.airdrop_progress()
    ));
    html.push_str(&format!(
        r#"<p class="text-center text-gray-300 mt-1">{}/{} points{}</p>"#,
        crypto.airdrop_points,
        crypto.airdrop_threshold,
        if eligible { " 🚀" } else { "" }
    ));
    html.push_str("</div>");
    html
}

/// Wins / games / total points / best time grid.
pub fn render_lifetime_stats(machine: &GameMachine) -> String {
    let p = &machine.progress;
    let best = match p.best_time {
        Some(t) => format!("{}s", t),
        None => "-".to_string(),
    };

    let mut html = String::with_capacity(1024);
    html.push_str(
        r#"<div id="player-stats" class="mt-8 grid grid-cols-2 gap-4 bg-[#0d1224] p-4 rounded-2xl border border-gray-700 w-full max-w-md">"#,
    );
    for (value, label) in [
        (p.total_wins.to_string(), "WINS"),
        (p.total_games.to_string(), "GAMES"),
        (p.total_points.to_string(), "TOTAL POINTS"),
        (best, "BEST TIME"),
    ] {
        html.push_str(&format!(
            r#"<div class="flex flex-col items-center justify-center border border-gray-700 rounded-xl py-4"><span class="text-cyan-400 text-xl font-bold">{}</span><span class="text-gray-400 text-xs mt-1">{}</span></div>"#,
            value, label
        ));
    }
    html.push_str("</div>");
    html
}

/// `<script>` that writes all four records to localStorage.
pub fn render_persist_script(machine: &GameMachine) -> String {
    let mut js = String::with_capacity(2048);
    js.push_str("<script>");
    for (key, json) in persist::export_records(machine) {
        // JSON-encode the record text again to get a safe JS string literal.
        let literal = serde_json::to_string(&json).unwrap_or_else(|_| "\"null\"".to_string());
        js.push_str(&format!(
            "localStorage.setItem({:?}, {});",
            key,
            literal.replace("</", "<\\/")
        ));
    }
    js.push_str("</script>");
    js
}
