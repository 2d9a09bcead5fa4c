//! `/api/player/*` routes — lifetime stats and save-file export/import.

use crate::game::persist;
use crate::game::rules::GameRules;
use crate::game::{board, state};
use crate::routes::util::{error_fragment, get_param, parse_form_body};

// ── GET /api/player/stats ──────────────────────────────────────────

/// Handle GET /api/player/stats
/// Returns the airdrop bar and the lifetime stats grid.
pub fn handle_stats_get(_query: &str) -> String {
    state::with_state(|m| {
        let mut html = board::render_airdrop(m);
        html.push_str(&board::render_lifetime_stats(m));
        html
    })
}

// ── GET /api/player/export ─────────────────────────────────────────

/// Handle GET /api/player/export
/// Returns a <script> tag that triggers a download of the save file.
pub fn handle_export_get(_query: &str) -> String {
    let encoded = match state::with_state(persist::encode_save) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "save export failed");
            return error_fragment(&format!("Export failed: {}", e));
        }
    };
    // URL-safe base64 has no quotes or backslashes, so it is safe inside a JS string.
    format!(
        r#"<script>
(function() {{
  var b = new Blob(['{state}'], {{type: 'text/plain'}});
  var a = document.createElement('a');
  a.href = URL.createObjectURL(b);
  a.download = 'crypto-tenzies-save.txt';
  a.click();
  URL.revokeObjectURL(a.href);
}})();
</script>"#,
        state = encoded
    )
}

// ── POST /api/player/import ────────────────────────────────────────

/// Handle POST /api/player/import
/// Body: state={save string}, or the raw save string.
/// Replaces the live game and records, then persists them.
pub fn handle_import_post(body: &str) -> String {
    let params = parse_form_body(body);
    let encoded = get_param(&params, "state").unwrap_or(body.trim());
    let result = state::with_rng(|rng| persist::decode_save(encoded, GameRules::default(), rng));
    match result {
        Ok(machine) => {
            state::replace_state(machine);
            tracing::info!("save file imported");
            let mut html = String::from(
                r#"<span class="text-green-400">Save imported successfully</span>"#,
            );
            html.push_str(&state::with_state(board::render_persist_script));
            html
        }
        Err(e) => {
            tracing::warn!(error = %e, "save import rejected");
            error_fragment(&format!("Import failed: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset() {
        state::reset_state();
    }

    fn exported_save() -> String {
        let script = handle_export_get("");
        let start = script.find("['").unwrap() + 2;
        let end = script[start..].find("']").unwrap() + start;
        script[start..end].to_string()
    }

    #[test]
    fn stats_get_renders_grid() {
        reset();
        let html = handle_stats_get("");
        assert!(html.contains("Airdrop Progress"));
        assert!(html.contains("TOTAL POINTS"));
        assert!(html.contains("0/100 points"));
        reset();
    }

    #[test]
    fn export_returns_download_script() {
        reset();
        let html = handle_export_get("");
        assert!(html.contains("<script>"));
        assert!(html.contains("crypto-tenzies-save.txt"));
        reset();
    }

    #[test]
    fn export_import_roundtrip() {
        reset();
        state::with_state_mut(|m| {
            m.progress.record_win(25, 32);
            m.crypto.award(32);
        });
        let save = exported_save();

        reset();
        state::with_state(|m| assert_eq!(m.progress.total_wins, 0));

        let html = handle_import_post(&format!("state={}", save));
        assert!(html.contains("successfully"));
        assert!(html.contains("localStorage.setItem"));
        state::with_state(|m| {
            assert_eq!(m.progress.total_wins, 1);
            assert_eq!(m.progress.best_time, Some(25));
            assert_eq!(m.crypto.airdrop_points, 32);
        });
        reset();
    }

    #[test]
    fn import_accepts_raw_body() {
        reset();
        let save = exported_save();
        let html = handle_import_post(&save);
        assert!(html.contains("successfully"));
        reset();
    }

    #[test]
    fn import_rejects_garbage_and_keeps_state() {
        reset();
        state::with_state_mut(|m| m.progress.total_games = 3);
        let html = handle_import_post("state=@@@");
        assert!(html.contains("Import failed"));
        state::with_state(|m| assert_eq!(m.progress.total_games, 3));
        reset();
    }
}
