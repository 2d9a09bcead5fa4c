//! Game constants and the point formula.

/// Dice on the board.
pub const DICE_COUNT: usize = 10;
/// Faces per die.
pub const DIE_FACES: u8 = 6;
/// Seconds on the clock when a game starts.
pub const ROUND_SECONDS: u32 = 180;
/// Rolls allowed per game, including the roll that starts it.
pub const MAX_ROLLS: u32 = 15;
/// Airdrop points needed to become eligible.
pub const AIRDROP_THRESHOLD: u32 = 100;
/// Reward token shown next to awarded points.
pub const TOKEN_SYMBOL: &str = "TENZ";

/// Flat reward for any win.
pub const BASE_POINTS: u32 = 10;
/// Wins faster than this many seconds earn a time bonus.
pub const TIME_BONUS_WINDOW: u32 = 60;
/// Wins in fewer rolls than this earn a roll bonus.
pub const ROLL_BONUS_WINDOW: u32 = 10;
/// Points per roll saved under the roll bonus window.
pub const POINTS_PER_SAVED_ROLL: u32 = 2;

/// Timer at or below this many seconds is shown as urgent.
pub const URGENT_SECONDS: u32 = 30;
/// Rolls remaining at or below this count are shown as urgent.
pub const URGENT_ROLLS: u32 = 3;

/// Tunable limits for one game. `Default` is the standard ruleset.
/// Dice always have [`DIE_FACES`] faces; the face symbols cover exactly six.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub dice_count: usize,
    pub round_seconds: u32,
    pub max_rolls: u32,
    pub airdrop_threshold: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            dice_count: DICE_COUNT,
            round_seconds: ROUND_SECONDS,
            max_rolls: MAX_ROLLS,
            airdrop_threshold: AIRDROP_THRESHOLD,
        }
    }
}

/// Points awarded for a win.
///
/// `floor(10 + max(0, 60 - time_used) * 0.5 + max(0, 10 - rolls_used) * 2)`.
/// Only the time term can be fractional, so halving it with integer
/// division gives the same floor.
pub fn calculate_points(time_used: u32, rolls_used: u32) -> u32 {
    let time_bonus = TIME_BONUS_WINDOW.saturating_sub(time_used) / 2;
    let roll_bonus = ROLL_BONUS_WINDOW.saturating_sub(rolls_used) * POINTS_PER_SAVED_ROLL;
    BASE_POINTS + time_bonus + roll_bonus
}

/// Format seconds as `m:ss`.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_win_earns_base_points_only() {
        assert_eq!(calculate_points(60, 10), 10);
        assert_eq!(calculate_points(175, 15), 10);
    }

    #[test]
    fn instant_win_earns_full_bonuses() {
        assert_eq!(calculate_points(0, 0), 60);
    }

    #[test]
    fn odd_time_bonus_is_floored() {
        // 10 + 59 * 0.5 + 0 = 39.5
        assert_eq!(calculate_points(1, 10), 39);
        // 10 + 0.5 + 2 = 12.5
        assert_eq!(calculate_points(59, 9), 12);
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(180), "3:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn default_rules_match_constants() {
        let rules = GameRules::default();
        assert_eq!(rules.dice_count, 10);
        assert_eq!(rules.max_rolls, 15);
        assert_eq!(rules.round_seconds, 180);
        assert_eq!(rules.airdrop_threshold, 100);
    }
}
