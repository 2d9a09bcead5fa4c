//! Dice — the ten-die board.
//!
//! A die keeps its id for the whole game so the UI can address it in hold
//! requests. Rolling only touches dice that are not held.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::rules::DIE_FACES;

/// Display symbols for faces 1..=6.
const FACE_SYMBOLS: [&str; 6] = ["₿", "Ξ", "◊", "∆", "○", "☆"];

/// A single die on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Die {
    pub id: Uuid,
    /// Face value, 1..=6.
    pub value: u8,
    pub is_held: bool,
}

impl Die {
    /// A fresh, unheld die with a random face and id.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: random_id(rng),
            value: roll_face(rng),
            is_held: false,
        }
    }

    /// Display symbol for this die's face.
    pub fn symbol(&self) -> &'static str {
        face_symbol(self.value)
    }
}

/// Symbol for a face value. Out-of-range values render as `?`.
pub fn face_symbol(value: u8) -> &'static str {
    match value {
        1..=6 => FACE_SYMBOLS[(value - 1) as usize],
        _ => "?",
    }
}

fn roll_face<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=DIE_FACES)
}

/// Version 4 UUID built from the supplied RNG, so seeded games are reproducible.
fn random_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes[..]);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// Generate `count` fresh dice.
pub fn generate_all_new_dice<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Die> {
    (0..count).map(|_| Die::random(rng)).collect()
}

/// Re-roll every die that is not held. Ids never change.
pub fn roll_unheld<R: Rng + ?Sized>(dice: &mut [Die], rng: &mut R) {
    for die in dice.iter_mut().filter(|d| !d.is_held) {
        die.value = roll_face(rng);
    }
}

/// Toggle the held flag of the die with `id`. Returns the new flag, or
/// `None` if no die has that id.
pub fn toggle_hold(dice: &mut [Die], id: Uuid) -> Option<bool> {
    let die = dice.iter_mut().find(|d| d.id == id)?;
    die.is_held = !die.is_held;
    Some(die.is_held)
}

/// Every die held and every die showing the same face.
/// An empty board is never a win.
pub fn is_winning_board(dice: &[Die]) -> bool {
    match dice.first() {
        Some(first) => dice.iter().all(|d| d.is_held && d.value == first.value),
        None => false,
    }
}

/// Whether a die read back from storage is usable.
pub fn is_valid_die(die: &Die) -> bool {
    (1..=DIE_FACES).contains(&die.value)
}
