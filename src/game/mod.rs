//! Game module — the dice state machine, its records, persistence and
//! board rendering. State lives in WASM memory (thread_local) for the
//! lifetime of the Web Worker.

pub mod board;
pub mod dice;
pub mod machine;
pub mod persist;
pub mod progress;
pub mod rules;
pub mod session;
pub mod state;
