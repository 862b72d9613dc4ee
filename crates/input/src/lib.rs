//! Input: raw key events mapped to named actions and per-frame movement flags.
//!
//! # Invariants
//! - Press/release are idempotent: repeating a press while held changes nothing.
//! - Jump is one-shot: it fires once per press, then is consumed.
//! - The pause toggle is honored even while paused; movement presses are not.

pub mod action;
mod state;

pub use action::{Action, KeyBindings};
pub use state::{InputFlags, InputState, KeyOutcome};
