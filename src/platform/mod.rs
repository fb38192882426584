//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Monotonic time
//! - Raw keyboard/pointer/touch input
//! - Audio cue dispatch
//! - Browser bindings (wasm32 only)

pub mod cues;
pub mod input;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use cues::{Cue, CueLog, CueSink, SilentCues};
pub use input::{PointerEvent, PointerKind, PointerTracker, direction_for_key};
pub use time::{ManualClock, SystemClock, TimeSource};
