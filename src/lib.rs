//! Swipe Reflex - a reflex card game core
//!
//! A direction arrow (or its inverse, on joker cards) is dealt and the player
//! answers by drag, touch or keyboard before the card's deadline runs out.
//! Three strikes end the run.
//!
//! Core modules:
//! - `sim`: Deterministic game core (gestures, arbitration, deadlines, rounds, sessions)
//! - `platform`: Host-facing adapters (time source, raw input, audio cues, web bindings)
//! - `config`: Data-driven game tuning
//! - `totals`: Cumulative score ledger persisted across runs

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;
pub mod totals;

pub use config::{GameConfig, JokerScaling};
pub use error::{ConfigError, ExternalError};
pub use totals::ScoreTotals;

/// Monotonic milliseconds, as handed out by a [`platform::time::TimeSource`]
pub type Millis = f64;

/// Default tuning values
pub mod consts {
    /// Deadline for the first card of a run (ms)
    pub const START_MS: f64 = 2000.0;
    /// Floor the deadline decays toward (ms)
    pub const MIN_MS: f64 = 500.0;
    /// Exponential decay per point of score (~1.25s at score 50)
    pub const DECAY: f64 = 0.01386;
    /// Chance that a freshly dealt card is a joker
    pub const JOKER_PROBABILITY: f64 = 0.15;

    /// Strikes that end a run
    pub const MAX_STRIKES: u32 = 3;
    /// Consecutive correct answers per multiplier step
    pub const STREAK_WINDOW: u32 = 50;

    /// Minimum drag distance to count as a swipe (px)
    pub const DISTANCE_THRESHOLD: f32 = 50.0;
    /// Minimum flick velocity to count as a swipe (px/ms)
    pub const VELOCITY_THRESHOLD: f32 = 0.4;
    /// Flicks shorter than this are treated as jitter (ms)
    pub const MIN_SWIPE_DURATION: f32 = 50.0;
}
