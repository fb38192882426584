//! Error types
//!
//! Input ambiguity and late timers are not errors in this crate; they are
//! dropped structurally. What remains is bad configuration (fail fast at
//! startup) and failures reported back by external collaborators.

use thiserror::Error;

/// Invalid game tuning. Raised when an engine or session is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("start deadline must be positive and finite, got {0} ms")]
    NonPositiveStart(f64),
    #[error("minimum deadline must be positive and finite, got {0} ms")]
    NonPositiveMin(f64),
    #[error("minimum deadline {min} ms exceeds start deadline {start} ms")]
    MinAboveStart { min: f64, start: f64 },
    #[error("decay must be a positive finite number, got {0}")]
    InvalidDecay(f64),
    #[error("joker probability must lie in [0, 1], got {0}")]
    JokerProbabilityOutOfRange(f64),
    #[error("progressive joker scaling needs a positive score span")]
    EmptyJokerSpan,
    #[error("max strikes must be at least 1")]
    ZeroMaxStrikes,
    #[error("streak window must be at least 1")]
    ZeroStreakWindow,
    #[error("swipe threshold `{name}` must be positive and finite, got {value}")]
    NonPositiveSwipeThreshold { name: &'static str, value: f32 },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Failure reported by an external collaborator (wallet, leaderboard).
///
/// Surfaced to the UI through the session's operation state; never fed back
/// into the round loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalError {
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("collaborator unavailable")]
    Unavailable,
}
