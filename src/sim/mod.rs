//! Deterministic game core
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time only arrives as monotonic timestamps passed in by the host
//! - Seeded RNG only
//! - One owner per card's deadline and arbiter arming
//! - No rendering, audio or platform dependencies beyond the cue trait

pub mod arbiter;
pub mod atmosphere;
pub mod card;
pub mod deadline;
pub mod difficulty;
pub mod direction;
pub mod engine;
pub mod gesture;
pub mod session;

pub use arbiter::{GestureAttempt, InputArbiter, InputSource};
pub use atmosphere::AtmosphereStage;
pub use card::{Card, IncorrectReason, RoundOutcome};
pub use deadline::{ClockState, DeadlineClock};
pub use difficulty::DifficultyCurve;
pub use direction::Direction;
pub use engine::{EngineEvent, RoundEngine, RoundPhase, RunStats, SessionState, multiplier_for};
pub use gesture::{GestureResolver, Swipe, SwipeSample, SwipeThresholds, SwipeTrigger, classify_swipe};
pub use session::{
    ExternalOpState, GameOverHook, RunSummary, ScoreSubmission, SessionController,
    StrikeResetRequest,
};
