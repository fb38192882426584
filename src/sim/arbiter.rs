//! Single-acceptance gate for player attempts
//!
//! Keyboard, mouse and touch all funnel through [`InputArbiter::submit_attempt`].
//! Only the first attempt for the armed card gets through; everything after it
//! (a second key, a drag finishing late, an attempt for a stale card) is
//! silently dropped.

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::Millis;

/// Where an attempt came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    Keyboard,
    Mouse,
    Touch,
}

/// An accepted attempt, consumed once by the round engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureAttempt {
    pub direction: Direction,
    pub source_sequence_id: u64,
    pub timestamp_ms: Millis,
    pub source: InputSource,
}

#[derive(Debug, Clone, Default)]
pub struct InputArbiter {
    /// Card currently accepting an attempt
    armed: Option<u64>,
    /// Attempts dropped since creation (diagnostics only)
    dropped: u64,
}

impl InputArbiter {
    /// A disarmed arbiter; every attempt is dropped until [`InputArbiter::arm`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept exactly one attempt for `sequence_id`
    pub fn arm(&mut self, sequence_id: u64) {
        self.armed = Some(sequence_id);
    }

    /// Stop accepting attempts for whatever card was armed
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn armed_sequence(&self) -> Option<u64> {
        self.armed
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Offer an attempt for the card the input layer believes is active.
    ///
    /// Returns the attempt if it is the first one for the armed card, which
    /// also disarms the arbiter. Returns `None` otherwise.
    pub fn submit_attempt(
        &mut self,
        direction: Direction,
        current_sequence_id: u64,
        source: InputSource,
        timestamp_ms: Millis,
    ) -> Option<GestureAttempt> {
        if self.armed != Some(current_sequence_id) {
            self.dropped += 1;
            log::trace!(
                "Dropped {:?} attempt for card #{current_sequence_id} (armed: {:?})",
                source,
                self.armed
            );
            return None;
        }

        self.armed = None;
        Some(GestureAttempt {
            direction,
            source_sequence_id: current_sequence_id,
            timestamp_ms,
            source,
        })
    }
}
