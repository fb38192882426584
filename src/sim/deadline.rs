//! Per-card countdown
//!
//! Driven cooperatively: the host passes a monotonic timestamp into every call
//! and polls for expiry, so tests control time exactly.
//!
//! ```text
//! Idle ──start──▶ Running ──poll(now ≥ deadline)──▶ Expired
//!                  │   ▲
//!            pause │   │ resume
//!                  ▼   │
//!                 Paused
//! Running/Paused ──cancel──▶ Cancelled
//! ```

use serde::{Deserialize, Serialize};

use crate::Millis;

/// Observable clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    Idle,
    Running,
    Paused,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Running { expires_at: Millis },
    Paused { remaining: Millis },
    Expired,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct DeadlineClock {
    phase: Phase,
    duration_ms: Millis,
    /// Incremented on every start; expiry belongs to exactly one generation
    generation: u64,
}

impl Default for DeadlineClock {
    fn default() -> Self {
        Self::new()
    }
}

impl DeadlineClock {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            duration_ms: 0.0,
            generation: 0,
        }
    }

    pub fn state(&self) -> ClockState {
        match self.phase {
            Phase::Idle => ClockState::Idle,
            Phase::Running { .. } => ClockState::Running,
            Phase::Paused { .. } => ClockState::Paused,
            Phase::Expired => ClockState::Expired,
            Phase::Cancelled => ClockState::Cancelled,
        }
    }

    /// Budget given to the latest `start`
    pub fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Arm a fresh countdown. Any countdown still pending is superseded and
    /// can no longer expire.
    pub fn start(&mut self, duration_ms: Millis, now: Millis) {
        debug_assert!(duration_ms > 0.0, "deadline must be positive");
        if matches!(self.phase, Phase::Running { .. } | Phase::Paused { .. }) {
            log::debug!("Deadline generation {} superseded", self.generation);
        }
        self.generation += 1;
        self.duration_ms = duration_ms;
        self.phase = Phase::Running {
            expires_at: now + duration_ms,
        };
    }

    /// Suppress the pending expiry. No-op unless running or paused.
    pub fn cancel(&mut self) {
        if matches!(self.phase, Phase::Running { .. } | Phase::Paused { .. }) {
            self.phase = Phase::Cancelled;
        }
    }

    /// Freeze the countdown, keeping the remaining budget
    pub fn pause(&mut self, now: Millis) {
        if let Phase::Running { expires_at } = self.phase {
            self.phase = Phase::Paused {
                remaining: (expires_at - now).max(0.0),
            };
        }
    }

    /// Continue with the budget that remained at pause time
    pub fn resume(&mut self, now: Millis) {
        if let Phase::Paused { remaining } = self.phase {
            self.phase = Phase::Running {
                expires_at: now + remaining,
            };
        }
    }

    /// Time left, clamped at zero
    pub fn remaining(&self, now: Millis) -> Millis {
        match self.phase {
            Phase::Running { expires_at } => (expires_at - now).max(0.0),
            Phase::Paused { remaining } => remaining,
            Phase::Idle | Phase::Expired | Phase::Cancelled => 0.0,
        }
    }

    /// Fraction of the budget left, in [0, 1]
    pub fn progress(&self, now: Millis) -> f32 {
        if self.duration_ms <= 0.0 {
            return 0.0;
        }
        (self.remaining(now) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Check for expiry. Returns `true` exactly once per `start`.
    pub fn poll(&mut self, now: Millis) -> bool {
        match self.phase {
            Phase::Running { expires_at } if now >= expires_at => {
                self.phase = Phase::Expired;
                true
            }
            _ => false,
        }
    }
}
