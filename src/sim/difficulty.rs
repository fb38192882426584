//! Difficulty progression
//!
//! The deadline decays exponentially from `start_ms` toward `min_ms`:
//!
//! ```text
//! deadline(score) = min_ms + (start_ms - min_ms) * exp(-decay * score)
//! ```
//!
//! With the default decay, score 50 lands near 1.25s.

use crate::Millis;
use crate::config::{GameConfig, JokerScaling};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyCurve {
    start_ms: Millis,
    min_ms: Millis,
    decay: f64,
    joker_probability: f64,
    joker_scaling: JokerScaling,
}

impl DifficultyCurve {
    /// Build from an already validated config
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            start_ms: config.start_ms,
            min_ms: config.min_ms,
            decay: config.decay,
            joker_probability: config.joker_probability,
            joker_scaling: config.joker_scaling,
        }
    }

    /// Response budget for the next card at `score`
    pub fn deadline(&self, score: u64) -> Millis {
        let range = self.start_ms - self.min_ms;
        let decayed = range * (-self.decay * score as f64).exp();
        (self.min_ms + decayed).max(self.min_ms)
    }

    /// Chance that the next card is a joker
    pub fn joker_probability(&self, score: u64) -> f64 {
        match self.joker_scaling {
            JokerScaling::Fixed => self.joker_probability,
            JokerScaling::Progressive { max, full_at_score } => {
                let t = (score as f64 / full_at_score as f64).min(1.0);
                self.joker_probability + (max - self.joker_probability) * t
            }
        }
    }
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
