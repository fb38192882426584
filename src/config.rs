//! Game tuning configuration
//!
//! Every timing and scoring constant lives here as a named field so a host can
//! swap tunings without touching the core. Persisted in LocalStorage on web.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How the joker chance evolves over a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JokerScaling {
    /// Same probability for every card
    #[default]
    Fixed,
    /// Ramps linearly from the base probability to `max` as score reaches `full_at_score`
    Progressive { max: f64, full_at_score: u64 },
}

/// Tuning for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Deadline curve ===
    /// Deadline at score 0 (ms)
    pub start_ms: f64,
    /// Deadline floor (ms)
    pub min_ms: f64,
    /// Exponential decay per point of score
    pub decay: f64,

    // === Cards ===
    /// Base chance for a joker card
    pub joker_probability: f64,
    pub joker_scaling: JokerScaling,

    // === Scoring ===
    pub max_strikes: u32,
    /// Consecutive correct answers per multiplier step
    pub streak_window: u32,

    // === Gestures ===
    pub swipe_distance_px: f32,
    pub swipe_velocity_px_per_ms: f32,
    pub swipe_min_duration_ms: f32,

    // === Feedback ===
    /// Play a cue when the score crosses into a new atmosphere stage
    pub milestone_cues: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    /// Slow opening, gentle joker rate
    pub fn classic() -> Self {
        Self {
            start_ms: START_MS,
            min_ms: MIN_MS,
            decay: DECAY,

            joker_probability: JOKER_PROBABILITY,
            joker_scaling: JokerScaling::Fixed,

            max_strikes: MAX_STRIKES,
            streak_window: STREAK_WINDOW,

            swipe_distance_px: DISTANCE_THRESHOLD,
            swipe_velocity_px_per_ms: VELOCITY_THRESHOLD,
            swipe_min_duration_ms: MIN_SWIPE_DURATION,

            milestone_cues: true,
        }
    }

    /// Faster tuning: shorter deadlines and more jokers
    pub fn arcade() -> Self {
        Self {
            start_ms: 1500.0,
            min_ms: 450.0,
            joker_probability: 0.25,
            ..Self::classic()
        }
    }

    /// Check every field. Bad tuning is a programmer error and is rejected
    /// before a run can start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive_finite(self.start_ms) {
            return Err(ConfigError::NonPositiveStart(self.start_ms));
        }
        if !is_positive_finite(self.min_ms) {
            return Err(ConfigError::NonPositiveMin(self.min_ms));
        }
        if self.min_ms > self.start_ms {
            return Err(ConfigError::MinAboveStart {
                min: self.min_ms,
                start: self.start_ms,
            });
        }
        if !is_positive_finite(self.decay) {
            return Err(ConfigError::InvalidDecay(self.decay));
        }
        check_probability(self.joker_probability)?;
        if let JokerScaling::Progressive { max, full_at_score } = self.joker_scaling {
            check_probability(max)?;
            if full_at_score == 0 {
                return Err(ConfigError::EmptyJokerSpan);
            }
        }
        if self.max_strikes == 0 {
            return Err(ConfigError::ZeroMaxStrikes);
        }
        if self.streak_window == 0 {
            return Err(ConfigError::ZeroStreakWindow);
        }
        for (name, value) in [
            ("swipe_distance_px", self.swipe_distance_px),
            ("swipe_velocity_px_per_ms", self.swipe_velocity_px_per_ms),
            ("swipe_min_duration_ms", self.swipe_min_duration_ms),
        ] {
            if !is_positive_finite(f64::from(value)) {
                return Err(ConfigError::NonPositiveSwipeThreshold { name, value });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning. Missing fields fall back to [`GameConfig::classic`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "swipe_reflex_config";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded game config from LocalStorage");
                        return config;
                    }
                    Err(err) => log::warn!("Ignoring stored game config: {err}"),
                }
            }
        }

        log::info!("Using default game config");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Game config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn check_probability(p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::JokerProbabilityOutOfRange(p))
    }
}
