//! Cumulative score ledger
//!
//! Read once at startup, written once per successful score submission.
//! Persisted to LocalStorage on web.

use serde::{Deserialize, Serialize};

/// Totals carried across runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoreTotals {
    /// Sum of every submitted run's score
    pub total_score: u64,
    /// Best submitted run
    pub best_score: u64,
    /// Number of submitted runs
    pub submitted_runs: u32,
}

impl ScoreTotals {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "swipe_reflex_totals";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in a confirmed submission. Returns `true` if it set a new best.
    pub fn record_submission(&mut self, score: u64) -> bool {
        self.total_score = self.total_score.saturating_add(score);
        self.submitted_runs = self.submitted_runs.saturating_add(1);
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Fold in a higher final score for a run already recorded at `previous`.
    /// Only the difference is added; the run is not counted twice.
    pub fn record_revision(&mut self, previous: u64, score: u64) -> bool {
        self.total_score = self
            .total_score
            .saturating_add(score.saturating_sub(previous));
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Load totals from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(totals) = serde_json::from_str::<ScoreTotals>(&json) {
                    log::info!("Loaded score totals ({} total)", totals.total_score);
                    return totals;
                }
            }
        }

        log::info!("No score totals found, starting fresh");
        Self::new()
    }

    /// Save totals to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Score totals saved ({} total)", self.total_score);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
