//! Score stages used for presentation and milestone cues

use serde::{Deserialize, Serialize};

/// How deep into a run the player is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AtmosphereStage {
    Early,
    Threshold1,
    Threshold2,
    Threshold3,
    DeepLiminal,
}

impl AtmosphereStage {
    /// Score at which each stage begins
    pub fn min_score(&self) -> u64 {
        match self {
            AtmosphereStage::Early => 0,
            AtmosphereStage::Threshold1 => 100,
            AtmosphereStage::Threshold2 => 250,
            AtmosphereStage::Threshold3 => 500,
            AtmosphereStage::DeepLiminal => 1000,
        }
    }

    pub fn from_score(score: u64) -> Self {
        if score >= 1000 {
            AtmosphereStage::DeepLiminal
        } else if score >= 500 {
            AtmosphereStage::Threshold3
        } else if score >= 250 {
            AtmosphereStage::Threshold2
        } else if score >= 100 {
            AtmosphereStage::Threshold1
        } else {
            AtmosphereStage::Early
        }
    }
}
