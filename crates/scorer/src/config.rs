use crate::error::Result;
use crate::preferences::IdPreferences;
use crate::weights::ScoringWeights;
use serde::{Deserialize, Serialize};

/// Scorer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub weights: ScoringWeights,
    /// Samples a key level needs before broader levels stop being tried
    pub min_sample_size: u64,
    /// Recent requests needed before the recency trend counts
    pub recency_min_samples: u64,
    pub id_preferences: IdPreferences,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_sample_size: 100,
            recency_min_samples: 30,
            id_preferences: IdPreferences::default(),
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()
    }
}
