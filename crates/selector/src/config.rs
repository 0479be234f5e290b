use crate::categories::{BidderCategories, MID_TIER, NATIVE, PREMIUM, VIDEO_SPECIALIST};
use crate::error::{Result, SelectorError};
use serde::{Deserialize, Serialize};

/// Partner selection tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Select every candidate, ignoring scores
    pub bypass_enabled: bool,
    /// Select every candidate but report what normal mode would exclude
    pub shadow_mode: bool,
    pub max_bidders: usize,
    /// Minimum total score for the high-scorer step
    pub min_score_threshold: f64,
    /// Chance a low-confidence high scorer is still invited
    pub exploration_rate: f64,
    pub exploration_slots: usize,
    /// Below this confidence a high scorer needs the exploration coin flip
    pub low_confidence_threshold: f64,
    /// Below this confidence a bidder may fill an exploration slot
    pub exploration_confidence_threshold: f64,
    pub anchor_bidder_count: usize,
    pub diversity_enabled: bool,
    pub diversity_categories: Vec<String>,
    pub categories: BidderCategories,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            bypass_enabled: false,
            shadow_mode: false,
            max_bidders: 10,
            min_score_threshold: 20.0,
            exploration_rate: 0.1,
            exploration_slots: 2,
            low_confidence_threshold: 0.3,
            exploration_confidence_threshold: 0.5,
            anchor_bidder_count: 3,
            diversity_enabled: true,
            diversity_categories: [PREMIUM, MID_TIER, VIDEO_SPECIALIST, NATIVE]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            categories: BidderCategories::default(),
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bypass_enabled && self.shadow_mode {
            return Err(SelectorError::InvalidConfig(
                "bypass_enabled and shadow_mode are mutually exclusive".to_string(),
            ));
        }
        if self.max_bidders == 0 {
            return Err(SelectorError::InvalidConfig(
                "max_bidders must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.min_score_threshold) {
            return Err(SelectorError::InvalidConfig(format!(
                "min_score_threshold must be within [0, 100], got {}",
                self.min_score_threshold
            )));
        }
        for (name, value) in [
            ("exploration_rate", self.exploration_rate),
            ("low_confidence_threshold", self.low_confidence_threshold),
            (
                "exploration_confidence_threshold",
                self.exploration_confidence_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SelectorError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
