use crate::error::MetricsConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Blending and fetch parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsStoreConfig {
    /// Weight of the short-window source before renormalization
    pub realtime_weight: f64,
    /// Weight of the long-window source before renormalization
    pub historical_weight: f64,
    /// Samples a key level needs before broader levels stop being tried
    pub min_sample_size: u64,
    /// Per-read timeout against either source
    pub fetch_timeout_ms: u64,
}

impl Default for MetricsStoreConfig {
    fn default() -> Self {
        Self {
            realtime_weight: 0.6,
            historical_weight: 0.4,
            min_sample_size: 100,
            fetch_timeout_ms: 20,
        }
    }
}

impl MetricsStoreConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), MetricsConfigError> {
        for (name, weight) in [
            ("realtime_weight", self.realtime_weight),
            ("historical_weight", self.historical_weight),
        ] {
            if weight < 0.0 || weight.is_nan() {
                return Err(MetricsConfigError::NegativeWeight { name, weight });
            }
        }
        if self.realtime_weight + self.historical_weight <= 0.0 {
            return Err(MetricsConfigError::NoPositiveWeight);
        }
        if self.fetch_timeout_ms == 0 {
            return Err(MetricsConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
