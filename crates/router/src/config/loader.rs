use std::path::Path;
use thiserror::Error;

use super::types::RouterConfig;
use bidroute_metrics_store::MetricsConfigError;
use bidroute_scorer::ScorerError;
use bidroute_selector::SelectorError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid scorer config: {0}")]
    Scorer(#[from] ScorerError),
    #[error("Invalid selector config: {0}")]
    Selector(#[from] SelectorError),
    #[error("Invalid metrics config: {0}")]
    Metrics(#[from] MetricsConfigError),
}

/// Load router configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RouterConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
///
/// Missing sections and fields take their defaults.
pub fn load_config_from_str(json: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<RouterConfig, ConfigError> {
    let default_config = include_str!("router_config.json");
    load_config_from_str(default_config)
}

impl RouterConfig {
    /// Run every construction-time check up front
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scorer.validate()?;
        self.selector.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}
