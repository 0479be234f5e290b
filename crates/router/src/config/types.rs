use bidroute_metrics_store::MetricsStoreConfig;
use bidroute_scorer::ScorerConfig;
use bidroute_selector::SelectorConfig;
use serde::{Deserialize, Serialize};

/// One flat configuration snapshot for the whole decision path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub selector: SelectorConfig,
    pub scorer: ScorerConfig,
    pub metrics: MetricsStoreConfig,
    /// When set, each request's selector is seeded from this and the
    /// request id, making routing reproducible
    pub base_seed: Option<u64>,
}
