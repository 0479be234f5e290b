use bidroute_core::ConsentSnapshot;
use serde::{Deserialize, Serialize};

/// Raw privacy fields lifted from an auction request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSignals {
    pub gdpr: Option<i64>,
    pub coppa: Option<i64>,
    pub consent_string: Option<String>,
    pub us_privacy: Option<String>,
    pub gpp: Option<String>,
    pub gpp_sid: Vec<u32>,
}

/// Port for consent-string parsing
pub trait ConsentParser: Send + Sync {
    fn parse(&self, signals: &ConsentSignals) -> ConsentSnapshot;
}
