use serde::{Deserialize, Serialize};

/// Parsed privacy signals attached to a request
///
/// The boolean flags are what downstream filters branch on; the raw strings
/// are kept so a privacy filter can re-parse them with full vendor detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSnapshot {
    pub gdpr_applies: bool,
    pub ccpa_applies: bool,
    pub coppa_applies: bool,
    pub gpp_applies: bool,
    /// TCF consent string (user.consent)
    pub tcf_consent: Option<String>,
    /// IAB US privacy string, e.g. "1YNN"
    pub us_privacy: Option<String>,
    /// User opted out of sale under the US privacy string
    pub us_privacy_opt_out: bool,
    pub gpp_string: Option<String>,
    pub gpp_section_ids: Vec<u32>,
}
