//! Basic IAB consent parsing
//!
//! Extracts applicability flags from the raw regs/user fields. Vendor-level
//! TCF decoding is left to the privacy filter that consumes the snapshot.

use bidroute_core::ConsentSnapshot;
use bidroute_ports::{ConsentParser, ConsentSignals};

/// GPP section ids that imply a regime applies
const GPP_SECTION_TCF_EU: u32 = 2;
const GPP_SECTION_US_PRIVACY: u32 = 6;

#[derive(Debug, Default, Clone, Copy)]
pub struct TcfConsentParser;

impl TcfConsentParser {
    pub fn new() -> Self {
        Self
    }
}

/// A valid US privacy string is version 1 plus three Y/N/- flags
fn valid_us_privacy(value: &str) -> Option<[u8; 4]> {
    let bytes: [u8; 4] = value.as_bytes().try_into().ok()?;
    let flags_ok = bytes[1..]
        .iter()
        .all(|b| matches!(b.to_ascii_uppercase(), b'Y' | b'N' | b'-'));
    (bytes[0] == b'1' && flags_ok).then_some(bytes)
}

impl ConsentParser for TcfConsentParser {
    fn parse(&self, signals: &ConsentSignals) -> ConsentSnapshot {
        let us_privacy = signals
            .us_privacy
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let usp_flags = us_privacy.and_then(valid_us_privacy);

        let gpp_string = signals
            .gpp
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        ConsentSnapshot {
            gdpr_applies: signals.gdpr == Some(1)
                || signals.gpp_sid.contains(&GPP_SECTION_TCF_EU),
            ccpa_applies: usp_flags.is_some_and(|f| f[1] != b'-')
                || signals.gpp_sid.contains(&GPP_SECTION_US_PRIVACY),
            coppa_applies: signals.coppa == Some(1),
            gpp_applies: gpp_string.is_some(),
            tcf_consent: signals
                .consent_string
                .clone()
                .filter(|s| !s.trim().is_empty()),
            us_privacy: us_privacy.map(String::from),
            us_privacy_opt_out: usp_flags.is_some_and(|f| f[2].to_ascii_uppercase() == b'Y'),
            gpp_string: gpp_string.map(String::from),
            gpp_section_ids: signals.gpp_sid.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gdpr_with_consent_string() {
        let snapshot = TcfConsentParser.parse(&ConsentSignals {
            gdpr: Some(1),
            consent_string: Some("CPXxRfAPXxRfAAfKABENB-CgAAAAAAAAAAYgAAAAAAAA".to_string()),
            ..Default::default()
        });

        assert!(snapshot.gdpr_applies);
        assert!(!snapshot.ccpa_applies);
        assert!(snapshot.tcf_consent.is_some());
    }

    #[test]
    fn test_us_privacy_opt_out() {
        let snapshot = TcfConsentParser.parse(&ConsentSignals {
            us_privacy: Some("1YYN".to_string()),
            ..Default::default()
        });
        assert!(snapshot.ccpa_applies);
        assert!(snapshot.us_privacy_opt_out);

        let snapshot = TcfConsentParser.parse(&ConsentSignals {
            us_privacy: Some("1-N-".to_string()),
            ..Default::default()
        });
        assert!(!snapshot.ccpa_applies);
        assert!(!snapshot.us_privacy_opt_out);
        assert_eq!(snapshot.us_privacy.as_deref(), Some("1-N-"));

        // Notice given, no opt-out
        let snapshot = TcfConsentParser.parse(&ConsentSignals {
            us_privacy: Some("1YN-".to_string()),
            ..Default::default()
        });
        assert!(snapshot.ccpa_applies);
        assert!(!snapshot.us_privacy_opt_out);
    }

    #[test]
    fn test_invalid_us_privacy_is_kept_but_ignored() {
        let snapshot = TcfConsentParser.parse(&ConsentSignals {
            us_privacy: Some("garbage".to_string()),
            ..Default::default()
        });
        assert!(!snapshot.ccpa_applies);
        assert_eq!(snapshot.us_privacy.as_deref(), Some("garbage"));
    }

    #[test]
    fn test_gpp_sections() {
        let snapshot = TcfConsentParser.parse(&ConsentSignals {
            gpp: Some("DBABMA~CPXxRfAPXxRfAAfKABENB".to_string()),
            gpp_sid: vec![2],
            coppa: Some(1),
            ..Default::default()
        });
        assert!(snapshot.gpp_applies);
        assert!(snapshot.gdpr_applies);
        assert!(snapshot.coppa_applies);
        assert_eq!(snapshot.gpp_section_ids, vec![2]);
    }
}
