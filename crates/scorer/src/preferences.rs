use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Built-in id-type preferences, most preferred first
const BIDDER_ID_PREFERENCES: &[(&str, &[&str])] = &[
    ("rubicon", &["liveramp", "uid2", "id5"]),
    ("appnexus", &["uid2", "id5", "liveramp"]),
    ("pubmatic", &["uid2", "id5", "sharedid"]),
    ("openx", &["uid2", "id5", "liveramp"]),
    ("ix", &["liveramp", "uid2", "id5"]),
    ("criteo", &["criteo", "uid2", "id5"]),
    ("triplelift", &["uid2", "liveramp"]),
    ("sovrn", &["sharedid", "id5"]),
    ("sharethrough", &["uid2", "sharedid"]),
    ("trustx", &["sharedid"]),
    ("ttd", &["ttd", "uid2"]),
    ("yahoossp", &["connectid", "uid2"]),
];

const DEFAULT_ID_PREFERENCES: &[&str] = &["uid2", "id5", "sharedid"];

/// Per-bidder ordered id-type preferences
///
/// Unknown bidders fall back to the default list. A bidder mapped to an
/// empty list has no preference and gets a neutral id-match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdPreferences {
    pub bidders: HashMap<String, Vec<String>>,
    pub default: Vec<String>,
}

impl Default for IdPreferences {
    fn default() -> Self {
        let to_vec = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            bidders: BIDDER_ID_PREFERENCES
                .iter()
                .map(|(bidder, ids)| (bidder.to_string(), to_vec(ids)))
                .collect(),
            default: to_vec(DEFAULT_ID_PREFERENCES),
        }
    }
}

impl IdPreferences {
    pub fn for_bidder(&self, bidder_code: &str) -> &[String] {
        self.bidders
            .get(bidder_code)
            .map(Vec::as_slice)
            .unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_bidders() {
        let prefs = IdPreferences::default();
        assert_eq!(prefs.for_bidder("rubicon"), ["liveramp", "uid2", "id5"]);
        assert_eq!(prefs.for_bidder("newcomer"), ["uid2", "id5", "sharedid"]);
    }

    #[test]
    fn test_json_override_keeps_default_list() {
        let prefs: IdPreferences =
            serde_json::from_str(r#"{"bidders": {"acme": []}}"#).unwrap();
        assert!(prefs.for_bidder("acme").is_empty());
        assert_eq!(prefs.for_bidder("rubicon"), ["uid2", "id5", "sharedid"]);
    }
}
