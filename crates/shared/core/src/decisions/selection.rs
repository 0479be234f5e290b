use crate::values::BidderCode;
use serde::{Deserialize, Serialize};

/// Why a bidder was included in the auction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionReason {
    /// Top revenue partner, included regardless of score
    Anchor,
    HighScore,
    /// Low-confidence bidder that won the per-candidate coin flip
    Exploration,
    /// Best bidder of an otherwise unrepresented category
    Diversity,
    /// Randomly sampled into a reserved exploration slot
    ExplorationSlot,
    /// Filtering disabled (bypass mode, or shadow mode pass-through)
    Bypass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedBidder {
    pub bidder_code: BidderCode,
    pub score: f64,
    pub confidence: f64,
    pub reason: SelectionReason,
    pub category: Option<String>,
}

/// Outcome of partner selection for one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected: Vec<SelectedBidder>,
    pub excluded: Vec<BidderCode>,
    pub total_candidates: usize,
    pub bypass_mode: bool,
    pub shadow_mode: bool,
    /// Bidders normal mode would have excluded (shadow mode only)
    pub shadow_would_exclude: Vec<BidderCode>,
}

impl SelectionResult {
    pub fn selected_bidder_codes(&self) -> Vec<&str> {
        self.selected.iter().map(|b| b.bidder_code.as_str()).collect()
    }

    pub fn is_selected(&self, bidder_code: &str) -> bool {
        self.selected.iter().any(|b| b.bidder_code == bidder_code)
    }

    pub fn reason_for(&self, bidder_code: &str) -> Option<SelectionReason> {
        self.selected
            .iter()
            .find(|b| b.bidder_code == bidder_code)
            .map(|b| b.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_wire_names() {
        let json = serde_json::to_string(&SelectionReason::ExplorationSlot).unwrap();
        assert_eq!(json, "\"EXPLORATION_SLOT\"");
    }

    #[test]
    fn test_lookup_helpers() {
        let result = SelectionResult {
            selected: vec![SelectedBidder {
                bidder_code: "rubicon".to_string(),
                score: 80.0,
                confidence: 1.0,
                reason: SelectionReason::Anchor,
                category: Some("premium".to_string()),
            }],
            excluded: vec!["sovrn".to_string()],
            total_candidates: 2,
            ..Default::default()
        };

        assert_eq!(result.selected_bidder_codes(), vec!["rubicon"]);
        assert!(result.is_selected("rubicon"));
        assert!(!result.is_selected("sovrn"));
        assert_eq!(result.reason_for("rubicon"), Some(SelectionReason::Anchor));
    }
}
