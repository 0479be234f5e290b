use crate::entities::LookupKey;
use crate::values::BidderCode;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Named sub-score of a bidder's total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreComponent {
    WinRate,
    BidRate,
    Cpm,
    FloorClearance,
    Latency,
    Recency,
    IdMatch,
}

impl ScoreComponent {
    pub const ALL: [ScoreComponent; 7] = [
        ScoreComponent::WinRate,
        ScoreComponent::BidRate,
        ScoreComponent::Cpm,
        ScoreComponent::FloorClearance,
        ScoreComponent::Latency,
        ScoreComponent::Recency,
        ScoreComponent::IdMatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreComponent::WinRate => "win_rate",
            ScoreComponent::BidRate => "bid_rate",
            ScoreComponent::Cpm => "cpm",
            ScoreComponent::FloorClearance => "floor_clearance",
            ScoreComponent::Latency => "latency",
            ScoreComponent::Recency => "recency",
            ScoreComponent::IdMatch => "id_match",
        }
    }
}

impl fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven sub-scores, each in [0, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub win_rate: f64,
    pub bid_rate: f64,
    pub cpm: f64,
    pub floor_clearance: f64,
    pub latency: f64,
    pub recency: f64,
    pub id_match: f64,
}

impl ScoreComponents {
    pub fn get(&self, component: ScoreComponent) -> f64 {
        match component {
            ScoreComponent::WinRate => self.win_rate,
            ScoreComponent::BidRate => self.bid_rate,
            ScoreComponent::Cpm => self.cpm,
            ScoreComponent::FloorClearance => self.floor_clearance,
            ScoreComponent::Latency => self.latency,
            ScoreComponent::Recency => self.recency,
            ScoreComponent::IdMatch => self.id_match,
        }
    }

    /// Iterate components in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (ScoreComponent, f64)> + '_ {
        ScoreComponent::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Scored bidder for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderScore {
    pub bidder_code: BidderCode,
    /// Weighted total in [0, 100]
    pub total_score: f64,
    pub components: ScoreComponents,
    /// Sample-size confidence in [0, 1]
    pub confidence: f64,
    pub lookup_key_used: Option<LookupKey>,
    /// Number of key-broadening steps taken to find data
    pub fallback_level: usize,
}

impl BidderScore {
    /// Total ordering by `total_score`
    pub fn cmp_by_score(&self, other: &Self) -> Ordering {
        self.total_score.total_cmp(&other.total_score)
    }
}
