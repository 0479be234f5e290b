use crate::entities::LookupKey;
use crate::values::BidderCode;
use serde::{Deserialize, Serialize};

/// Scorer-facing merged view of a bidder's performance
///
/// Produced fresh per call by the metrics store; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderMetricsSnapshot {
    pub bidder_code: BidderCode,
    pub win_rate: f64,
    pub bid_rate: f64,
    pub avg_cpm: f64,
    pub floor_clearance_rate: f64,
    pub avg_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub total_requests: u64,
    pub realtime_requests: u64,
    pub historical_requests: u64,
    pub timeout_rate: f64,
    pub error_rate: f64,
    /// Win rate over the short window alone (recency trend input)
    pub realtime_win_rate: f64,
    /// Win rate over the long window alone (recency trend input)
    pub historical_win_rate: f64,
    /// Sample-size confidence in [0, 1]
    pub confidence: f64,
    /// Key level the data was read at, `None` for bidder-wide data
    pub lookup_key: Option<LookupKey>,
    pub fallback_level: usize,
}

impl BidderMetricsSnapshot {
    /// Snapshot with no samples: all rates 0, confidence 0
    pub fn empty(bidder_code: impl Into<BidderCode>, lookup_key: Option<LookupKey>) -> Self {
        Self {
            bidder_code: bidder_code.into(),
            win_rate: 0.0,
            bid_rate: 0.0,
            avg_cpm: 0.0,
            floor_clearance_rate: 0.0,
            avg_latency_ms: 0.0,
            p95_latency_ms: 0.0,
            total_requests: 0,
            realtime_requests: 0,
            historical_requests: 0,
            timeout_rate: 0.0,
            error_rate: 0.0,
            realtime_win_rate: 0.0,
            historical_win_rate: 0.0,
            confidence: 0.0,
            lookup_key,
            fallback_level: 0,
        }
    }

    pub fn has_data(&self) -> bool {
        self.total_requests > 0
    }

    /// Stepped confidence for a blended sample size
    pub fn confidence_for(total_requests: u64) -> f64 {
        match total_requests {
            0 => 0.0,
            1..=9 => 0.1,
            10..=99 => 0.4,
            100..=999 => 0.7,
            1_000..=9_999 => 0.9,
            _ => 1.0,
        }
    }
}
