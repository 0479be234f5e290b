use super::ratio;
use crate::values::Cpm;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Raw outcome counters over some window
///
/// Only counts and sums are stored; every rate is derived on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCounters {
    pub requests: u64,
    pub bids: u64,
    pub wins: u64,
    pub timeouts: u64,
    pub errors: u64,
    /// Sum of bid CPMs
    pub total_bid_value: Cpm,
    /// Sum of clearing CPMs on won auctions
    pub total_win_value: Cpm,
    /// Sum of response latencies
    pub total_latency_ms: u64,
}

impl PerformanceCounters {
    pub fn is_empty(&self) -> bool {
        self.requests == 0
    }

    /// Fraction of requests answered with a bid
    pub fn bid_rate(&self) -> f64 {
        ratio(self.bids as f64, self.requests as f64)
    }

    /// Fraction of bids that won
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins as f64, self.bids as f64)
    }

    /// Average bid CPM
    pub fn avg_cpm(&self) -> f64 {
        ratio(decimal_to_f64(self.total_bid_value), self.bids as f64)
    }

    /// Average clearing CPM on wins
    pub fn avg_win_cpm(&self) -> f64 {
        ratio(decimal_to_f64(self.total_win_value), self.wins as f64)
    }

    pub fn avg_latency_ms(&self) -> f64 {
        ratio(self.total_latency_ms as f64, self.requests as f64)
    }

    pub fn timeout_rate(&self) -> f64 {
        ratio(self.timeouts as f64, self.requests as f64)
    }

    pub fn error_rate(&self) -> f64 {
        ratio(self.errors as f64, self.requests as f64)
    }

    /// Fold another window's counters into this one
    pub fn merge(&mut self, other: &PerformanceCounters) {
        self.requests += other.requests;
        self.bids += other.bids;
        self.wins += other.wins;
        self.timeouts += other.timeouts;
        self.errors += other.errors;
        self.total_bid_value += other.total_bid_value;
        self.total_win_value += other.total_win_value;
        self.total_latency_ms += other.total_latency_ms;
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Short-window ("real-time") counters for one bidder and context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealTimeMetrics {
    pub counters: PerformanceCounters,
    /// p95 latency as reported by the source
    pub p95_latency_ms: f64,
}

impl RealTimeMetrics {
    pub fn sample_size(&self) -> u64 {
        self.counters.requests
    }
}

/// Long-window ("historical") counters for one bidder and context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPerformance {
    pub counters: PerformanceCounters,
    /// Bids at or above the auction floor
    pub floor_clearances: u64,
    /// p95 latency as reported by the source
    pub p95_latency_ms: f64,
}

impl HistoricalPerformance {
    pub fn sample_size(&self) -> u64 {
        self.counters.requests
    }

    /// Fraction of bids that cleared the floor
    pub fn floor_clearance_rate(&self) -> f64 {
        ratio(self.floor_clearances as f64, self.counters.bids as f64)
    }

    /// Sample-size confidence on a log scale
    ///
    /// 0 up to 100 requests, 1.0 from 100,000 requests.
    pub fn confidence(&self) -> f64 {
        let n = self.sample_size().max(1) as f64;
        ((n.log10() - 2.0) / 3.0).clamp(0.0, 1.0)
    }
}
