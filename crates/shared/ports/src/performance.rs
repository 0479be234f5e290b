use async_trait::async_trait;
use bidroute_core::{BidderCode, Cpm, HistoricalPerformance, LookupKey, RealTimeMetrics, Timestamp};
use serde::{Deserialize, Serialize};

use crate::PortResult;

/// Short-window performance source
///
/// `key = None` asks for the bidder-wide aggregate.
#[async_trait]
pub trait RealTimeSource: Send + Sync {
    async fn realtime_metrics(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> PortResult<RealTimeMetrics>;
}

/// Long-window performance source
///
/// `key = None` asks for the bidder-wide aggregate.
#[async_trait]
pub trait HistoricalSource: Send + Sync {
    async fn historical_performance(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> PortResult<HistoricalPerformance>;
}

/// Write side of the performance stores
///
/// Only the event-ingestion pipeline calls this, never the selection path.
#[async_trait]
pub trait OutcomeRecorder: Send + Sync {
    async fn record_request(&self, outcome: &RequestOutcome) -> PortResult<()>;

    async fn record_win(&self, outcome: &WinOutcome) -> PortResult<()>;
}

/// A bidder's response (or lack of one) to a bid request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub bidder_code: BidderCode,
    pub key: LookupKey,
    /// Bid CPM, `None` for a no-bid
    pub bid_cpm: Option<Cpm>,
    pub floor_price: Option<Cpm>,
    pub latency_ms: u64,
    pub timed_out: bool,
    pub errored: bool,
    pub timestamp: Timestamp,
}

impl RequestOutcome {
    /// Whether the bid met the floor (a bid with no floor always clears)
    pub fn cleared_floor(&self) -> bool {
        match (self.bid_cpm, self.floor_price) {
            (Some(bid), Some(floor)) => bid >= floor,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// An auction won by a bidder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinOutcome {
    pub bidder_code: BidderCode,
    pub key: LookupKey,
    pub win_cpm: Cpm,
    pub timestamp: Timestamp,
}
