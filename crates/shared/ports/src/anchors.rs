use async_trait::async_trait;
use bidroute_core::BidderCode;

use crate::PortResult;

/// Anchors used when no provider is configured
pub const DEFAULT_ANCHORS: [&str; 3] = ["rubicon", "appnexus", "pubmatic"];

/// Source of always-invited partners for a publisher
#[async_trait]
pub trait AnchorProvider: Send + Sync {
    /// Top historical revenue earners for the publisher, best first
    async fn top_bidders_by_revenue(
        &self,
        publisher_id: &str,
        limit: usize,
    ) -> PortResult<Vec<BidderCode>>;
}
