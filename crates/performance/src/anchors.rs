use async_trait::async_trait;
use bidroute_core::BidderCode;
use bidroute_ports::{AnchorProvider, DEFAULT_ANCHORS, PortResult};
use std::collections::HashMap;

/// Anchor provider backed by fixed lists
///
/// Publishers without an explicit list get the default anchors.
#[derive(Debug, Clone)]
pub struct StaticAnchorProvider {
    by_publisher: HashMap<String, Vec<BidderCode>>,
    default: Vec<BidderCode>,
}

impl StaticAnchorProvider {
    pub fn new(default: Vec<BidderCode>) -> Self {
        Self {
            by_publisher: HashMap::new(),
            default,
        }
    }

    pub fn with_publisher(mut self, publisher_id: &str, anchors: Vec<BidderCode>) -> Self {
        self.by_publisher.insert(publisher_id.to_string(), anchors);
        self
    }
}

impl Default for StaticAnchorProvider {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHORS.iter().map(|s| s.to_string()).collect())
    }
}

#[async_trait]
impl AnchorProvider for StaticAnchorProvider {
    async fn top_bidders_by_revenue(
        &self,
        publisher_id: &str,
        limit: usize,
    ) -> PortResult<Vec<BidderCode>> {
        let anchors = self.by_publisher.get(publisher_id).unwrap_or(&self.default);
        Ok(anchors.iter().take(limit).cloned().collect())
    }
}
