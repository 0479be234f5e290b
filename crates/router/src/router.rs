use crate::config::{ConfigError, RouterConfig};
use bidroute_classifier::{BidRequest, RequestClassifier, TcfConsentParser};
use bidroute_core::{BidderCode, BidderScore, ClassifiedRequest, SelectionResult};
use bidroute_metrics_store::MetricsStore;
use bidroute_performance::InMemoryPerformanceStore;
use bidroute_ports::{AnchorProvider, Clock, HistoricalSource, RealTimeSource};
use bidroute_scorer::BidderScorer;
use bidroute_selector::PartnerSelector;
use log::{debug, info};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Collaborators the router reads from
pub struct RouterSources {
    pub realtime: Arc<dyn RealTimeSource>,
    pub historical: Arc<dyn HistoricalSource>,
    /// `None` uses the built-in default anchors
    pub anchors: Option<Arc<dyn AnchorProvider>>,
}

impl RouterSources {
    /// Every port served by one in-memory store
    pub fn in_memory(store: Arc<InMemoryPerformanceStore>) -> Self {
        Self {
            realtime: store.clone(),
            historical: store.clone(),
            anchors: Some(store),
        }
    }
}

/// Everything decided for one auction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    pub request: ClassifiedRequest,
    /// Best first
    pub scores: Vec<BidderScore>,
    pub selection: SelectionResult,
}

/// Classify, fetch metrics, score and select in one call
///
/// Shared across concurrent requests: the only per-request mutable state,
/// the selector's random source, is forked for each call.
pub struct BidRouter {
    classifier: RequestClassifier,
    metrics: MetricsStore,
    scorer: BidderScorer,
    selector: PartnerSelector,
    base_seed: Option<u64>,
}

impl BidRouter {
    pub fn new(
        config: RouterConfig,
        clock: Arc<dyn Clock>,
        sources: RouterSources,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let classifier = RequestClassifier::new(clock, Arc::new(TcfConsentParser::new()));
        let metrics = MetricsStore::new(
            sources.realtime.clone(),
            sources.historical.clone(),
            config.metrics,
        )?;
        let scorer =
            BidderScorer::new(config.scorer, sources.historical)?.with_realtime(sources.realtime);
        let mut selector = PartnerSelector::new(config.selector)?;
        if let Some(anchors) = sources.anchors {
            selector = selector.with_anchor_provider(anchors);
        }

        info!(
            "[ROUTER] Ready ({})",
            match config.base_seed {
                Some(seed) => format!("reproducible, base seed {}", seed),
                None => "entropy-seeded".to_string(),
            }
        );

        Ok(Self {
            classifier,
            metrics,
            scorer,
            selector,
            base_seed: config.base_seed,
        })
    }

    pub async fn route(&self, raw: &BidRequest, candidates: &[BidderCode]) -> RoutingDecision {
        self.route_until(raw, candidates, std::future::pending()).await
    }

    /// Route, giving up on outstanding metrics reads once `cancel` resolves
    ///
    /// Bidders whose metrics had not arrived are scored with zero samples.
    pub async fn route_until<F>(
        &self,
        raw: &BidRequest,
        candidates: &[BidderCode],
        cancel: F,
    ) -> RoutingDecision
    where
        F: Future<Output = ()>,
    {
        let request = self.classifier.classify(raw);

        let snapshots = self
            .metrics
            .get_metrics_batch_until(candidates, Some(&request), cancel)
            .await;
        let scores = self.scorer.score_all_from_snapshots(&snapshots, &request);

        let seed = self
            .base_seed
            .map(|base| request_seed(base, &request.request_id));
        let selection = self
            .selector
            .fork(seed)
            .select_partners(&scores, &request)
            .await;

        debug!(
            "[ROUTER] {} -> {:?}",
            request.request_id,
            selection.selected_bidder_codes()
        );

        RoutingDecision {
            request,
            scores,
            selection,
        }
    }
}

fn request_seed(base_seed: u64, request_id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    request_id.hash(&mut hasher);
    base_seed ^ hasher.finish()
}
