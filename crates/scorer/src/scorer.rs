use crate::components::{
    bid_rate_score, cpm_score, floor_clearance_score, id_match_score, latency_score,
    recency_score, win_rate_score,
};
use crate::config::ScorerConfig;
use crate::error::Result;
use bidroute_core::{
    BidderCode, BidderMetricsSnapshot, BidderScore, ClassifiedRequest, HistoricalPerformance,
    LookupKey, RealTimeMetrics, ScoreComponents,
};
use bidroute_ports::{HistoricalSource, RealTimeSource};
use futures::future::join_all;
use log::{debug, info, warn};
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;

/// Everything the component formulas read, from either input path
#[derive(Debug, Clone, Default)]
struct ScoringInputs {
    win_rate: f64,
    bid_rate: f64,
    avg_cpm: f64,
    floor_clearance_rate: f64,
    p95_latency_ms: f64,
    recent_win_rate: f64,
    historical_win_rate: f64,
    recent_samples: u64,
    confidence: f64,
    lookup_key: Option<LookupKey>,
    fallback_level: usize,
}

impl ScoringInputs {
    fn from_snapshot(snapshot: &BidderMetricsSnapshot) -> Self {
        Self {
            win_rate: snapshot.win_rate,
            bid_rate: snapshot.bid_rate,
            avg_cpm: snapshot.avg_cpm,
            floor_clearance_rate: snapshot.floor_clearance_rate,
            p95_latency_ms: snapshot.p95_latency_ms,
            recent_win_rate: snapshot.realtime_win_rate,
            historical_win_rate: snapshot.historical_win_rate,
            recent_samples: snapshot.realtime_requests,
            confidence: snapshot.confidence,
            lookup_key: snapshot.lookup_key.clone(),
            fallback_level: snapshot.fallback_level,
        }
    }

    fn from_historical(
        hist: &HistoricalPerformance,
        recent: &RealTimeMetrics,
        lookup_key: LookupKey,
        fallback_level: usize,
    ) -> Self {
        Self {
            win_rate: hist.counters.win_rate(),
            bid_rate: hist.counters.bid_rate(),
            avg_cpm: hist.counters.avg_cpm(),
            floor_clearance_rate: hist.floor_clearance_rate(),
            p95_latency_ms: hist.p95_latency_ms,
            recent_win_rate: recent.counters.win_rate(),
            historical_win_rate: hist.counters.win_rate(),
            recent_samples: recent.sample_size(),
            confidence: hist.confidence(),
            lookup_key: Some(lookup_key),
            fallback_level,
        }
    }
}

/// Weighted multi-component bidder scorer
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct BidderScorer {
    config: ScorerConfig,
    historical: Arc<dyn HistoricalSource>,
    realtime: Option<Arc<dyn RealTimeSource>>,
}

impl BidderScorer {
    /// Fails when the weights are negative or do not sum to 1.0
    pub fn new(config: ScorerConfig, historical: Arc<dyn HistoricalSource>) -> Result<Self> {
        config.validate()?;
        info!(
            "[SCORER] Weights win {} bid {} cpm {} floor {} latency {} recency {} ids {}",
            config.weights.win_rate,
            config.weights.bid_rate,
            config.weights.cpm,
            config.weights.floor_clearance,
            config.weights.latency,
            config.weights.recency,
            config.weights.id_match
        );

        Ok(Self {
            config,
            historical,
            realtime: None,
        })
    }

    /// Source for the recency trend when scoring without a snapshot
    pub fn with_realtime(mut self, realtime: Arc<dyn RealTimeSource>) -> Self {
        self.realtime = Some(realtime);
        self
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score one bidder
    ///
    /// A supplied snapshot is used as-is. Otherwise historical data is read
    /// along the request's key fallback chain, stopping at the first level
    /// with `min_sample_size` samples (the broadest level if none has).
    pub async fn score_bidder(
        &self,
        bidder_code: &str,
        request: &ClassifiedRequest,
        metrics: Option<&BidderMetricsSnapshot>,
    ) -> BidderScore {
        if let Some(snapshot) = metrics {
            return self.score_from_snapshot(bidder_code, request, snapshot);
        }

        let inputs = self.fetch_inputs(bidder_code, request).await;
        self.score_inputs(bidder_code, request, inputs)
    }

    /// Score from an already-blended snapshot, without I/O
    pub fn score_from_snapshot(
        &self,
        bidder_code: &str,
        request: &ClassifiedRequest,
        snapshot: &BidderMetricsSnapshot,
    ) -> BidderScore {
        self.score_inputs(bidder_code, request, ScoringInputs::from_snapshot(snapshot))
    }

    /// Score every candidate concurrently, best first
    ///
    /// Ties keep candidate order.
    pub async fn score_all_bidders(
        &self,
        bidders: &[BidderCode],
        request: &ClassifiedRequest,
    ) -> Vec<BidderScore> {
        let scores = join_all(
            bidders
                .iter()
                .map(|bidder| self.score_bidder(bidder, request, None)),
        )
        .await;
        sort_best_first(scores)
    }

    /// Score a batch of snapshots, best first
    pub fn score_all_from_snapshots(
        &self,
        snapshots: &[BidderMetricsSnapshot],
        request: &ClassifiedRequest,
    ) -> Vec<BidderScore> {
        let scores = snapshots
            .iter()
            .map(|snapshot| self.score_from_snapshot(&snapshot.bidder_code, request, snapshot))
            .collect();
        sort_best_first(scores)
    }

    async fn fetch_inputs(&self, bidder_code: &str, request: &ClassifiedRequest) -> ScoringInputs {
        let levels = LookupKey::from_request(request).fallback_keys();

        let mut chosen = None;
        for (level, key) in levels.iter().enumerate() {
            let hist = match self
                .historical
                .historical_performance(bidder_code, Some(key))
                .await
            {
                Ok(hist) => hist,
                Err(e) => {
                    warn!(
                        "[SCORER] Historical read for {} at {} failed: {}",
                        bidder_code, key, e
                    );
                    HistoricalPerformance::default()
                }
            };

            let sufficient = hist.sample_size() >= self.config.min_sample_size;
            chosen = Some((hist, key.clone(), level));
            if sufficient {
                break;
            }
        }

        let Some((hist, key, level)) = chosen else {
            return ScoringInputs::default();
        };

        let recent = match &self.realtime {
            Some(realtime) => realtime
                .realtime_metrics(bidder_code, Some(&key))
                .await
                .unwrap_or_else(|e| {
                    warn!("[SCORER] Real-time read for {} failed: {}", bidder_code, e);
                    RealTimeMetrics::default()
                }),
            None => RealTimeMetrics::default(),
        };

        ScoringInputs::from_historical(&hist, &recent, key, level)
    }

    fn score_inputs(
        &self,
        bidder_code: &str,
        request: &ClassifiedRequest,
        inputs: ScoringInputs,
    ) -> BidderScore {
        let floor = request.effective_floor().and_then(|floor| floor.to_f64());
        let preferred = self.config.id_preferences.for_bidder(bidder_code);

        let components = ScoreComponents {
            win_rate: win_rate_score(inputs.win_rate),
            bid_rate: bid_rate_score(inputs.bid_rate),
            cpm: cpm_score(inputs.avg_cpm, floor),
            floor_clearance: floor_clearance_score(inputs.floor_clearance_rate),
            latency: latency_score(inputs.p95_latency_ms),
            recency: recency_score(
                inputs.recent_win_rate,
                inputs.historical_win_rate,
                inputs.recent_samples,
                self.config.recency_min_samples,
            ),
            id_match: id_match_score(preferred, request.user_ids.keys().map(String::as_str)),
        };
        let total_score = self.config.weights.combine(&components);

        debug!(
            "[SCORER] {} scored {:.1} (confidence {:.2}, level {})",
            bidder_code, total_score, inputs.confidence, inputs.fallback_level
        );

        BidderScore {
            bidder_code: bidder_code.to_string(),
            total_score,
            components,
            confidence: inputs.confidence.clamp(0.0, 1.0),
            lookup_key_used: inputs.lookup_key,
            fallback_level: inputs.fallback_level,
        }
    }
}

fn sort_best_first(mut scores: Vec<BidderScore>) -> Vec<BidderScore> {
    // sort_by is stable
    scores.sort_by(|a, b| b.cmp_by_score(a));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScorerError;
    use crate::weights::ScoringWeights;
    use bidroute_clock::ManualClock;
    use bidroute_core::{AdFormat, AdSize, DeviceType, PerformanceCounters};
    use bidroute_performance::InMemoryPerformanceStore;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn request() -> ClassifiedRequest {
        let mut request = ClassifiedRequest::at(Utc::now());
        request.country = "US".to_string();
        request.device_type = DeviceType::Mobile;
        request.ad_format = AdFormat::Banner;
        request.ad_sizes = vec![AdSize::new(300, 250)];
        request.publisher_id = "pub-1".to_string();
        request
    }

    fn store() -> Arc<InMemoryPerformanceStore> {
        Arc::new(InMemoryPerformanceStore::new(ManualClock::new(Utc::now())))
    }

    fn snapshot(bidder: &str) -> BidderMetricsSnapshot {
        BidderMetricsSnapshot {
            win_rate: 0.20,
            bid_rate: 0.80,
            avg_cpm: 5.0,
            floor_clearance_rate: 1.0,
            p95_latency_ms: 100.0,
            total_requests: 5_000,
            realtime_requests: 1_000,
            historical_requests: 4_000,
            realtime_win_rate: 0.2,
            historical_win_rate: 0.1,
            confidence: 0.9,
            ..BidderMetricsSnapshot::empty(bidder, None)
        }
    }

    #[test]
    fn test_invalid_weights_fail_construction() {
        let config = ScorerConfig {
            weights: ScoringWeights {
                cpm: 0.5,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = BidderScorer::new(config, store());
        assert!(matches!(result, Err(ScorerError::WeightSum { .. })));
    }

    #[test]
    fn test_perfect_snapshot_scores_full_marks() {
        let scorer = BidderScorer::new(ScorerConfig::default(), store()).unwrap();
        let mut request = request();
        for id_type in ["liveramp", "uid2", "id5"] {
            request.user_ids.insert(id_type.to_string(), "x".to_string());
        }

        let score = scorer.score_from_snapshot("rubicon", &request, &snapshot("rubicon"));

        assert_eq!(score.components.win_rate, 100.0);
        assert_eq!(score.components.bid_rate, 100.0);
        assert_eq!(score.components.cpm, 100.0);
        assert_eq!(score.components.floor_clearance, 100.0);
        assert_eq!(score.components.latency, 100.0);
        assert_eq!(score.components.recency, 100.0);
        assert_eq!(score.components.id_match, 100.0);
        assert!((score.total_score - 100.0).abs() < 1e-9);
        assert_eq!(score.confidence, 0.9);
    }

    #[test]
    fn test_floor_changes_cpm_component() {
        let scorer = BidderScorer::new(ScorerConfig::default(), store()).unwrap();
        let mut request = request();
        request.floor_price = Some(dec!(10.0));

        let score = scorer.score_from_snapshot("rubicon", &request, &snapshot("rubicon"));
        assert_eq!(score.components.cpm, 25.0);
    }

    #[test]
    fn test_request_without_ids_scores_zero_id_match() {
        let scorer = BidderScorer::new(ScorerConfig::default(), store()).unwrap();
        let score = scorer.score_from_snapshot("rubicon", &request(), &snapshot("rubicon"));
        assert_eq!(score.components.id_match, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_bidder_degrades_without_error() {
        let scorer = BidderScorer::new(ScorerConfig::default(), store()).unwrap();
        let score = scorer.score_bidder("nobody", &request(), None).await;

        assert_eq!(score.confidence, 0.0);
        assert_eq!(score.components.win_rate, 0.0);
        assert_eq!(score.components.recency, 50.0);
        assert_eq!(score.fallback_level, 3);
        assert!((0.0..=100.0).contains(&score.total_score));
    }

    #[tokio::test]
    async fn test_fallback_walk_uses_historical_confidence() {
        let source = store();
        let exact = LookupKey::from_request(&request());
        source.seed_historical(
            "appnexus",
            Some(exact.without_ad_size()),
            HistoricalPerformance {
                counters: PerformanceCounters {
                    requests: 10_000,
                    bids: 5_000,
                    wins: 500,
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let scorer = BidderScorer::new(ScorerConfig::default(), source).unwrap();
        let score = scorer.score_bidder("appnexus", &request(), None).await;

        assert_eq!(score.fallback_level, 1);
        assert_eq!(score.lookup_key_used, Some(exact.without_ad_size()));
        // log10(10_000) = 4 -> (4 - 2) / 3
        assert!((score.confidence - 2.0 / 3.0).abs() < 1e-9);
        assert!((score.components.win_rate - 50.0).abs() < 1e-9);
        assert!((score.components.bid_rate - 62.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_score_all_sorted_descending() {
        let source = store();
        for (bidder, wins) in [("low", 5), ("high", 200), ("mid", 60)] {
            source.seed_historical(
                bidder,
                Some(LookupKey::from_request(&request())),
                HistoricalPerformance {
                    counters: PerformanceCounters {
                        requests: 1_000,
                        bids: 1_000,
                        wins,
                        ..Default::default()
                    },
                    ..Default::default()
                },
            );
        }

        let scorer = BidderScorer::new(ScorerConfig::default(), source).unwrap();
        let bidders: Vec<String> = ["low", "high", "mid"].iter().map(|s| s.to_string()).collect();
        let scores = scorer.score_all_bidders(&bidders, &request()).await;

        let order: Vec<&str> = scores.iter().map(|s| s.bidder_code.as_str()).collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
        assert!(scores.windows(2).all(|w| w[0].total_score >= w[1].total_score));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let scorer = BidderScorer::new(ScorerConfig::default(), store()).unwrap();
        let snapshots = vec![snapshot("b"), snapshot("a"), snapshot("c")];
        let scores = scorer.score_all_from_snapshots(&snapshots, &request());

        let order: Vec<&str> = scores.iter().map(|s| s.bidder_code.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }
}
