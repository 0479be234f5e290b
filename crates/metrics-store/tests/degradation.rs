use async_trait::async_trait;
use bidroute_core::{HistoricalPerformance, LookupKey, PerformanceCounters, RealTimeMetrics};
use bidroute_metrics_store::{MetricsStore, MetricsStoreConfig};
use bidroute_ports::{HistoricalSource, PortError, PortResult, RealTimeSource};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Source answering after a per-bidder delay
struct DelayedSource {
    delays: HashMap<String, Duration>,
    requests: u64,
}

impl DelayedSource {
    fn new(delays: &[(&str, u64)], requests: u64) -> Arc<Self> {
        Arc::new(Self {
            delays: delays
                .iter()
                .map(|(bidder, ms)| (bidder.to_string(), Duration::from_millis(*ms)))
                .collect(),
            requests,
        })
    }

    async fn wait(&self, bidder_code: &str) {
        if let Some(delay) = self.delays.get(bidder_code) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl RealTimeSource for DelayedSource {
    async fn realtime_metrics(
        &self,
        bidder_code: &str,
        _key: Option<&LookupKey>,
    ) -> PortResult<RealTimeMetrics> {
        self.wait(bidder_code).await;
        Ok(RealTimeMetrics {
            counters: PerformanceCounters {
                requests: self.requests,
                bids: self.requests / 2,
                wins: self.requests / 10,
                ..Default::default()
            },
            p95_latency_ms: 120.0,
        })
    }
}

#[async_trait]
impl HistoricalSource for DelayedSource {
    async fn historical_performance(
        &self,
        bidder_code: &str,
        _key: Option<&LookupKey>,
    ) -> PortResult<HistoricalPerformance> {
        self.wait(bidder_code).await;
        Ok(HistoricalPerformance {
            counters: PerformanceCounters {
                requests: self.requests,
                bids: self.requests / 2,
                wins: self.requests / 20,
                ..Default::default()
            },
            ..Default::default()
        })
    }
}

struct FailingSource;

#[async_trait]
impl HistoricalSource for FailingSource {
    async fn historical_performance(
        &self,
        _bidder_code: &str,
        _key: Option<&LookupKey>,
    ) -> PortResult<HistoricalPerformance> {
        Err(PortError::Unavailable("warehouse offline".to_string()))
    }
}

fn bidders(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_slow_source_degrades_to_no_data() {
    let _ = env_logger::try_init();

    let source = DelayedSource::new(&[("slow", 500)], 1_000);
    let store = MetricsStore::new(source.clone(), source, MetricsStoreConfig::default()).unwrap();

    let snapshots = store
        .get_metrics_batch(&bidders(&["fast", "slow"]), None)
        .await;

    assert_eq!(snapshots[0].bidder_code, "fast");
    assert_eq!(snapshots[0].total_requests, 2_000);
    assert!(snapshots[0].confidence > 0.0);

    assert_eq!(snapshots[1].bidder_code, "slow");
    assert_eq!(snapshots[1].total_requests, 0);
    assert_eq!(snapshots[1].confidence, 0.0);
}

#[tokio::test]
async fn test_failed_historical_read_uses_realtime_only() {
    let _ = env_logger::try_init();

    let realtime = DelayedSource::new(&[], 200);
    let store = MetricsStore::new(
        realtime,
        Arc::new(FailingSource),
        MetricsStoreConfig::default(),
    )
    .unwrap();

    let snapshot = store.get_metrics("rubicon", None).await;

    assert_eq!(snapshot.historical_requests, 0);
    assert_eq!(snapshot.realtime_requests, 200);
    assert!((snapshot.win_rate - 0.2).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_returns_partial_results() {
    let _ = env_logger::try_init();

    let config = MetricsStoreConfig {
        fetch_timeout_ms: 1_000,
        ..Default::default()
    };
    let source = DelayedSource::new(&[("a", 5), ("b", 300), ("c", 10)], 500);
    let store = MetricsStore::new(source.clone(), source, config).unwrap();

    let snapshots = store
        .get_metrics_batch_until(
            &bidders(&["a", "b", "c"]),
            None,
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await;

    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[0].total_requests, 1_000);
    assert_eq!(snapshots[1].bidder_code, "b");
    assert_eq!(snapshots[1].total_requests, 0);
    assert_eq!(snapshots[1].confidence, 0.0);
    assert_eq!(snapshots[2].total_requests, 1_000);
}
