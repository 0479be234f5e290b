//! In-memory performance store
//!
//! Every recorded outcome is rolled up into each fallback level of its
//! lookup key and into a bidder-wide aggregate, so reads never have to
//! aggregate at query time. Two tables are kept per slice:
//!
//! - a lifetime table (the "historical" source)
//! - per-minute buckets, trimmed to the real-time window (the "real-time" source)

use async_trait::async_trait;
use bidroute_core::{
    BidderCode, HistoricalPerformance, LookupKey, PerformanceCounters, RealTimeMetrics, Timestamp,
};
use bidroute_ports::{
    AnchorProvider, Clock, HistoricalSource, OutcomeRecorder, PortResult, RealTimeSource,
    RequestOutcome, WinOutcome,
};
use chrono::Duration;
use dashmap::DashMap;
use log::debug;
use priority_queue::PriorityQueue;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Latency samples kept per slice for the lifetime p95
const MAX_LATENCY_SAMPLES: usize = 1024;

/// (bidder, key) - `None` is the bidder-wide aggregate
type SliceId = (BidderCode, Option<LookupKey>);

#[derive(Debug, Default)]
struct LifetimeEntry {
    perf: HistoricalPerformance,
    latencies: VecDeque<u64>,
}

#[derive(Debug)]
struct MinuteBucket {
    minute: i64,
    counters: PerformanceCounters,
    latencies: Vec<u64>,
    /// p95 supplied when the bucket was seeded rather than recorded
    reported_p95: Option<f64>,
}

impl MinuteBucket {
    fn new(minute: i64) -> Self {
        Self {
            minute,
            counters: PerformanceCounters::default(),
            latencies: Vec::new(),
            reported_p95: None,
        }
    }
}

/// Deterministic, process-local performance store
pub struct InMemoryPerformanceStore {
    clock: Arc<dyn Clock>,
    realtime_window: Duration,
    lifetime: DashMap<SliceId, LifetimeEntry>,
    realtime: DashMap<SliceId, VecDeque<MinuteBucket>>,
    /// publisher -> bidder -> summed win CPM
    publisher_revenue: DashMap<String, HashMap<BidderCode, Decimal>>,
}

impl InMemoryPerformanceStore {
    /// Store with a 15 minute real-time window
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_window(clock, Duration::minutes(15))
    }

    pub fn with_window(clock: Arc<dyn Clock>, realtime_window: Duration) -> Self {
        Self {
            clock,
            realtime_window,
            lifetime: DashMap::new(),
            realtime: DashMap::new(),
            publisher_revenue: DashMap::new(),
        }
    }

    /// Replace the lifetime data for one slice
    pub fn seed_historical(
        &self,
        bidder_code: &str,
        key: Option<LookupKey>,
        perf: HistoricalPerformance,
    ) {
        self.lifetime.insert(
            (bidder_code.to_string(), key),
            LifetimeEntry {
                perf,
                latencies: VecDeque::new(),
            },
        );
    }

    /// Replace the real-time data for one slice with a single current bucket
    pub fn seed_realtime(&self, bidder_code: &str, key: Option<LookupKey>, metrics: RealTimeMetrics) {
        let mut bucket = MinuteBucket::new(minute_of(self.clock.now()));
        bucket.counters = metrics.counters;
        bucket.reported_p95 = Some(metrics.p95_latency_ms);

        self.realtime
            .insert((bidder_code.to_string(), key), VecDeque::from([bucket]));
    }

    /// Credit revenue to a bidder for a publisher
    pub fn seed_revenue(&self, publisher_id: &str, bidder_code: &str, revenue: Decimal) {
        *self
            .publisher_revenue
            .entry(publisher_id.to_string())
            .or_default()
            .entry(bidder_code.to_string())
            .or_insert(Decimal::ZERO) += revenue;
    }

    fn slices(bidder_code: &str, key: &LookupKey) -> Vec<SliceId> {
        let mut slices: Vec<SliceId> = key
            .fallback_keys()
            .into_iter()
            .map(|k| (bidder_code.to_string(), Some(k)))
            .collect();
        slices.push((bidder_code.to_string(), None));
        slices
    }

    fn update_slices(
        &self,
        bidder_code: &str,
        key: &LookupKey,
        timestamp: Timestamp,
        apply: impl Fn(&mut PerformanceCounters, &mut Vec<u64>, &mut HistoricalPerformance),
    ) {
        let minute = minute_of(timestamp);
        let oldest = minute_of(self.clock.now() - self.realtime_window);

        for slice in Self::slices(bidder_code, key) {
            {
                let mut entry = self.lifetime.entry(slice.clone()).or_default();
                let mut samples = Vec::new();
                let LifetimeEntry { perf, latencies } = &mut *entry;
                let mut counters = std::mem::take(&mut perf.counters);
                apply(&mut counters, &mut samples, perf);
                perf.counters = counters;
                for sample in samples {
                    if latencies.len() == MAX_LATENCY_SAMPLES {
                        latencies.pop_front();
                    }
                    latencies.push_back(sample);
                }
            }

            // Buckets stay sorted by minute so the front trim is enough
            let mut buckets = self.realtime.entry(slice).or_default();
            while buckets.front().is_some_and(|b| b.minute < oldest) {
                buckets.pop_front();
            }
            if minute < oldest {
                continue;
            }

            let index = buckets
                .iter()
                .position(|b| b.minute >= minute)
                .unwrap_or(buckets.len());
            if buckets.get(index).map(|b| b.minute) != Some(minute) {
                buckets.insert(index, MinuteBucket::new(minute));
            }
            if let Some(bucket) = buckets.get_mut(index) {
                let mut scratch = HistoricalPerformance::default();
                apply(&mut bucket.counters, &mut bucket.latencies, &mut scratch);
            }
        }
    }
}

fn minute_of(timestamp: Timestamp) -> i64 {
    timestamp.timestamp().div_euclid(60)
}

/// Nearest-rank p95 of the samples, 0 when empty
fn p95(samples: &mut [u64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.sort_unstable();
    let rank = ((samples.len() as f64) * 0.95).ceil() as usize;
    samples[rank.saturating_sub(1).min(samples.len() - 1)] as f64
}

#[async_trait]
impl RealTimeSource for InMemoryPerformanceStore {
    async fn realtime_metrics(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> PortResult<RealTimeMetrics> {
        let slice = (bidder_code.to_string(), key.cloned());
        let oldest = minute_of(self.clock.now() - self.realtime_window);

        let Some(buckets) = self.realtime.get(&slice) else {
            return Ok(RealTimeMetrics::default());
        };

        let mut metrics = RealTimeMetrics::default();
        let mut latencies = Vec::new();
        let mut reported_p95: f64 = 0.0;
        for bucket in buckets.iter().filter(|b| b.minute >= oldest) {
            metrics.counters.merge(&bucket.counters);
            latencies.extend_from_slice(&bucket.latencies);
            if let Some(p) = bucket.reported_p95 {
                reported_p95 = reported_p95.max(p);
            }
        }
        metrics.p95_latency_ms = if latencies.is_empty() {
            reported_p95
        } else {
            p95(&mut latencies)
        };

        Ok(metrics)
    }
}

#[async_trait]
impl HistoricalSource for InMemoryPerformanceStore {
    async fn historical_performance(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> PortResult<HistoricalPerformance> {
        let slice = (bidder_code.to_string(), key.cloned());

        let Some(entry) = self.lifetime.get(&slice) else {
            return Ok(HistoricalPerformance::default());
        };

        let mut perf = entry.perf.clone();
        if !entry.latencies.is_empty() {
            let mut samples: Vec<u64> = entry.latencies.iter().copied().collect();
            perf.p95_latency_ms = p95(&mut samples);
        }
        Ok(perf)
    }
}

#[async_trait]
impl OutcomeRecorder for InMemoryPerformanceStore {
    async fn record_request(&self, outcome: &RequestOutcome) -> PortResult<()> {
        let cleared = outcome.cleared_floor();

        self.update_slices(
            &outcome.bidder_code,
            &outcome.key,
            outcome.timestamp,
            |counters, latencies, perf| {
                counters.requests += 1;
                counters.total_latency_ms += outcome.latency_ms;
                latencies.push(outcome.latency_ms);
                if outcome.timed_out {
                    counters.timeouts += 1;
                }
                if outcome.errored {
                    counters.errors += 1;
                }
                if let Some(bid) = outcome.bid_cpm {
                    counters.bids += 1;
                    counters.total_bid_value += bid;
                    if cleared {
                        perf.floor_clearances += 1;
                    }
                }
            },
        );

        debug!(
            "[PERF] Recorded request for {} at {}",
            outcome.bidder_code, outcome.key
        );
        Ok(())
    }

    async fn record_win(&self, outcome: &WinOutcome) -> PortResult<()> {
        self.update_slices(
            &outcome.bidder_code,
            &outcome.key,
            outcome.timestamp,
            |counters, _, _| {
                counters.wins += 1;
                counters.total_win_value += outcome.win_cpm;
            },
        );

        if let Some(publisher_id) = outcome.key.publisher_id() {
            self.seed_revenue(publisher_id, &outcome.bidder_code, outcome.win_cpm);
        }

        debug!(
            "[PERF] Recorded win for {} at {} ({})",
            outcome.bidder_code, outcome.key, outcome.win_cpm
        );
        Ok(())
    }
}

#[async_trait]
impl AnchorProvider for InMemoryPerformanceStore {
    async fn top_bidders_by_revenue(
        &self,
        publisher_id: &str,
        limit: usize,
    ) -> PortResult<Vec<BidderCode>> {
        let Some(revenue) = self.publisher_revenue.get(publisher_id) else {
            return Ok(Vec::new());
        };

        // Ties break alphabetically so the ranking is stable
        let mut queue = PriorityQueue::new();
        for (bidder, total) in revenue.iter() {
            queue.push(bidder.clone(), (*total, Reverse(bidder.clone())));
        }

        let mut top = Vec::with_capacity(limit.min(queue.len()));
        while top.len() < limit {
            match queue.pop() {
                Some((bidder, _)) => top.push(bidder),
                None => break,
            }
        }
        Ok(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidroute_clock::ManualClock;
    use bidroute_core::{AdFormat, DeviceType};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn key() -> LookupKey {
        LookupKey::new(
            "US",
            DeviceType::Mobile,
            AdFormat::Banner,
            Some("300x250".to_string()),
            Some("pub-1".to_string()),
        )
    }

    fn request(clock: &ManualClock, bidder: &str, bid: Option<Decimal>, latency_ms: u64) -> RequestOutcome {
        RequestOutcome {
            bidder_code: bidder.to_string(),
            key: key(),
            bid_cpm: bid,
            floor_price: Some(dec!(1.00)),
            latency_ms,
            timed_out: false,
            errored: false,
            timestamp: clock.now(),
        }
    }

    fn win(clock: &ManualClock, bidder: &str, cpm: Decimal) -> WinOutcome {
        WinOutcome {
            bidder_code: bidder.to_string(),
            key: key(),
            win_cpm: cpm,
            timestamp: clock.now(),
        }
    }

    #[tokio::test]
    async fn test_outcomes_roll_up_into_every_level() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let store = InMemoryPerformanceStore::new(clock.clone());

        store
            .record_request(&request(&clock, "rubicon", Some(dec!(2.00)), 80))
            .await
            .unwrap();
        store
            .record_request(&request(&clock, "rubicon", None, 120))
            .await
            .unwrap();
        store.record_win(&win(&clock, "rubicon", dec!(1.50))).await.unwrap();

        for level in key().fallback_keys() {
            let perf = store
                .historical_performance("rubicon", Some(&level))
                .await
                .unwrap();
            assert_eq!(perf.counters.requests, 2);
            assert_eq!(perf.counters.bids, 1);
            assert_eq!(perf.counters.wins, 1);
            assert_eq!(perf.floor_clearances, 1);
        }

        let global = store.historical_performance("rubicon", None).await.unwrap();
        assert_eq!(global.counters.requests, 2);
        assert_eq!(global.counters.total_win_value, dec!(1.50));
    }

    #[tokio::test]
    async fn test_realtime_window_expires_old_buckets() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let store = InMemoryPerformanceStore::with_window(clock.clone(), Duration::minutes(5));

        store
            .record_request(&request(&clock, "openx", Some(dec!(1.00)), 50))
            .await
            .unwrap();
        let rt = store.realtime_metrics("openx", Some(&key())).await.unwrap();
        assert_eq!(rt.sample_size(), 1);

        clock.advance(Duration::minutes(10));
        let rt = store.realtime_metrics("openx", Some(&key())).await.unwrap();
        assert_eq!(rt.sample_size(), 0);

        // Lifetime data is unaffected
        let hist = store
            .historical_performance("openx", Some(&key()))
            .await
            .unwrap();
        assert_eq!(hist.sample_size(), 1);
    }

    #[tokio::test]
    async fn test_late_outcomes_keep_buckets_ordered() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 10, 0).unwrap());
        let store = InMemoryPerformanceStore::with_window(clock.clone(), Duration::minutes(5));

        let on_time = request(&clock, "openx", Some(dec!(1.00)), 50);
        let late = RequestOutcome {
            timestamp: on_time.timestamp - Duration::minutes(3),
            ..on_time.clone()
        };
        let too_late = RequestOutcome {
            timestamp: on_time.timestamp - Duration::minutes(30),
            ..on_time.clone()
        };
        for outcome in [&on_time, &late, &too_late] {
            store.record_request(outcome).await.unwrap();
        }

        let slice = ("openx".to_string(), Some(key()));
        let minutes: Vec<i64> = store
            .realtime
            .get(&slice)
            .unwrap()
            .iter()
            .map(|b| b.minute)
            .collect();
        assert_eq!(minutes, vec![minute_of(late.timestamp), minute_of(on_time.timestamp)]);

        let rt = store.realtime_metrics("openx", Some(&key())).await.unwrap();
        assert_eq!(rt.sample_size(), 2);
        let hist = store
            .historical_performance("openx", Some(&key()))
            .await
            .unwrap();
        assert_eq!(hist.sample_size(), 3);

        // The late bucket ages out first and is trimmed on the next write
        clock.advance(Duration::minutes(3));
        store
            .record_request(&request(&clock, "openx", None, 40))
            .await
            .unwrap();
        let minutes: Vec<i64> = store
            .realtime
            .get(&slice)
            .unwrap()
            .iter()
            .map(|b| b.minute)
            .collect();
        assert_eq!(minutes, vec![minute_of(on_time.timestamp), minute_of(clock.now())]);
        let rt = store.realtime_metrics("openx", Some(&key())).await.unwrap();
        assert_eq!(rt.sample_size(), 2);
    }

    #[tokio::test]
    async fn test_p95_latency_from_samples() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let store = InMemoryPerformanceStore::new(clock.clone());

        for latency in 1..=100 {
            store
                .record_request(&request(&clock, "ix", None, latency))
                .await
                .unwrap();
        }

        let hist = store.historical_performance("ix", None).await.unwrap();
        assert_eq!(hist.p95_latency_ms, 95.0);
        let rt = store.realtime_metrics("ix", None).await.unwrap();
        assert_eq!(rt.p95_latency_ms, 95.0);
    }

    #[tokio::test]
    async fn test_unknown_slices_are_empty() {
        let clock = ManualClock::new(Utc::now());
        let store = InMemoryPerformanceStore::new(clock);

        let hist = store.historical_performance("nobody", Some(&key())).await.unwrap();
        let rt = store.realtime_metrics("nobody", None).await.unwrap();
        assert_eq!(hist.sample_size(), 0);
        assert_eq!(rt.sample_size(), 0);
    }

    #[tokio::test]
    async fn test_top_bidders_by_revenue() {
        let clock = ManualClock::new(Utc::now());
        let store = InMemoryPerformanceStore::new(clock.clone());

        store.record_win(&win(&clock, "rubicon", dec!(5.00))).await.unwrap();
        store.record_win(&win(&clock, "appnexus", dec!(9.00))).await.unwrap();
        store.record_win(&win(&clock, "pubmatic", dec!(5.00))).await.unwrap();
        store.record_win(&win(&clock, "sovrn", dec!(0.50))).await.unwrap();

        let top = store.top_bidders_by_revenue("pub-1", 3).await.unwrap();
        assert_eq!(top, vec!["appnexus", "pubmatic", "rubicon"]);

        let none = store.top_bidders_by_revenue("pub-2", 3).await.unwrap();
        assert!(none.is_empty());
    }
}
