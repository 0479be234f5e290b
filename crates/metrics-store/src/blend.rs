//! Real-time / historical blending

use crate::config::MetricsStoreConfig;
use bidroute_core::{BidderMetricsSnapshot, HistoricalPerformance, LookupKey, RealTimeMetrics};

/// Merge the two windows into one snapshot
///
/// A source with zero samples drops out and the remaining weight is
/// renormalized to 1.0. Rates, CPM and latencies are weighted sums;
/// p95 latency is blended the same way, which approximates rather than
/// merges the percentile. Floor clearance only exists on the historical
/// side. Timeout and error rates only carry the real-time share, since
/// stale reliability problems are less actionable.
pub fn blend(
    bidder_code: &str,
    realtime: &RealTimeMetrics,
    historical: &HistoricalPerformance,
    config: &MetricsStoreConfig,
    lookup_key: Option<LookupKey>,
    fallback_level: usize,
) -> BidderMetricsSnapshot {
    let rt_weight = if realtime.sample_size() > 0 {
        config.realtime_weight
    } else {
        0.0
    };
    let hist_weight = if historical.sample_size() > 0 {
        config.historical_weight
    } else {
        0.0
    };

    let weight_sum = rt_weight + hist_weight;
    if weight_sum <= 0.0 {
        let mut empty = BidderMetricsSnapshot::empty(bidder_code, lookup_key);
        empty.fallback_level = fallback_level;
        return empty;
    }
    let rt_weight = rt_weight / weight_sum;
    let hist_weight = hist_weight / weight_sum;

    let rt = &realtime.counters;
    let hist = &historical.counters;
    let weighted = |rt_value: f64, hist_value: f64| rt_weight * rt_value + hist_weight * hist_value;

    let total_requests = realtime.sample_size() + historical.sample_size();

    BidderMetricsSnapshot {
        bidder_code: bidder_code.to_string(),
        win_rate: weighted(rt.win_rate(), hist.win_rate()),
        bid_rate: weighted(rt.bid_rate(), hist.bid_rate()),
        avg_cpm: weighted(rt.avg_cpm(), hist.avg_cpm()),
        floor_clearance_rate: historical.floor_clearance_rate(),
        avg_latency_ms: weighted(rt.avg_latency_ms(), hist.avg_latency_ms()),
        p95_latency_ms: weighted(realtime.p95_latency_ms, historical.p95_latency_ms),
        total_requests,
        realtime_requests: realtime.sample_size(),
        historical_requests: historical.sample_size(),
        timeout_rate: rt.timeout_rate() * rt_weight,
        error_rate: rt.error_rate() * rt_weight,
        realtime_win_rate: rt.win_rate(),
        historical_win_rate: hist.win_rate(),
        confidence: BidderMetricsSnapshot::confidence_for(total_requests),
        lookup_key,
        fallback_level,
    }
}
