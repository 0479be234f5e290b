//! Performance data as read from the backing sources and as seen by the scorer

mod counters;
mod snapshot;

pub use counters::{HistoricalPerformance, PerformanceCounters, RealTimeMetrics};
pub use snapshot::BidderMetricsSnapshot;

/// Ratio with a zero denominator defined as 0.0
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
