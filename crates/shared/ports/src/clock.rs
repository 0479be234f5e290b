use bidroute_core::Timestamp;

/// Source of "now" for request timestamps and real-time windows
///
/// Injected everywhere time matters so time-of-day features and window
/// eviction can be driven from tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Identifier for log lines
    fn name(&self) -> &str {
        "Clock"
    }
}
