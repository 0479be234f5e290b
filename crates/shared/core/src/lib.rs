//! Bidroute Core Domain
//!
//! Pure domain types for the bidroute partner-selection system.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! ## Flow
//!
//! ```text
//! raw auction request
//!         │
//!         ▼
//! ClassifiedRequest ──► LookupKey ──► BidderMetricsSnapshot
//!                                             │
//!                                             ▼
//!                                        BidderScore ──► SelectionResult
//! ```

pub mod decisions;
pub mod entities;
pub mod metrics;
pub mod values;

// Re-export commonly used types at crate root
pub use decisions::{
    BidderScore, ScoreComponent, ScoreComponents, SelectedBidder, SelectionReason,
    SelectionResult,
};
pub use entities::{
    AdFormat, AdPosition, AdSize, ClassifiedRequest, ConnectionType, ConsentSnapshot, DeviceType,
    GeneratedIds, LookupKey, PageType,
};
pub use metrics::{BidderMetricsSnapshot, HistoricalPerformance, PerformanceCounters, RealTimeMetrics};
pub use values::{BidderCode, Cpm, Timestamp};
