//! Bidroute Metrics Store
//!
//! Combines a short-window ("real-time") and a long-window ("historical")
//! performance source into one [`BidderMetricsSnapshot`] per bidder.
//!
//! ## Read path
//!
//! ```text
//! ClassifiedRequest ──► LookupKey::fallback_keys()
//!                              │  (all levels fetched concurrently,
//!                              │   each read under a timeout)
//!                 ┌────────────┴────────────┐
//!          RealTimeSource            HistoricalSource
//!                 └────────────┬────────────┘
//!                              ▼
//!       first level with >= min_sample_size samples (else broadest)
//!                              │
//!                              ▼
//!                  blend (0.6 / 0.4, renormalized)
//!                              │
//!                              ▼
//!                    BidderMetricsSnapshot
//! ```
//!
//! Failed or timed-out reads degrade to zero samples; nothing on this path
//! returns an error.
//!
//! [`BidderMetricsSnapshot`]: bidroute_core::BidderMetricsSnapshot

pub mod blend;
pub mod config;
pub mod error;
pub mod store;

pub use blend::blend;
pub use config::MetricsStoreConfig;
pub use error::MetricsConfigError;
pub use store::MetricsStore;
