//! Bidroute Performance Collaborators
//!
//! Implementations of the performance-data and anchor ports:
//!
//! - [`InMemoryPerformanceStore`]: deterministic store fed by the
//!   [`OutcomeRecorder`](bidroute_ports::OutcomeRecorder) write side. Serves
//!   tests, dry runs and single-node deployments.
//! - [`HttpPerformanceClient`]: JSON client for a remote metrics service.
//! - [`CachedSource`]: TTL cache in front of either of the above.
//! - [`StaticAnchorProvider`]: fixed per-publisher anchor lists.
//!
//! ```text
//!  event pipeline ──record──► InMemoryPerformanceStore ◄──read── MetricsStore
//!                                      │                            │
//!                              (lifetime table)               CachedSource
//!                              (per-minute buckets)                 │
//!                                                          HttpPerformanceClient
//! ```

pub mod anchors;
pub mod cache;
pub mod http;
pub mod in_memory;

pub use anchors::StaticAnchorProvider;
pub use cache::CachedSource;
pub use http::{HttpClientConfig, HttpPerformanceClient};
pub use in_memory::InMemoryPerformanceStore;
