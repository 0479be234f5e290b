//! Bidroute Router
//!
//! Wires the decision core together for one auction request:
//!
//! ```text
//!   raw OpenRTB request
//!          │
//!          ▼
//!   RequestClassifier ──► ClassifiedRequest
//!                               │
//!          candidates ──► MetricsStore (concurrent, per-read timeout)
//!                               │
//!                               ▼
//!                      BidderScorer (snapshots, best first)
//!                               │
//!                               ▼
//!                      PartnerSelector (forked per request)
//!                               │
//!                               ▼
//!                        RoutingDecision
//! ```
//!
//! Configuration is one JSON document ([`RouterConfig`]); an embedded
//! default is available through [`load_default_config`]. Invalid weights or
//! selector settings are rejected when the router is built.

pub mod config;
pub mod router;

pub use config::{ConfigError, RouterConfig, load_config, load_config_from_str, load_default_config};
pub use router::{BidRouter, RouterSources, RoutingDecision};
