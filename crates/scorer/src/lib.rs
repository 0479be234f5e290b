//! Bidroute Bidder Scorer
//!
//! Scores each candidate bidder for a classified request from seven
//! components, each in [0, 100], combined with configurable weights.
//!
//! | Component | Input | Formula |
//! |-----------|-------|---------|
//! | `win_rate` | wins / bids | `min(100, wr * 500)` |
//! | `bid_rate` | bids / requests | `min(100, br * 125)` |
//! | `cpm` | average bid CPM vs floor | see [`components::cpm_score`] |
//! | `floor_clearance` | bids at or above floor | `rate * 100` |
//! | `latency` | p95 latency | 100 at <= 100 ms, 0 at >= 500 ms |
//! | `recency` | recent / historical win rate | `50 * clamp(trend, 0.5, 2.0)` |
//! | `id_match` | preferred id types present | share * 100 |
//!
//! Weights are checked once, when the scorer is built. Scoring itself never
//! fails: missing data scores low with zero confidence.

pub mod components;
pub mod config;
pub mod error;
pub mod preferences;
pub mod scorer;
pub mod weights;

pub use config::ScorerConfig;
pub use error::{Result, ScorerError};
pub use preferences::IdPreferences;
pub use scorer::BidderScorer;
pub use weights::{ScoringWeights, WEIGHT_SUM_TOLERANCE};
