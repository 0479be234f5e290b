//! Bidroute Partner Selector
//!
//! Picks which scored bidders are invited to an auction.
//!
//! ## Modes
//!
//! | Mode | `selected` | `excluded` | `shadow_would_exclude` |
//! |------|-----------|------------|------------------------|
//! | Bypass | every candidate (`BYPASS`) | empty | empty |
//! | Shadow | every candidate | empty | what normal mode excludes |
//! | Normal | see below, at most `max_bidders` | the rest | empty |
//!
//! ## Normal mode
//!
//! ```text
//! 1. anchors          top revenue partners present among candidates
//! 2. high scorers     score >= threshold, low confidence by coin flip
//! 3. diversity        best bidder of each unrepresented category
//! 4. exploration      random sample of low-confidence leftovers
//! ```
//!
//! Each step stops once the cap is reached.

pub mod categories;
pub mod config;
pub mod error;
pub mod selector;

pub use categories::BidderCategories;
pub use config::SelectorConfig;
pub use error::{Result, SelectorError};
pub use selector::PartnerSelector;
