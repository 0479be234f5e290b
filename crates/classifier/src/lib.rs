//! Bidroute Request Classifier
//!
//! Turns a raw, loosely-structured OpenRTB auction request into a
//! [`ClassifiedRequest`](bidroute_core::ClassifiedRequest). Classification is
//! total: missing or malformed fields fall back to documented defaults
//! (empty string, desktop, banner, country `"UNKNOWN"`) instead of failing.
//!
//! ## Rules
//!
//! | Feature | Precedence |
//! |---------|------------|
//! | Ad format | video > native > audio > banner |
//! | Sizes | banner `format[]` > banner w/h > video player w/h |
//! | Device | `devicetype` > user-agent > OS name > desktop |
//! | Page type | explicit page type > URL path keywords > none |
//!
//! Publisher, site and ad-unit ids missing from the source are generated
//! (`pub_`, `site_`, `unit_` + 12 random lowercase alphanumerics) so the
//! auction can still be tracked. That is the only non-deterministic step.

pub mod classifier;
pub mod consent;
pub mod device;
pub mod identity;
pub mod ids;
pub mod openrtb;
pub mod page;

pub use classifier::RequestClassifier;
pub use consent::TcfConsentParser;
pub use openrtb::BidRequest;
