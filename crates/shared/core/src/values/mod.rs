use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Money value in CPM units - uses Decimal for precision
pub type Cpm = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Demand partner identifier (e.g. "rubicon", "appnexus")
pub type BidderCode = String;
