//! Bidroute Clock Infrastructure
//!
//! Time sources behind the [`Clock`] port:
//!
//! - [`SystemClock`]: wall-clock time for production
//! - [`ManualClock`]: time that only moves when told to, for tests that
//!   exercise real-time windows and time-of-day features
//!
//! ## Usage
//!
//! ```ignore
//! use bidroute_clock::{Clock, ManualClock};
//! use chrono::Duration;
//!
//! let clock = ManualClock::new(start);
//! clock.advance(Duration::minutes(20)); // roll past the real-time window
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use bidroute_ports::Clock;
