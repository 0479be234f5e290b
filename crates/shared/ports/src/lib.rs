//! Bidroute Ports
//!
//! Port definitions (traits) for the bidroute decision core.
//! These define the boundaries between the selection logic and the
//! collaborators it depends on: performance stores, anchor providers,
//! consent parsing and time.

mod anchors;
mod clock;
mod consent;
mod error;
mod performance;

pub use anchors::{AnchorProvider, DEFAULT_ANCHORS};
pub use clock::Clock;
pub use consent::{ConsentParser, ConsentSignals};
pub use error::{PortError, PortResult};
pub use performance::{
    HistoricalSource, OutcomeRecorder, RealTimeSource, RequestOutcome, WinOutcome,
};
