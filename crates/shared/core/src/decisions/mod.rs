mod score;
mod selection;

pub use score::{BidderScore, ScoreComponent, ScoreComponents};
pub use selection::{SelectedBidder, SelectionReason, SelectionResult};
