use thiserror::Error;

/// Scorer construction failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScorerError {
    #[error("Scoring weights must sum to 1.0 (+/- 0.001), got {sum}")]
    WeightSum { sum: f64 },

    #[error("Scoring weight for {component} must be non-negative, got {weight}")]
    NegativeWeight { component: String, weight: f64 },

    #[error("Unknown score component: {0}")]
    UnknownComponent(String),
}

pub type Result<T> = std::result::Result<T, ScorerError>;
