use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsConfigError {
    #[error("Source weight must be non-negative: {name} = {weight}")]
    NegativeWeight { name: &'static str, weight: f64 },

    #[error("At least one source weight must be positive")]
    NoPositiveWeight,

    #[error("Fetch timeout must be positive")]
    ZeroTimeout,
}
