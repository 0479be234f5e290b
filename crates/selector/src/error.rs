use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("Invalid selector configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SelectorError>;
