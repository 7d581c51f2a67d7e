use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccumulatorError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
