use thiserror::Error;

/// A token did not match the literal format its column requires.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("Column '{column}' expects a 'yyyy-MM-dd HH:mm:ss' date-time, got {value:?}")]
    InvalidTimestamp { column: String, value: String },
}
