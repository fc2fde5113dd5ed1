use thiserror::Error;

use crate::ingest::IngestError;
use crate::store::StoreError;
use crate::typing::TypeParseError;

/// Errors from single-item mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Attribute name cannot be empty")]
    EmptyAttribute,
    #[error("Key attribute '{name}' cannot be updated")]
    KeyAttribute { name: String },
    #[error(transparent)]
    TypeParse(#[from] TypeParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for mutations.
pub type Result<T> = std::result::Result<T, MutationError>;

/// A streaming load stopped early. Records written before the failure stay
/// written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Load aborted after {written} records: {source}")]
    Aborted {
        written: usize,
        #[source]
        source: IngestError,
    },
    #[error("Write failed after {written} records: {source}")]
    Store {
        written: usize,
        #[source]
        source: StoreError,
    },
}

impl LoadError {
    /// Records written before the failure.
    pub fn written(&self) -> usize {
        match self {
            LoadError::Aborted { written, .. } | LoadError::Store { written, .. } => *written,
        }
    }
}
