use thiserror::Error;

use crate::model::RecordError;
use crate::typing::TypeParseError;

/// Result type for ingestion.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that abort an ingestion batch.
///
/// Row numbers are 1-based input lines for CSV and object ordinals for JSON;
/// the header is row 1 in both.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("Input has no header row")]
    EmptyInput,

    #[error("Row {row} has {found} fields but the header has {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: {source}")]
    TypeParse {
        row: usize,
        #[source]
        source: TypeParseError,
    },

    #[error("Row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: RecordError,
    },

    #[error("Header column '{column}' collides with the generated partition key")]
    ReservedColumn { column: String },

    #[error("Header column '{column}' appears more than once")]
    DuplicateColumn { column: String },

    #[error("Sort key '{name}' is neither a header column nor given as a batch value")]
    MissingSortKey { name: String },

    #[error("Row {row}: missing field '{column}'")]
    MissingField { row: usize, column: String },

    #[error("Row {row}: field '{column}' is not a string or number")]
    UnsupportedValue { row: usize, column: String },

    #[error("Row {row}: malformed input: {message}")]
    Malformed { row: usize, message: String },
}

impl IngestError {
    /// Row the error refers to, when it concerns a single row.
    pub fn row(&self) -> Option<usize> {
        match self {
            IngestError::ColumnCountMismatch { row, .. }
            | IngestError::TypeParse { row, .. }
            | IngestError::InvalidRecord { row, .. }
            | IngestError::MissingField { row, .. }
            | IngestError::UnsupportedValue { row, .. }
            | IngestError::Malformed { row, .. } => Some(*row),
            _ => None,
        }
    }
}
