use thiserror::Error;

/// Errors raised while constructing values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),
}

/// Errors raised when a record or key violates its invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Key attribute name cannot be empty")]
    EmptyKeyName,
    #[error("Key attribute '{name}' cannot have an empty value")]
    EmptyKeyValue { name: String },
    #[error("Key attribute '{name}' expects a {expected} value, got {value:?}")]
    KeyTypeMismatch {
        name: String,
        expected: &'static str,
        value: String,
    },
    #[error("Table '{table}' requires a value for partition key '{name}'")]
    MissingPartitionKey { table: String, name: String },
    #[error("Table '{table}' requires a value for sort key '{name}'")]
    MissingSortKey { table: String, name: String },
    #[error("Table '{table}' has no sort key, but a sort key value was given")]
    UnexpectedSortKey { table: String },
    #[error("Attribute '{name}' duplicates a key attribute")]
    KeyAttributeInBody { name: String },
    #[error("Got {keys} attribute names but {values} values")]
    UnmatchedPairs { keys: usize, values: usize },
}
