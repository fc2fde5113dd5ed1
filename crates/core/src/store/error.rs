use thiserror::Error;

/// Errors that can occur when talking to the attribute store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("{resource} already exists")]
    AlreadyExists { resource: String },
    #[error("Condition failed on {table} for {key}")]
    ConditionFailed { table: String, key: String },
    #[error("Request throttled: {0}")]
    Throttled(String),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Store error: {0}")]
    Service(String),
}

impl StoreError {
    pub fn table_not_found(table: &str) -> Self {
        StoreError::NotFound {
            resource: format!("Table '{table}'"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
