//! Client error types.

use tablekit_core::ingest::IngestError;
use tablekit_core::model::RecordError;
use tablekit_core::mutation::{LoadError, MutationError};
use tablekit_core::provisioning::ProvisioningError;
use tablekit_core::query::QueryError;
use tablekit_core::store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while running a command.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Timed out waiting for {resource} to become active")]
    ProvisioningTimedOut { resource: String },

    #[error("{resource} was not found while waiting for it to become active")]
    ProvisioningFailed { resource: String },

    #[error("Value {value:?} is not allowed for {attribute} (allowed: {allowed})")]
    Rejected {
        attribute: String,
        value: String,
        allowed: String,
    },

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
