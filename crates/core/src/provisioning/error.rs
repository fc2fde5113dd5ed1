use thiserror::Error;

use crate::store::StoreError;

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisioningError>;

/// Errors that stop a provisioning operation. Timeouts are reported through
/// the task state, not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    #[error("Table '{table}' does not exist")]
    TableMissing { table: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
