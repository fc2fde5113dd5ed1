//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `tablekit_core::store`.

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{BuildError, DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::list_tables::ListTablesError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::operation::update_table::UpdateTableError;
use tablekit_core::store::StoreError;

const THROUGHPUT_EXCEEDED: &str = "Throughput exceeded, please retry";
const REQUEST_LIMIT_EXCEEDED: &str = "Request limit exceeded, please retry";
const INTERNAL_SERVER_ERROR: &str = "DynamoDB internal server error";

/// Requests that never produced a response are connection failures.
fn transport_error<E, R>(err: &SdkError<E, R>) -> Option<StoreError>
where
    E: Error + 'static,
    R: Debug,
{
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            Some(map_connection_error(DisplayErrorContext(err)))
        }
        _ => None,
    }
}

/// Map a CreateTable SDK error to StoreError.
pub fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
    table: &str,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => StoreError::AlreadyExists {
            resource: format!("Table '{table}'"),
        },
        CreateTableError::LimitExceededException(_) => {
            StoreError::Throttled("Too many concurrent table operations".to_string())
        }
        CreateTableError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("CreateTable failed: {:?}", err)),
    }
}

/// Map a DescribeTable SDK error to StoreError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table: &str,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => StoreError::table_not_found(table),
        DescribeTableError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("DescribeTable failed: {:?}", err)),
    }
}

/// Map a ListTables SDK error to StoreError.
pub fn map_list_tables_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ListTablesError, R>,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        ListTablesError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("ListTables failed: {:?}", err)),
    }
}

/// Map an UpdateTable SDK error to StoreError.
pub fn map_update_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateTableError, R>,
    table: &str,
    index: &str,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        UpdateTableError::ResourceNotFoundException(_) => StoreError::table_not_found(table),
        UpdateTableError::ResourceInUseException(_) => StoreError::Service(format!(
            "Table '{table}' is busy, cannot add index '{index}' now"
        )),
        UpdateTableError::LimitExceededException(_) => {
            StoreError::Throttled("Too many concurrent index operations".to_string())
        }
        UpdateTableError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => {
            let message = format!("{:?}", err);
            if message.contains("already exists") {
                StoreError::AlreadyExists {
                    resource: format!("Index '{index}'"),
                }
            } else {
                StoreError::Service(format!("UpdateTable failed: {message}"))
            }
        }
    }
}

/// Map a DeleteTable SDK error to StoreError.
pub fn map_delete_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteTableError, R>,
    table: &str,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        DeleteTableError::ResourceNotFoundException(_) => StoreError::table_not_found(table),
        DeleteTableError::ResourceInUseException(_) => {
            StoreError::Service(format!("Table '{table}' is busy, retry once it is active"))
        }
        DeleteTableError::LimitExceededException(_) => {
            StoreError::Throttled("Too many concurrent table operations".to_string())
        }
        DeleteTableError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("DeleteTable failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table: &str,
    key: impl Into<String>,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::ConditionFailed {
            table: table.to_string(),
            key: key.into(),
        },
        PutItemError::ResourceNotFoundException(_) => StoreError::table_not_found(table),
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Service("Item collection size limit exceeded".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("PutItem failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    table: &str,
    key: impl Into<String>,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => StoreError::ConditionFailed {
            table: table.to_string(),
            key: key.into(),
        },
        UpdateItemError::ResourceNotFoundException(_) => StoreError::table_not_found(table),
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Service("Item collection size limit exceeded".to_string())
        }
        UpdateItemError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table: &str,
    key: impl Into<String>,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => StoreError::ConditionFailed {
            table: table.to_string(),
            key: key.into(),
        },
        DeleteItemError::ResourceNotFoundException(_) => StoreError::table_not_found(table),
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table: &str,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => StoreError::table_not_found(table),
        ScanError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        ScanError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("Scan failed: {:?}", err)),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table: &str,
) -> StoreError {
    if let Some(mapped) = transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => StoreError::table_not_found(table),
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::Service(INTERNAL_SERVER_ERROR.to_string())
        }
        err => StoreError::Service(format!("Query failed: {:?}", err)),
    }
}

/// Map a request builder error to StoreError.
pub fn map_build_error(err: BuildError) -> StoreError {
    StoreError::Serialization(format!("Failed to build request: {}", err))
}

/// Map a generic connection/config error to StoreError.
pub fn map_connection_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::Connection(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ResourceInUseException, ResourceNotFoundException,
    };

    fn service_error<E>(err: E) -> SdkError<E, ()> {
        SdkError::service_error(err, ())
    }

    #[test]
    fn test_create_table_in_use_is_already_exists() {
        let err = service_error(CreateTableError::ResourceInUseException(
            ResourceInUseException::builder().build(),
        ));
        assert_eq!(
            map_create_table_error(err, "Orders"),
            StoreError::AlreadyExists {
                resource: "Table 'Orders'".to_string()
            }
        );
    }

    #[test]
    fn test_describe_missing_table_is_not_found() {
        let err = service_error(DescribeTableError::ResourceNotFoundException(
            ResourceNotFoundException::builder().build(),
        ));
        assert!(map_describe_table_error(err, "Orders").is_not_found());
    }

    #[test]
    fn test_update_item_condition_failure() {
        let err = service_error(UpdateItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder().build(),
        ));
        assert_eq!(
            map_update_item_error(err, "Orders", "ID=7, Area=Order"),
            StoreError::ConditionFailed {
                table: "Orders".to_string(),
                key: "ID=7, Area=Order".to_string(),
            }
        );
    }
}
