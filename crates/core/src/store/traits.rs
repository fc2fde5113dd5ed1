use async_trait::async_trait;

use crate::model::{IndexDescriptor, Item, ItemKey, Record, TableDescriptor};
use crate::query::{QueryRequest, RemoteRequest, ScanRequest};

use super::{AttributeUpdate, Result, TableState};

/// The remote attribute store.
///
/// Implementations perform exactly one remote operation per call and never
/// retry on their own.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Starts creating a table. Returns once the request is accepted.
    async fn create_table(&self, table: &TableDescriptor) -> Result<()>;

    /// Describes a table, or `None` when it does not exist.
    async fn describe_table(&self, table: &str) -> Result<Option<TableState>>;

    /// Lists all table names.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Starts creating a secondary index on an existing table.
    async fn add_index(&self, table: &TableDescriptor, index: &IndexDescriptor) -> Result<()>;

    /// Deletes a table.
    async fn delete_table(&self, table: &str) -> Result<()>;

    /// Writes a record, replacing any item with the same key.
    async fn put_item(&self, table: &str, record: &Record) -> Result<()>;

    /// Sets one attribute of an item.
    async fn update_item(&self, table: &str, key: &ItemKey, update: &AttributeUpdate)
        -> Result<()>;

    /// Deletes an item. Deleting a missing item succeeds.
    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<()>;

    /// Scans, following pagination until exhausted.
    async fn scan(&self, request: &ScanRequest) -> Result<Vec<Item>>;

    /// Queries by key condition, following pagination until exhausted.
    async fn query(&self, request: &QueryRequest) -> Result<Vec<Item>>;

    /// Runs whichever read `request` describes.
    async fn execute(&self, request: &RemoteRequest) -> Result<Vec<Item>> {
        match request {
            RemoteRequest::Scan(scan) => self.scan(scan).await,
            RemoteRequest::Query(query) => self.query(query).await,
        }
    }
}
