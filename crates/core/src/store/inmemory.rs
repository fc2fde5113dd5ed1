//! In-memory store implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{IndexDescriptor, Item, ItemKey, Record, TableDescriptor};
use crate::query::{QueryRequest, ScanRequest};

use super::{
    AttributeUpdate, IndexState, ResourceStatus, Result, StoreError, TableState, TableStore,
};

#[derive(Debug, Clone)]
struct MemoryTable {
    descriptor: TableDescriptor,
    items: Vec<Item>,
    /// Remaining describes that still report the table as creating.
    pending_describes: usize,
    /// Remaining describes per index that still report it as creating.
    pending_indexes: HashMap<String, usize>,
}

impl MemoryTable {
    fn position(&self, key: &ItemKey) -> Option<usize> {
        self.items.iter().position(|item| key.matches(item))
    }

    fn in_index(&self, index: Option<&str>, item: &Item) -> bool {
        let Some(name) = index else {
            return true;
        };
        self.descriptor.index(name).is_some_and(|index| {
            index
                .key_attributes()
                .all(|attribute| item.contains(&attribute.name))
        })
    }
}

/// In-memory store backend for testing.
///
/// Tables and items live in a `HashMap` behind `Arc<RwLock<_>>`. New tables
/// and indexes can be made to report `CREATING` for a number of describes to
/// exercise provisioning waits. Every trait call is counted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, MemoryTable>>>,
    activation_describes: usize,
    calls: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// New tables and indexes report `CREATING` for the first `describes`
    /// describe calls after they are created.
    pub fn with_activation_delay(mut self, describes: usize) -> Self {
        self.activation_describes = describes;
        self
    }

    /// Number of trait calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Items currently stored in `table`, in write order.
    pub async fn items(&self, table: &str) -> Vec<Item> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .map(|t| t.items.clone())
            .unwrap_or_default()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn not_found(table: &str) -> StoreError {
    StoreError::table_not_found(table)
}

fn status(pending: usize) -> ResourceStatus {
    if pending > 0 {
        ResourceStatus::Creating
    } else {
        ResourceStatus::Active
    }
}

#[async_trait]
impl TableStore for InMemoryStore {
    async fn create_table(&self, table: &TableDescriptor) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if tables.contains_key(&table.name) {
            return Err(StoreError::AlreadyExists {
                resource: format!("Table '{}'", table.name),
            });
        }
        tables.insert(
            table.name.clone(),
            MemoryTable {
                descriptor: table.clone(),
                items: Vec::new(),
                pending_describes: self.activation_describes,
                pending_indexes: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn describe_table(&self, table: &str) -> Result<Option<TableState>> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let Some(entry) = tables.get_mut(table) else {
            return Ok(None);
        };

        let table_status = status(entry.pending_describes);
        entry.pending_describes = entry.pending_describes.saturating_sub(1);

        let mut indexes = Vec::new();
        for index in &entry.descriptor.indexes {
            let pending = entry.pending_indexes.entry(index.name.clone()).or_insert(0);
            let index_status = status(*pending);
            *pending = pending.saturating_sub(1);
            indexes.push(IndexState {
                name: index.name.clone(),
                status: index_status,
                partition_key: index.partition_key.clone(),
                sort_key: index.sort_key.clone(),
                projection: index.projection.clone(),
            });
        }

        Ok(Some(TableState {
            name: entry.descriptor.name.clone(),
            status: table_status,
            partition_key: entry.descriptor.partition_key.clone(),
            sort_key: entry.descriptor.sort_key.clone(),
            indexes,
            billing_mode: entry.descriptor.billing_mode,
            item_count: i64::try_from(entry.items.len()).ok(),
        }))
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        self.record_call();
        let tables = self.tables.read().await;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn add_index(&self, table: &TableDescriptor, index: &IndexDescriptor) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let entry = tables.get_mut(&table.name).ok_or_else(|| not_found(&table.name))?;
        if entry.descriptor.index(&index.name).is_some() {
            return Err(StoreError::AlreadyExists {
                resource: format!("Index '{}'", index.name),
            });
        }
        entry.descriptor.indexes.push(index.clone());
        entry
            .pending_indexes
            .insert(index.name.clone(), self.activation_describes);
        Ok(())
    }

    async fn delete_table(&self, table: &str) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        tables.remove(table).map(|_| ()).ok_or_else(|| not_found(table))
    }

    async fn put_item(&self, table: &str, record: &Record) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let entry = tables.get_mut(table).ok_or_else(|| not_found(table))?;
        let item = record.to_item();
        match entry.position(record.key()) {
            Some(position) => entry.items[position] = item,
            None => entry.items.push(item),
        }
        Ok(())
    }

    async fn update_item(
        &self,
        table: &str,
        key: &ItemKey,
        update: &AttributeUpdate,
    ) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let entry = tables.get_mut(table).ok_or_else(|| not_found(table))?;
        let position = entry.position(key);

        if let Some(expected) = &update.expected_prior {
            let current = position.and_then(|p| entry.items[p].get(&update.attribute));
            if current != Some(expected) {
                return Err(StoreError::ConditionFailed {
                    table: table.to_string(),
                    key: key.to_string(),
                });
            }
        }

        match position {
            Some(position) => {
                entry.items[position].insert(update.attribute.clone(), update.value.clone());
            }
            None => {
                let mut item: Item = key
                    .parts()
                    .map(|part| (part.name.clone(), part.value.clone()))
                    .collect();
                item.insert(update.attribute.clone(), update.value.clone());
                entry.items.push(item);
            }
        }
        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let entry = tables.get_mut(table).ok_or_else(|| not_found(table))?;
        entry.items.retain(|item| !key.matches(item));
        Ok(())
    }

    async fn scan(&self, request: &ScanRequest) -> Result<Vec<Item>> {
        self.record_call();
        let tables = self.tables.read().await;
        let entry = tables
            .get(&request.table)
            .ok_or_else(|| not_found(&request.table))?;
        Ok(entry
            .items
            .iter()
            .filter(|item| entry.in_index(request.index.as_deref(), item))
            .filter(|item| request.filter.as_ref().is_none_or(|f| f.matches(item)))
            .map(|item| request.projection.apply(item))
            .collect())
    }

    async fn query(&self, request: &QueryRequest) -> Result<Vec<Item>> {
        self.record_call();
        let tables = self.tables.read().await;
        let entry = tables
            .get(&request.table)
            .ok_or_else(|| not_found(&request.table))?;
        Ok(entry
            .items
            .iter()
            .filter(|item| entry.in_index(request.index.as_deref(), item))
            .filter(|item| request.key_condition.matches(item))
            .map(|item| request.projection.apply(item))
            .collect())
    }
}
