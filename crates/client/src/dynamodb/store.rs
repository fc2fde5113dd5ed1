//! DynamoDB implementation of [`TableStore`].

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{CreateGlobalSecondaryIndexAction, GlobalSecondaryIndexUpdate};
use aws_sdk_dynamodb::Client;
use tablekit_core::model::{IndexDescriptor, Item, ItemKey, Record, TableDescriptor};
use tablekit_core::query::{Projection, QueryRequest, ScanRequest};
use tablekit_core::store::{AttributeUpdate, Result, StoreError, TableState, TableStore};

use super::conversions::{
    attributes_to_item, expression_names, expression_values, key_to_attributes, record_to_item,
    typed_to_attribute, AttributeMap,
};
use super::error::{
    map_build_error, map_create_table_error, map_delete_item_error, map_delete_table_error,
    map_describe_table_error, map_list_tables_error, map_put_item_error, map_query_error,
    map_scan_error, map_update_item_error, map_update_table_error,
};
use super::schema;

/// DynamoDB-backed table store.
///
/// Every method performs exactly one logical operation; scans and queries
/// follow `LastEvaluatedKey` until the result set is exhausted. `add_index`
/// describes the table first to size the index like the live table.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn collect_page(
    items: &mut Vec<Item>,
    page: Option<Vec<AttributeMap>>,
    projection: &Projection,
) {
    items.extend(
        page.unwrap_or_default()
            .iter()
            .map(|attributes| projection.apply(&attributes_to_item(attributes))),
    );
}

#[async_trait]
impl TableStore for DynamoDbStore {
    async fn create_table(&self, table: &TableDescriptor) -> Result<()> {
        let mut request = self
            .client
            .create_table()
            .table_name(&table.name)
            .set_key_schema(Some(schema::key_schema(
                &table.partition_key,
                table.sort_key.as_ref(),
            )?))
            .set_attribute_definitions(Some(schema::attribute_definitions(
                table.attribute_definitions(),
            )?))
            .billing_mode(schema::sdk_billing_mode(table))
            .set_provisioned_throughput(schema::throughput(table.billing_mode)?);

        for index in &table.indexes {
            request = request.global_secondary_indexes(schema::global_secondary_index(
                index,
                table.billing_mode,
            )?);
        }

        request
            .send()
            .await
            .map_err(|e| map_create_table_error(e, &table.name))?;
        Ok(())
    }

    async fn describe_table(&self, table: &str) -> Result<Option<TableState>> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(output) => output.table.as_ref().map(schema::table_state).transpose(),
            Err(err) => match map_describe_table_error(err, table) {
                StoreError::NotFound { .. } => Ok(None),
                err => Err(err),
            },
        }
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;
        loop {
            let output = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start.take())
                .send()
                .await
                .map_err(map_list_tables_error)?;
            names.extend(output.table_names.unwrap_or_default());
            match output.last_evaluated_table_name {
                Some(next) => start = Some(next),
                None => break,
            }
        }
        Ok(names)
    }

    async fn add_index(&self, table: &TableDescriptor, index: &IndexDescriptor) -> Result<()> {
        let live = self
            .describe_table(&table.name)
            .await?
            .ok_or_else(|| StoreError::table_not_found(&table.name))?;

        let action = CreateGlobalSecondaryIndexAction::builder()
            .index_name(&index.name)
            .set_key_schema(Some(schema::key_schema(
                &index.partition_key,
                index.sort_key.as_ref(),
            )?))
            .projection(schema::projection(&index.projection))
            .set_provisioned_throughput(schema::throughput(live.billing_mode)?)
            .build()
            .map_err(map_build_error)?;

        self.client
            .update_table()
            .table_name(&table.name)
            .set_attribute_definitions(Some(schema::attribute_definitions(
                index.key_attributes(),
            )?))
            .global_secondary_index_updates(
                GlobalSecondaryIndexUpdate::builder().create(action).build(),
            )
            .send()
            .await
            .map_err(|e| map_update_table_error(e, &table.name, &index.name))?;
        Ok(())
    }

    async fn delete_table(&self, table: &str) -> Result<()> {
        self.client
            .delete_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_delete_table_error(e, table))?;
        Ok(())
    }

    async fn put_item(&self, table: &str, record: &Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table, record.key().to_string()))?;
        Ok(())
    }

    async fn update_item(
        &self,
        table: &str,
        key: &ItemKey,
        update: &AttributeUpdate,
    ) -> Result<()> {
        let mut request = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .update_expression("SET #attr = :value")
            .expression_attribute_names("#attr", &update.attribute)
            .expression_attribute_values(":value", typed_to_attribute(&update.value));

        if let Some(prior) = &update.expected_prior {
            request = request
                .condition_expression("#attr = :prior")
                .expression_attribute_values(":prior", typed_to_attribute(prior));
        }

        request
            .send()
            .await
            .map_err(|e| map_update_item_error(e, table, key.to_string()))?;
        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, table, key.to_string()))?;
        Ok(())
    }

    async fn scan(&self, request: &ScanRequest) -> Result<Vec<Item>> {
        let expressions = request.expressions();
        let mut items = Vec::new();
        let mut start: Option<AttributeMap> = None;
        let mut pages = 0usize;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&request.table)
                .set_index_name(request.index.clone())
                .set_filter_expression(expressions.filter.clone())
                .set_projection_expression(expressions.projection.clone())
                .set_expression_attribute_names(expression_names(&expressions))
                .set_expression_attribute_values(expression_values(&expressions))
                .set_exclusive_start_key(start.take())
                .send()
                .await
                .map_err(|e| map_scan_error(e, &request.table))?;
            pages += 1;
            collect_page(&mut items, output.items, &request.projection);
            match output.last_evaluated_key {
                Some(next) if !next.is_empty() => start = Some(next),
                _ => break,
            }
        }
        tracing::debug!(table = %request.table, pages, items = items.len(), "scan complete");
        Ok(items)
    }

    async fn query(&self, request: &QueryRequest) -> Result<Vec<Item>> {
        let expressions = request.expressions();
        let mut items = Vec::new();
        let mut start: Option<AttributeMap> = None;
        let mut pages = 0usize;
        loop {
            let output = self
                .client
                .query()
                .table_name(&request.table)
                .set_index_name(request.index.clone())
                .set_key_condition_expression(expressions.key_condition.clone())
                .set_projection_expression(expressions.projection.clone())
                .set_expression_attribute_names(expression_names(&expressions))
                .set_expression_attribute_values(expression_values(&expressions))
                .set_exclusive_start_key(start.take())
                .send()
                .await
                .map_err(|e| map_query_error(e, &request.table))?;
            pages += 1;
            collect_page(&mut items, output.items, &request.projection);
            match output.last_evaluated_key {
                Some(next) if !next.is_empty() => start = Some(next),
                _ => break,
            }
        }
        tracing::debug!(table = %request.table, pages, items = items.len(), "query complete");
        Ok(items)
    }
}
