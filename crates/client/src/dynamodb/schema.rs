//! Table descriptors to SDK request types, and table descriptions back to
//! observed state.

use aws_sdk_dynamodb::types::{
    AttributeDefinition, GlobalSecondaryIndex, GlobalSecondaryIndexDescription, IndexStatus,
    KeySchemaElement, KeyType, Projection, ProjectionType, ProvisionedThroughput,
    ScalarAttributeType, TableDescription, TableStatus,
};
use tablekit_core::model::{
    AttributeType, BillingMode, IndexDescriptor, IndexProjection, KeyAttribute, TableDescriptor,
};
use tablekit_core::store::{IndexState, ResourceStatus, StoreError, TableState};

use super::error::map_build_error;

type Result<T> = std::result::Result<T, StoreError>;

fn to_scalar_type(attribute_type: AttributeType) -> ScalarAttributeType {
    match attribute_type {
        AttributeType::String => ScalarAttributeType::S,
        AttributeType::Number => ScalarAttributeType::N,
    }
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(map_build_error)
}

pub fn key_schema(
    partition_key: &KeyAttribute,
    sort_key: Option<&KeyAttribute>,
) -> Result<Vec<KeySchemaElement>> {
    let mut schema = vec![key_element(&partition_key.name, KeyType::Hash)?];
    if let Some(sk) = sort_key {
        schema.push(key_element(&sk.name, KeyType::Range)?);
    }
    Ok(schema)
}

pub fn attribute_definitions<'a>(
    attributes: impl IntoIterator<Item = &'a KeyAttribute>,
) -> Result<Vec<AttributeDefinition>> {
    attributes
        .into_iter()
        .map(|attribute| {
            AttributeDefinition::builder()
                .attribute_name(&attribute.name)
                .attribute_type(to_scalar_type(attribute.attribute_type))
                .build()
                .map_err(map_build_error)
        })
        .collect()
}

pub fn throughput(billing_mode: BillingMode) -> Result<Option<ProvisionedThroughput>> {
    match billing_mode {
        BillingMode::PayPerRequest => Ok(None),
        BillingMode::Provisioned { read, write } => ProvisionedThroughput::builder()
            .read_capacity_units(read)
            .write_capacity_units(write)
            .build()
            .map(Some)
            .map_err(map_build_error),
    }
}

pub fn projection(projection: &IndexProjection) -> Projection {
    match projection {
        IndexProjection::All => Projection::builder()
            .projection_type(ProjectionType::All)
            .build(),
        IndexProjection::Include(attributes) if attributes.is_empty() => Projection::builder()
            .projection_type(ProjectionType::KeysOnly)
            .build(),
        IndexProjection::Include(attributes) => Projection::builder()
            .projection_type(ProjectionType::Include)
            .set_non_key_attributes(Some(attributes.clone()))
            .build(),
    }
}

pub fn global_secondary_index(
    index: &IndexDescriptor,
    billing_mode: BillingMode,
) -> Result<GlobalSecondaryIndex> {
    GlobalSecondaryIndex::builder()
        .index_name(&index.name)
        .set_key_schema(Some(key_schema(
            &index.partition_key,
            index.sort_key.as_ref(),
        )?))
        .projection(projection(&index.projection))
        .set_provisioned_throughput(throughput(billing_mode)?)
        .build()
        .map_err(map_build_error)
}

fn resource_status(status: Option<&TableStatus>) -> ResourceStatus {
    match status {
        Some(TableStatus::Active) => ResourceStatus::Active,
        Some(TableStatus::Creating) => ResourceStatus::Creating,
        Some(TableStatus::Updating) => ResourceStatus::Updating,
        Some(TableStatus::Deleting) => ResourceStatus::Deleting,
        _ => ResourceStatus::Unavailable,
    }
}

fn index_status(status: Option<&IndexStatus>) -> ResourceStatus {
    match status {
        Some(IndexStatus::Active) => ResourceStatus::Active,
        Some(IndexStatus::Creating) => ResourceStatus::Creating,
        Some(IndexStatus::Updating) => ResourceStatus::Updating,
        Some(IndexStatus::Deleting) => ResourceStatus::Deleting,
        _ => ResourceStatus::Unavailable,
    }
}

fn key_name(schema: &[KeySchemaElement], key_type: KeyType) -> Option<&str> {
    schema
        .iter()
        .find(|element| *element.key_type() == key_type)
        .map(|element| element.attribute_name())
}

/// Types a key attribute from the table's attribute definitions.
fn key_attribute(table: &TableDescription, attribute_name: &str) -> KeyAttribute {
    let numeric = table.attribute_definitions().iter().any(|definition| {
        definition.attribute_name() == attribute_name
            && *definition.attribute_type() == ScalarAttributeType::N
    });
    if numeric {
        KeyAttribute::number(attribute_name)
    } else {
        KeyAttribute::string(attribute_name)
    }
}

fn index_projection(projection: Option<&Projection>) -> IndexProjection {
    let Some(projection) = projection else {
        return IndexProjection::All;
    };
    match projection.projection_type() {
        Some(ProjectionType::Include) => {
            IndexProjection::Include(projection.non_key_attributes().to_vec())
        }
        Some(ProjectionType::KeysOnly) => IndexProjection::Include(Vec::new()),
        _ => IndexProjection::All,
    }
}

fn index_state(
    table: &TableDescription,
    index: &GlobalSecondaryIndexDescription,
) -> Result<IndexState> {
    let name = index.index_name().unwrap_or_default().to_string();
    let schema = index.key_schema();
    let partition_key = key_name(schema, KeyType::Hash)
        .map(|key| key_attribute(table, key))
        .ok_or_else(|| {
            StoreError::Serialization(format!("Index '{name}' has no partition key"))
        })?;

    Ok(IndexState {
        status: index_status(index.index_status()),
        partition_key,
        sort_key: key_name(schema, KeyType::Range).map(|key| key_attribute(table, key)),
        projection: index_projection(index.projection()),
        name,
    })
}

/// Capacity mode the live table runs with. Tables that never switched modes
/// carry no billing summary and report their provisioned throughput only.
fn live_billing_mode(table: &TableDescription) -> BillingMode {
    let on_demand = table
        .billing_mode_summary()
        .and_then(|summary| summary.billing_mode())
        == Some(&aws_sdk_dynamodb::types::BillingMode::PayPerRequest);
    let capacity = table.provisioned_throughput();
    let read = capacity
        .and_then(|c| c.read_capacity_units())
        .unwrap_or_default();
    let write = capacity
        .and_then(|c| c.write_capacity_units())
        .unwrap_or_default();

    if on_demand || (read == 0 && write == 0) {
        BillingMode::PayPerRequest
    } else {
        BillingMode::Provisioned { read, write }
    }
}

/// Reads the parts of a table description the engine interprets.
pub fn table_state(table: &TableDescription) -> Result<TableState> {
    let name = table.table_name().unwrap_or_default().to_string();
    let schema = table.key_schema();
    let partition_key = key_name(schema, KeyType::Hash)
        .map(|key| key_attribute(table, key))
        .ok_or_else(|| {
            StoreError::Serialization(format!("Table '{name}' has no partition key"))
        })?;
    let sort_key = key_name(schema, KeyType::Range).map(|key| key_attribute(table, key));
    let indexes = table
        .global_secondary_indexes()
        .iter()
        .map(|index| index_state(table, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(TableState {
        status: resource_status(table.table_status()),
        partition_key,
        sort_key,
        indexes,
        billing_mode: live_billing_mode(table),
        item_count: table.item_count(),
        name,
    })
}

/// Billing mode implied by a descriptor, as the SDK enum.
pub fn sdk_billing_mode(table: &TableDescriptor) -> aws_sdk_dynamodb::types::BillingMode {
    match table.billing_mode {
        BillingMode::PayPerRequest => aws_sdk_dynamodb::types::BillingMode::PayPerRequest,
        BillingMode::Provisioned { .. } => aws_sdk_dynamodb::types::BillingMode::Provisioned,
    }
}
