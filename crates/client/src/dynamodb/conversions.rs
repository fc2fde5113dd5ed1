//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! typed items. Numbers stored under a date attribute come back as
//! timestamps.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use tablekit_core::model::{Decimal, Item, ItemKey, Record, TypedValue};
use tablekit_core::query::Expressions;
use tablekit_core::typing::is_date_column;

pub type AttributeMap = HashMap<String, AttributeValue>;

pub fn typed_to_attribute(value: &TypedValue) -> AttributeValue {
    match value {
        TypedValue::String(s) => AttributeValue::S(s.clone()),
        TypedValue::Number(_) | TypedValue::Timestamp(_) => AttributeValue::N(value.wire_text()),
    }
}

/// Converts one stored attribute. Returns `None` for attribute kinds the
/// engine does not model (lists, maps, sets, binary, null).
pub fn attribute_to_typed(name: &str, value: &AttributeValue) -> Option<TypedValue> {
    match value {
        AttributeValue::S(s) => Some(TypedValue::String(s.clone())),
        AttributeValue::N(n) => {
            if is_date_column(name) {
                if let Ok(secs) = n.parse::<i64>() {
                    return Some(TypedValue::Timestamp(secs));
                }
            }
            Some(match Decimal::parse(n) {
                Ok(number) => TypedValue::Number(number),
                Err(_) => TypedValue::String(n.clone()),
            })
        }
        AttributeValue::Bool(b) => Some(TypedValue::String(b.to_string())),
        _ => None,
    }
}

pub fn record_to_item(record: &Record) -> AttributeMap {
    item_to_attributes(&record.to_item())
}

pub fn item_to_attributes(item: &Item) -> AttributeMap {
    item.iter()
        .map(|(name, value)| (name.to_string(), typed_to_attribute(value)))
        .collect()
}

/// Converts a stored item. Attributes come back sorted by name.
pub fn attributes_to_item(attributes: &AttributeMap) -> Item {
    let mut names: Vec<&String> = attributes.keys().collect();
    names.sort();
    let mut item = Item::new();
    for name in names {
        match attribute_to_typed(name, &attributes[name]) {
            Some(value) => item.insert(name.clone(), value),
            None => tracing::debug!(attribute = %name, "skipping unsupported attribute type"),
        }
    }
    item
}

pub fn key_to_attributes(key: &ItemKey) -> AttributeMap {
    key.parts()
        .map(|part| (part.name.clone(), typed_to_attribute(&part.value)))
        .collect()
}

/// Placeholder tables of an expression set, `None` when empty.
pub fn expression_names(expressions: &Expressions) -> Option<HashMap<String, String>> {
    if expressions.names.is_empty() {
        return None;
    }
    Some(expressions.names.iter().cloned().collect())
}

pub fn expression_values(expressions: &Expressions) -> Option<AttributeMap> {
    if expressions.values.is_empty() {
        return None;
    }
    Some(
        expressions
            .values
            .iter()
            .map(|(placeholder, value)| (placeholder.clone(), typed_to_attribute(value)))
            .collect(),
    )
}
