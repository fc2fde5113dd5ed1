//! JSON output formatting.

use serde_json::{Map, Number, Value};
use tablekit_core::model::{Item, TypedValue};
use tablekit_core::store::TableState;

use super::pretty::format_value;

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Numbers that fit a JSON number stay numeric; timestamps become date-time
/// strings.
pub fn value_to_json(value: &TypedValue) -> Value {
    match value {
        TypedValue::String(s) => Value::String(s.clone()),
        TypedValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Number(Number::from(i)),
            None => n
                .to_string()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(n.to_string())),
        },
        TypedValue::Timestamp(_) => Value::String(format_value(value)),
    }
}

pub fn item_to_json(item: &Item) -> Value {
    let mut object = Map::new();
    for (name, value) in item.iter() {
        object.insert(name.to_string(), value_to_json(value));
    }
    Value::Object(object)
}

pub fn format_items(items: &[Item]) -> String {
    format_json(&items.iter().map(item_to_json).collect::<Vec<_>>())
}

pub fn table_state_to_json(state: &TableState) -> Value {
    serde_json::json!({
        "name": state.name,
        "status": state.status.to_string(),
        "partitionKey": {
            "name": state.partition_key.name,
            "type": state.partition_key.attribute_type.tag(),
        },
        "sortKey": state.sort_key.as_ref().map(|sk| serde_json::json!({
            "name": sk.name,
            "type": sk.attribute_type.tag(),
        })),
        "itemCount": state.item_count,
        "indexes": state.indexes.iter().map(|index| serde_json::json!({
            "name": index.name,
            "status": index.status.to_string(),
            "partitionKey": index.partition_key.name,
            "sortKey": index.sort_key.as_ref().map(|sk| &sk.name),
        })).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_core::model::Decimal;

    #[test]
    fn test_item_to_json() {
        let item = Item::new()
            .with("Order_ID", TypedValue::number(2))
            .with("Order_Cost", TypedValue::Number(Decimal::parse("12.5").unwrap()))
            .with("Order_Date", TypedValue::Timestamp(1588568400))
            .with("Order_Status", TypedValue::string("pending"));

        assert_eq!(
            format_json(&item_to_json(&item)),
            concat!(
                r#"{"Order_ID":2,"Order_Cost":12.5,"#,
                r#""Order_Date":"2020-05-04 05:00:00","Order_Status":"pending"}"#
            )
        );
    }

    #[test]
    fn test_format_items_is_an_array() {
        assert_eq!(format_items(&[]), "[]");
        let items = vec![Item::new().with("A", TypedValue::string("x"))];
        assert_eq!(format_items(&items), r#"[{"A":"x"}]"#);
    }
}
