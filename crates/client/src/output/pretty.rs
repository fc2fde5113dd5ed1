//! Pretty (human-readable) output formatting.

use tablekit_core::model::{Item, TypedValue};
use tablekit_core::store::TableState;
use tablekit_core::typing::format_timestamp;

/// Formats one attribute value. Timestamps are shown as UTC date-times.
pub fn format_value(value: &TypedValue) -> String {
    match value {
        TypedValue::Timestamp(secs) => format_timestamp(*secs),
        other => other.to_string(),
    }
}

/// Formats an item as `attr: value` lines.
pub fn format_item(item: &Item) -> String {
    item.iter()
        .map(|(name, value)| format!("{}: {}", name, format_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats items as blocks, each terminated by a blank line.
pub fn format_items(items: &[Item]) -> String {
    let mut output = String::new();
    for item in items {
        output.push_str(&format_item(item));
        output.push_str("\n\n");
    }
    output
}

/// Format a table description for display.
pub fn format_table_state(state: &TableState) -> String {
    let mut output = format!("{} [{}]", state.name, state.status);
    output.push_str(&format!(
        "\n  Partition key: {} ({})",
        state.partition_key.name,
        state.partition_key.attribute_type.tag()
    ));
    if let Some(sk) = &state.sort_key {
        output.push_str(&format!(
            "\n  Sort key: {} ({})",
            sk.name,
            sk.attribute_type.tag()
        ));
    }
    if let Some(count) = state.item_count {
        output.push_str(&format!("\n  Items: {}", count));
    }
    for index in &state.indexes {
        output.push_str(&format!(
            "\n  Index: {} [{}] {}",
            index.name, index.status, index.partition_key.name
        ));
        if let Some(sk) = &index.sort_key {
            output.push_str(&format!(", {}", sk.name));
        }
    }
    output
}

/// Format table names, one per line.
pub fn format_table_names(names: &[String]) -> String {
    if names.is_empty() {
        return "No tables found.".to_string();
    }
    let mut output = format!("TABLES ({})\n", names.len());
    output.push_str(&"-".repeat(40));
    for name in names {
        output.push_str(&format!("\n{}", name));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_core::model::{BillingMode, IndexProjection, KeyAttribute};
    use tablekit_core::store::{IndexState, ResourceStatus};

    #[test]
    fn test_format_items() {
        let items = vec![
            Item::new()
                .with("Order_ID", TypedValue::number(2))
                .with("Order_Date", TypedValue::Timestamp(1592224200)),
            Item::new().with("Order_ID", TypedValue::number(3)),
        ];

        assert_eq!(
            format_items(&items),
            "Order_ID: 2\nOrder_Date: 2020-06-15 12:30:00\n\nOrder_ID: 3\n\n"
        );
        assert_eq!(format_items(&[]), "");
    }

    #[test]
    fn test_format_table_state() {
        let state = TableState {
            name: "Orders".to_string(),
            status: ResourceStatus::Active,
            partition_key: KeyAttribute::string("ID"),
            sort_key: Some(KeyAttribute::string("Area")),
            indexes: vec![IndexState {
                name: "StatusIndex".to_string(),
                status: ResourceStatus::Creating,
                partition_key: KeyAttribute::string("Order_Status"),
                sort_key: Some(KeyAttribute::string("Order_Date")),
                projection: IndexProjection::All,
            }],
            billing_mode: BillingMode::PayPerRequest,
            item_count: Some(12),
        };

        assert_eq!(
            format_table_state(&state),
            "Orders [ACTIVE]\n  Partition key: ID (S)\n  Sort key: Area (S)\n  Items: 12\n  \
             Index: StatusIndex [CREATING] Order_Status, Order_Date"
        );
    }

    #[test]
    fn test_format_table_names() {
        assert_eq!(format_table_names(&[]), "No tables found.");
        let output = format_table_names(&["A".to_string(), "B".to_string()]);
        assert!(output.starts_with("TABLES (2)\n"));
        assert!(output.ends_with("\nA\nB"));
    }
}
