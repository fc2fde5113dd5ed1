//! Pure functions for calculating deployment plans.

use crate::model::{BillingMode, IndexDescriptor, IndexProjection, KeyAttribute, TableDescriptor};
use crate::store::TableState;

/// Planned changes for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployPlan {
    /// Table doesn't exist, needs to be created.
    CreateTable { table: TableDescriptor },
    /// Table exists, indexes need to be added.
    AddIndexes {
        table: TableDescriptor,
        indexes: Vec<IndexDescriptor>,
    },
    /// Table is up to date, no changes needed.
    NoChanges { table_name: String },
}

/// Plan for destroying a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyPlan {
    DeleteTable { table_name: String },
    AlreadyGone { table_name: String },
}

/// Calculates what changes are needed to reach the desired state.
pub fn calculate_deploy_plan(
    current: Option<&TableState>,
    desired: &TableDescriptor,
) -> DeployPlan {
    let Some(state) = current else {
        return DeployPlan::CreateTable {
            table: desired.clone(),
        };
    };

    let indexes: Vec<IndexDescriptor> = desired
        .indexes
        .iter()
        .filter(|index| state.index(&index.name).is_none())
        .cloned()
        .collect();

    if indexes.is_empty() {
        DeployPlan::NoChanges {
            table_name: desired.name.clone(),
        }
    } else {
        DeployPlan::AddIndexes {
            table: desired.clone(),
            indexes,
        }
    }
}

pub fn calculate_destroy_plan(current: Option<&TableState>, table_name: &str) -> DestroyPlan {
    match current {
        Some(_) => DestroyPlan::DeleteTable {
            table_name: table_name.to_string(),
        },
        None => DestroyPlan::AlreadyGone {
            table_name: table_name.to_string(),
        },
    }
}

fn key_line(indent: &str, label: &str, key: &KeyAttribute) -> String {
    format!(
        "{indent}{label}: {} ({})",
        key.name,
        key.attribute_type.tag()
    )
}

fn index_lines(index: &IndexDescriptor, marker: &str) -> Vec<String> {
    let mut lines = vec![
        format!("  {marker} Index: {}", index.name),
        key_line("    ", "Partition key", &index.partition_key),
    ];
    if let Some(sk) = &index.sort_key {
        lines.push(key_line("    ", "Sort key", sk));
    }
    match &index.projection {
        IndexProjection::All => lines.push("    Projection: ALL".to_string()),
        IndexProjection::Include(attributes) => {
            lines.push(format!("    Projection: INCLUDE {}", attributes.join(", ")))
        }
    }
    lines
}

fn billing_line(billing_mode: BillingMode) -> String {
    match billing_mode {
        BillingMode::PayPerRequest => "  Billing: PAY_PER_REQUEST".to_string(),
        BillingMode::Provisioned { read, write } => {
            format!("  Billing: PROVISIONED (read {read}, write {write})")
        }
    }
}

/// Formats a deploy plan for display.
pub fn format_deploy_plan(plan: &DeployPlan) -> Vec<String> {
    match plan {
        DeployPlan::CreateTable { table } => {
            let mut lines = vec![
                format!("+ Create table: {}", table.name),
                key_line("  ", "Partition key", &table.partition_key),
            ];
            if let Some(sk) = &table.sort_key {
                lines.push(key_line("  ", "Sort key", sk));
            }
            for index in &table.indexes {
                lines.extend(index_lines(index, "+"));
            }
            lines.push(billing_line(table.billing_mode));
            lines
        }
        DeployPlan::AddIndexes { table, indexes } => {
            let mut lines = vec![format!("~ Update table: {}", table.name)];
            for index in indexes {
                lines.extend(index_lines(index, "+ Add"));
            }
            lines
        }
        DeployPlan::NoChanges { table_name } => {
            vec![format!("= Table '{table_name}' is up to date")]
        }
    }
}

pub fn format_destroy_plan(plan: &DestroyPlan) -> Vec<String> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            vec![format!("- Delete table: {table_name} (ALL DATA WILL BE LOST)")]
        }
        DestroyPlan::AlreadyGone { table_name } => {
            vec![format!("= Table '{table_name}' does not exist")]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{IndexState, ResourceStatus};

    fn status_index() -> IndexDescriptor {
        IndexDescriptor {
            name: "StatusIndex".to_string(),
            partition_key: KeyAttribute::string("Order_Status"),
            sort_key: Some(KeyAttribute::string("Order_Date")),
            projection: IndexProjection::All,
        }
    }

    fn desired() -> TableDescriptor {
        TableDescriptor::new("CustomersOrdersProducts", KeyAttribute::string("ID"))
            .with_sort_key(KeyAttribute::string("Area"))
            .with_index(status_index())
            .with_billing_mode(BillingMode::Provisioned { read: 10, write: 5 })
    }

    fn state(indexes: Vec<IndexState>) -> TableState {
        TableState {
            name: "CustomersOrdersProducts".to_string(),
            status: ResourceStatus::Active,
            partition_key: KeyAttribute::string("ID"),
            sort_key: Some(KeyAttribute::string("Area")),
            indexes,
            billing_mode: BillingMode::Provisioned { read: 10, write: 5 },
            item_count: Some(0),
        }
    }

    #[test]
    fn test_plan_creates_missing_table() {
        let plan = calculate_deploy_plan(None, &desired());
        assert_eq!(plan, DeployPlan::CreateTable { table: desired() });
    }

    #[test]
    fn test_plan_adds_missing_indexes() {
        let plan = calculate_deploy_plan(Some(&state(vec![])), &desired());
        assert_eq!(
            plan,
            DeployPlan::AddIndexes {
                table: desired(),
                indexes: vec![status_index()],
            }
        );
    }

    #[test]
    fn test_plan_no_changes() {
        let existing = IndexState {
            name: "StatusIndex".to_string(),
            status: ResourceStatus::Active,
            partition_key: KeyAttribute::string("Order_Status"),
            sort_key: Some(KeyAttribute::string("Order_Date")),
            projection: IndexProjection::All,
        };
        let plan = calculate_deploy_plan(Some(&state(vec![existing])), &desired());
        assert_eq!(
            plan,
            DeployPlan::NoChanges {
                table_name: "CustomersOrdersProducts".to_string()
            }
        );
    }

    #[test]
    fn test_format_create_plan() {
        let lines = format_deploy_plan(&DeployPlan::CreateTable { table: desired() });
        assert_eq!(
            lines,
            vec![
                "+ Create table: CustomersOrdersProducts",
                "  Partition key: ID (S)",
                "  Sort key: Area (S)",
                "  + Index: StatusIndex",
                "    Partition key: Order_Status (S)",
                "    Sort key: Order_Date (S)",
                "    Projection: ALL",
                "  Billing: PROVISIONED (read 10, write 5)",
            ]
        );
    }

    #[test]
    fn test_destroy_plan() {
        assert_eq!(
            calculate_destroy_plan(None, "Movies"),
            DestroyPlan::AlreadyGone {
                table_name: "Movies".to_string()
            }
        );
        let plan = calculate_destroy_plan(Some(&state(vec![])), "Movies");
        assert_eq!(
            format_destroy_plan(&plan),
            vec!["- Delete table: Movies (ALL DATA WILL BE LOST)"]
        );
    }
}
