use std::io::Write;

use tablekit_core::provisioning::Sleeper;
use tablekit_core::query::{build_request, QuerySpec};
use tablekit_core::store::TableStore;

use super::Context;
use crate::cli::scan::{ScanAction, ScanCommand};
use crate::error::Result;
use crate::output::{archive, format_items};
use crate::prelude::{p_g, p_y};

fn attributes(projection: Vec<String>) -> Vec<String> {
    projection
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn query_spec(action: ScanAction) -> QuerySpec {
    match action {
        ScanAction::Full => QuerySpec::full(),
        ScanAction::Range {
            attribute,
            start,
            end,
            projection,
        } => QuerySpec::range(attribute, start, end).project(attributes(projection)),
        ScanAction::Equals {
            attribute,
            value,
            projection,
        } => QuerySpec::equality(attribute, value).project(attributes(projection)),
        ScanAction::Below {
            attribute,
            bound,
            projection,
        } => QuerySpec::threshold(attribute, bound).project(attributes(projection)),
    }
}

pub async fn run<S, Z, W>(ctx: &Context<'_, S, Z>, cmd: ScanCommand, out: &mut W) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
    W: Write,
{
    let table = ctx.read_table(cmd.index.as_deref()).await?;
    let mut spec = query_spec(cmd.action);
    if let Some(index) = cmd.index {
        spec = spec.on_index(index);
    }
    let request = build_request(&table, &spec)?;
    tracing::debug!(request = %request, "executing");

    let items = ctx.store.execute(&request).await?;
    ctx.status(p_y(&format!("{} items matched", items.len())));
    write!(out, "{}", format_items(&items, ctx.format))?;

    if let Some(dir) = cmd.archive {
        let path = archive::write_archive(&dir, ctx.table_name(), ctx.today, &items)?;
        ctx.status(p_g(&format!("Archived results to {}", path.display())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::testing::{context, output};
    use crate::config::Config;
    use crate::error::ClientError;
    use tablekit_core::ingest::record_from_pairs;
    use tablekit_core::query::QueryError;
    use tablekit_core::store::InMemoryStore;

    const ORDER_COLUMNS: [&str; 7] = [
        "ID",
        "Area",
        "Order_ID",
        "Order_Product",
        "Order_Date",
        "Order_Status",
        "Order_Customer",
    ];

    async fn seeded() -> (InMemoryStore, Config) {
        let store = InMemoryStore::new();
        let config = Config::default();
        store.create_table(&config.table).await.unwrap();

        let names = ORDER_COLUMNS.map(String::from).to_vec();
        let rows = [
            ["1", "Order", "1", "3", "2020-04-01 10:00:00", "delivered", "1"],
            ["2", "Order", "2", "3", "2020-06-15 12:30:00", "pending", "2"],
            ["3", "Order", "3", "5", "2020-07-20 08:00:00", "delivering", "1"],
        ];
        for row in rows {
            let values = row.map(String::from).to_vec();
            let record = record_from_pairs(&config.table, &names, &values).unwrap();
            store.put_item(&config.table.name, &record).await.unwrap();
        }
        let product = record_from_pairs(
            &config.table,
            &["ID", "Area", "Product_ID", "Product_Quantity"].map(String::from),
            &["4", "Product", "3", "40"].map(String::from),
        )
        .unwrap();
        store.put_item(&config.table.name, &product).await.unwrap();

        (store, config)
    }

    fn range() -> ScanAction {
        ScanAction::Range {
            attribute: "Order_Date".to_string(),
            start: "2020-05-04 05:00:00".to_string(),
            end: "2020-08-13 09:00:00".to_string(),
            projection: vec!["Order_ID".to_string(), " Order_Date ".to_string()],
        }
    }

    fn scan(action: ScanAction) -> ScanCommand {
        ScanCommand {
            action,
            index: None,
            archive: None,
        }
    }

    #[test]
    fn test_attributes_are_trimmed() {
        let names = vec![" Order_ID".to_string(), String::new(), "Order_Date ".to_string()];
        assert_eq!(attributes(names), vec!["Order_ID", "Order_Date"]);
    }

    #[tokio::test]
    async fn test_range_scan() {
        let (store, config) = seeded().await;
        let ctx = context(&store, &config);

        let mut buffer = Vec::new();
        run(&ctx, scan(range()), &mut buffer).await.unwrap();
        assert_eq!(
            output(buffer),
            "Order_ID: 2\nOrder_Date: 2020-06-15 12:30:00\n\n\
             Order_ID: 3\nOrder_Date: 2020-07-20 08:00:00\n\n"
        );
    }

    #[tokio::test]
    async fn test_equality_and_threshold_scans() {
        let (store, config) = seeded().await;
        let ctx = context(&store, &config);

        let equals = ScanAction::Equals {
            attribute: "Order_Product".to_string(),
            value: "3".to_string(),
            projection: vec!["Order_ID".to_string()],
        };
        let mut buffer = Vec::new();
        run(&ctx, scan(equals), &mut buffer).await.unwrap();
        assert_eq!(output(buffer), "Order_ID: 1\n\nOrder_ID: 2\n\n");

        let below = ScanAction::Below {
            attribute: "Product_Quantity".to_string(),
            bound: "100".to_string(),
            projection: vec!["Product_ID".to_string(), "Product_Quantity".to_string()],
        };
        let mut buffer = Vec::new();
        run(&ctx, scan(below), &mut buffer).await.unwrap();
        assert_eq!(output(buffer), "Product_ID: 3\nProduct_Quantity: 40\n\n");
    }

    #[tokio::test]
    async fn test_json_scan_ends_with_newline() {
        let (store, config) = seeded().await;
        let mut ctx = context(&store, &config);
        ctx.format = OutputFormat::Json;

        let below = ScanAction::Below {
            attribute: "Product_Quantity".to_string(),
            bound: "100".to_string(),
            projection: vec!["Product_ID".to_string()],
        };
        let mut buffer = Vec::new();
        run(&ctx, scan(below), &mut buffer).await.unwrap();
        assert_eq!(output(buffer), "[{\"Product_ID\":3}]\n");
    }

    #[tokio::test]
    async fn test_full_scan_returns_everything() {
        let (store, config) = seeded().await;
        let ctx = context(&store, &config);

        let mut buffer = Vec::new();
        run(&ctx, scan(ScanAction::Full), &mut buffer).await.unwrap();
        assert_eq!(output(buffer).matches("\n\n").count(), 4);
    }

    #[tokio::test]
    async fn test_scan_writes_archive() {
        let (store, config) = seeded().await;
        let ctx = context(&store, &config);
        let dir = tempfile::tempdir().unwrap();

        let mut command = scan(range());
        command.archive = Some(dir.path().join("archive"));
        let mut buffer = Vec::new();
        run(&ctx, command, &mut buffer).await.unwrap();

        let archived = std::fs::read_to_string(
            dir.path()
                .join("archive")
                .join("CustomersOrdersProducts-2020-08-13.txt"),
        )
        .unwrap();
        assert_eq!(archived, output(buffer));
    }

    #[tokio::test]
    async fn test_unknown_index_is_rejected() {
        let (store, config) = seeded().await;
        let ctx = context(&store, &config);
        let calls = store.calls();

        let mut command = scan(ScanAction::Full);
        command.index = Some("Missing".to_string());
        let error = run(&ctx, command, &mut Vec::new()).await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Query(QueryError::UnknownIndex { .. })
        ));
        // describe only, no read
        assert_eq!(store.calls(), calls + 1);
    }
}
