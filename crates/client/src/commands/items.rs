//! Item commands: load, put, get, update, delete.

use std::io::Write;
use std::path::Path;

use tablekit_core::ingest::{
    csv_rows, json_rows, record_from_pairs, IngestError, IngestOptions, RowIngestor, SourceRow,
};
use tablekit_core::model::ItemKey;
use tablekit_core::mutation::{LoadReport, MutationEngine, UpdateOutcome, Vocabulary};
use tablekit_core::provisioning::Sleeper;
use tablekit_core::query::{build_request, QuerySpec};
use tablekit_core::store::TableStore;

use super::Context;
use crate::cli::items::{GetArgs, KeyArgs, LoadArgs, PutArgs, UpdateArgs};
use crate::error::{ClientError, Result};
use crate::output::format_items;
use crate::prelude::{p_g, p_y};

/// Sort key constant for each file: none, one shared value, or one per file.
fn sort_values(files: usize, values: &[String]) -> Result<Vec<Option<&str>>> {
    match values.len() {
        0 => Ok(vec![None; files]),
        1 => Ok(vec![Some(values[0].as_str()); files]),
        n if n == files => Ok(values.iter().map(|v| Some(v.as_str())).collect()),
        n => Err(ClientError::InvalidInput(format!(
            "expected 1 or {files} --sort-value values, got {n}"
        ))),
    }
}

async fn load_rows<S, Z, I>(
    ctx: &Context<'_, S, Z>,
    rows: I,
    options: IngestOptions,
) -> Result<LoadReport>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
    I: Iterator<Item = std::result::Result<SourceRow, IngestError>>,
{
    let ingestor = RowIngestor::new(rows, options)?;
    let report = MutationEngine::new(ctx.store)
        .load(ctx.table_name(), ingestor)
        .await?;
    Ok(report)
}

async fn load_file<S, Z>(
    ctx: &Context<'_, S, Z>,
    path: &Path,
    json: bool,
    options: IngestOptions,
) -> Result<LoadReport>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    if json {
        let text = std::fs::read_to_string(path)?;
        load_rows(ctx, json_rows(&text), options).await
    } else {
        let file = std::fs::File::open(path)?;
        load_rows(ctx, csv_rows(file), options).await
    }
}

/// Loads files in order; each file continues the key sequence of the last.
pub async fn load<S, Z>(ctx: &Context<'_, S, Z>, args: LoadArgs) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    let sort_values = sort_values(args.files.len(), &args.sort_value)?;
    let mut next_index = args.start_index;
    let mut total = 0;

    for (path, sort_value) in args.files.iter().zip(sort_values) {
        let mut options = IngestOptions::for_table(&ctx.config.table, next_index);
        if let Some(value) = sort_value {
            options = options.with_sort_value(value);
        }
        tracing::info!(file = %path.display(), start_index = next_index, "loading file");
        let report = load_file(ctx, path, args.json, options).await?;
        ctx.status(format!(
            "Loaded {} items from {} (next index {})",
            report.written,
            path.display(),
            report.next_index
        ));
        total += report.written;
        next_index = report.next_index;
    }

    ctx.status(p_g(&format!(
        "Loaded {} items into {}",
        total,
        ctx.table_name()
    )));
    Ok(())
}

pub async fn put<S, Z>(ctx: &Context<'_, S, Z>, args: PutArgs) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    let record = record_from_pairs(&ctx.config.table, &args.keys, &args.values)?;
    let ack = MutationEngine::new(ctx.store)
        .put(ctx.table_name(), &record)
        .await?;
    ctx.status(p_g(&format!("Added item {} to {}", ack.key, ack.table)));
    Ok(())
}

pub async fn get<S, Z, W>(ctx: &Context<'_, S, Z>, args: GetArgs, out: &mut W) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
    W: Write,
{
    let table = ctx.read_table(args.index.as_deref()).await?;
    let mut spec = QuerySpec::key(args.partition, args.sort).project(args.projection);
    if let Some(index) = args.index {
        spec = spec.on_index(index);
    }
    let request = build_request(&table, &spec)?;
    tracing::debug!(request = %request, "executing");
    let items = ctx.store.execute(&request).await?;
    if items.is_empty() {
        ctx.status(p_y("No items found."));
    }
    write!(out, "{}", format_items(&items, ctx.format))?;
    Ok(())
}

fn item_key<S: ?Sized, Z>(ctx: &Context<'_, S, Z>, key: &KeyArgs) -> Result<ItemKey> {
    Ok(ItemKey::for_table(
        &ctx.config.table,
        &key.partition,
        key.sort.as_deref(),
    )?)
}

pub async fn update<S, Z>(ctx: &Context<'_, S, Z>, args: UpdateArgs) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    let key = item_key(ctx, &args.key)?;
    let allowed = if args.allowed.is_empty() {
        Vocabulary::order_statuses()
    } else {
        Vocabulary::new(args.allowed)
    };

    let outcome = MutationEngine::new(ctx.store)
        .conditional_update(
            ctx.table_name(),
            &key,
            &args.attribute,
            &args.value,
            &allowed,
            args.expected.as_deref(),
        )
        .await?;

    match outcome {
        UpdateOutcome::Applied(ack) => {
            ctx.status(p_g(&format!(
                "Set {} to {} on {}",
                args.attribute, args.value, ack.key
            )));
            Ok(())
        }
        UpdateOutcome::Rejected(rejection) => Err(ClientError::Rejected {
            attribute: rejection.attribute,
            value: rejection.value,
            allowed: rejection.allowed.join(", "),
        }),
    }
}

pub async fn delete<S, Z>(ctx: &Context<'_, S, Z>, args: KeyArgs) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    let key = item_key(ctx, &args)?;
    let ack = MutationEngine::new(ctx.store)
        .delete(ctx.table_name(), &key)
        .await?;
    ctx.status(p_g(&format!("Deleted item {} from {}", ack.key, ack.table)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::testing::{context, output};
    use crate::config::Config;
    use tablekit_core::model::TypedValue;
    use tablekit_core::mutation::LoadError;
    use tablekit_core::store::InMemoryStore;

    const CUSTOMERS: &str = "Customer_ID,Customer_Name\n1,Ada\n2,Grace\n";
    const ORDERS: &str = "\
Order_ID,Order_Customer,Order_Product,Order_Date,Order_Status
1,1,3,2020-04-01 10:00:00,delivered
2,2,3,2020-06-15 12:30:00,pending
";

    async fn provisioned() -> (InMemoryStore, Config) {
        let store = InMemoryStore::new();
        let config = Config::default();
        store.create_table(&config.table).await.unwrap();
        (store, config)
    }

    fn key(partition: &str, sort: &str) -> KeyArgs {
        KeyArgs {
            partition: partition.to_string(),
            sort: Some(sort.to_string()),
        }
    }

    #[test]
    fn test_sort_values() {
        let one = vec!["Order".to_string()];
        assert_eq!(sort_values(2, &one).unwrap(), vec![Some("Order"); 2]);
        assert_eq!(sort_values(2, &[]).unwrap(), vec![None, None]);
        let two = vec!["Customer".to_string(), "Order".to_string()];
        assert_eq!(
            sort_values(2, &two).unwrap(),
            vec![Some("Customer"), Some("Order")]
        );
        assert!(sort_values(3, &two).is_err());
    }

    #[tokio::test]
    async fn test_load_chains_files() {
        let (store, config) = provisioned().await;
        let ctx = context(&store, &config);
        let dir = tempfile::tempdir().unwrap();
        let customers = dir.path().join("customers.csv");
        let orders = dir.path().join("orders.csv");
        std::fs::write(&customers, CUSTOMERS).unwrap();
        std::fs::write(&orders, ORDERS).unwrap();

        let args = LoadArgs {
            files: vec![customers, orders],
            start_index: 10,
            sort_value: vec!["Customer".to_string(), "Order".to_string()],
            json: false,
        };
        load(&ctx, args).await.unwrap();

        let items = store.items("CustomersOrdersProducts").await;
        let keys: Vec<String> = items
            .iter()
            .map(|item| {
                format!(
                    "{}/{}",
                    item.get("ID").unwrap(),
                    item.get("Area").unwrap()
                )
            })
            .collect();
        assert_eq!(
            keys,
            vec!["10/Customer", "11/Customer", "12/Order", "13/Order"]
        );
        assert_eq!(
            items[3].get("Order_Date"),
            Some(&TypedValue::Timestamp(1592224200))
        );
    }

    #[tokio::test]
    async fn test_load_json_file() {
        let (store, config) = provisioned().await;
        let ctx = context(&store, &config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[
                {"Product_ID": 1, "Product_Quantity": 40},
                {"Product_ID": 2, "Product_Quantity": 150}
            ]"#,
        )
        .unwrap();

        let args = LoadArgs {
            files: vec![path],
            start_index: 0,
            sort_value: vec!["Product".to_string()],
            json: true,
        };
        load(&ctx, args).await.unwrap();

        let items = store.items("CustomersOrdersProducts").await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get("Product_Quantity"), Some(&TypedValue::number(150)));
    }

    #[tokio::test]
    async fn test_load_stops_at_malformed_row() {
        let (store, config) = provisioned().await;
        let ctx = context(&store, &config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "Order_ID,Order_Status\n1,pending\n2\n").unwrap();

        let args = LoadArgs {
            files: vec![path],
            start_index: 0,
            sort_value: vec!["Order".to_string()],
            json: false,
        };
        let error = load(&ctx, args).await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Load(LoadError::Aborted { written: 1, .. })
        ));
        assert_eq!(store.items("CustomersOrdersProducts").await.len(), 1);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (store, config) = provisioned().await;
        let ctx = context(&store, &config);

        let args = PutArgs {
            keys: ["ID", "Area", "Order_Status"].map(String::from).to_vec(),
            values: ["42", "Order", "pending"].map(String::from).to_vec(),
        };
        put(&ctx, args).await.unwrap();

        let args = GetArgs {
            partition: "42".to_string(),
            sort: Some("Order".to_string()),
            index: None,
            projection: vec!["Order_Status".to_string()],
        };
        let mut buffer = Vec::new();
        get(&ctx, args, &mut buffer).await.unwrap();
        assert_eq!(
            output(buffer),
            "ID: 42\nArea: Order\nOrder_Status: pending\n\n"
        );
    }

    #[tokio::test]
    async fn test_get_as_json() {
        let (store, config) = provisioned().await;
        let mut ctx = context(&store, &config);
        ctx.format = OutputFormat::Json;

        let args = GetArgs {
            partition: "404".to_string(),
            sort: None,
            index: None,
            projection: vec![],
        };
        let mut buffer = Vec::new();
        get(&ctx, args, &mut buffer).await.unwrap();
        assert_eq!(output(buffer), "[]\n");
    }

    #[tokio::test]
    async fn test_update_and_rejection() {
        let (store, config) = provisioned().await;
        let ctx = context(&store, &config);
        let args = PutArgs {
            keys: ["ID", "Area", "Order_Status"].map(String::from).to_vec(),
            values: ["7", "Order", "pending"].map(String::from).to_vec(),
        };
        put(&ctx, args).await.unwrap();

        let update_args = |value: &str| UpdateArgs {
            key: key("7", "Order"),
            attribute: "Order_Status".to_string(),
            value: value.to_string(),
            allowed: vec![],
            expected: None,
        };

        update(&ctx, update_args("delivering")).await.unwrap();
        let items = store.items("CustomersOrdersProducts").await;
        assert_eq!(
            items[0].get("Order_Status"),
            Some(&TypedValue::string("delivering"))
        );

        let calls = store.calls();
        let error = update(&ctx, update_args("shipped")).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Value \"shipped\" is not allowed for Order_Status \
             (allowed: backordered, delivered, delivering, pending)"
        );
        assert_eq!(store.calls(), calls);
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, config) = provisioned().await;
        let ctx = context(&store, &config);
        let args = PutArgs {
            keys: ["ID", "Area"].map(String::from).to_vec(),
            values: ["7", "Order"].map(String::from).to_vec(),
        };
        put(&ctx, args).await.unwrap();

        delete(&ctx, key("7", "Order")).await.unwrap();
        assert!(store.items("CustomersOrdersProducts").await.is_empty());

        let error = delete(
            &ctx,
            KeyArgs {
                partition: "7".to_string(),
                sort: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(error, ClientError::Record(_)));
    }
}
