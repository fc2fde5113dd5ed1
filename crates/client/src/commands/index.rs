use tablekit_core::model::{IndexDescriptor, IndexProjection, KeyAttribute};
use tablekit_core::provisioning::{add_index_and_wait, Sleeper};
use tablekit_core::store::TableStore;

use super::{ensure_active, Context};
use crate::cli::index::IndexAction;
use crate::error::Result;
use crate::prelude::{p_b, p_g};

pub async fn run<S, Z>(ctx: &Context<'_, S, Z>, action: IndexAction) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    match action {
        IndexAction::Create {
            name,
            partition_key,
            numeric_partition,
            sort_key,
            numeric_sort,
            include,
        } => {
            let key = |name: String, numeric: bool| {
                if numeric {
                    KeyAttribute::number(name)
                } else {
                    KeyAttribute::string(name)
                }
            };
            let index = IndexDescriptor {
                name,
                partition_key: key(partition_key, numeric_partition),
                sort_key: sort_key.map(|name| key(name, numeric_sort)),
                projection: if include.is_empty() {
                    IndexProjection::All
                } else {
                    IndexProjection::Include(include)
                },
            };

            ctx.status(format!(
                "{} {} on {}",
                p_b("Creating index"),
                index.name,
                ctx.table_name()
            ));
            let task = add_index_and_wait(ctx.store, &ctx.poller, &ctx.config.table, &index).await?;
            ensure_active(&task)?;
            ctx.status(p_g(&format!("Index {} is active", index.name)));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use crate::config::Config;
    use crate::error::ClientError;
    use tablekit_core::provisioning::ProvisioningError;
    use tablekit_core::store::{InMemoryStore, ResourceStatus};

    fn create_action() -> IndexAction {
        IndexAction::Create {
            name: "DateIndex".to_string(),
            partition_key: "Area".to_string(),
            numeric_partition: false,
            sort_key: Some("Order_Date".to_string()),
            numeric_sort: true,
            include: vec!["Order_Status".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_index() {
        let store = InMemoryStore::new().with_activation_delay(1);
        let config = Config::default();
        store.create_table(&config.table).await.unwrap();
        let ctx = context(&store, &config);

        run(&ctx, create_action()).await.unwrap();

        let state = store
            .describe_table("CustomersOrdersProducts")
            .await
            .unwrap()
            .unwrap();
        let index = state.index("DateIndex").unwrap();
        assert_eq!(index.status, ResourceStatus::Active);
        assert_eq!(
            index.sort_key.as_ref().map(|key| key.name.as_str()),
            Some("Order_Date")
        );
    }

    #[tokio::test]
    async fn test_create_index_on_missing_table() {
        let store = InMemoryStore::new();
        let config = Config::default();
        let ctx = context(&store, &config);

        let error = run(&ctx, create_action()).await.unwrap_err();
        assert!(matches!(
            error,
            ClientError::Provisioning(ProvisioningError::TableMissing { .. })
        ));
    }
}
