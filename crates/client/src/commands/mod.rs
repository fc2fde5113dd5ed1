//! Command handlers.
//!
//! Handlers are generic over [`TableStore`] so they run the same against
//! DynamoDB and the in-memory store. Records go to `out`; progress messages
//! go to stderr.

mod index;
mod items;
mod scan;
mod table;

use std::borrow::Cow;
use std::io::Write;

use chrono::NaiveDate;
use dialoguer::Confirm;
use tablekit_core::model::TableDescriptor;
use tablekit_core::provisioning::{Poller, ProvisioningState, ProvisioningTask, Sleeper};
use tablekit_core::store::{StoreError, TableStore};

use crate::cli::{Commands, OutputFormat};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::prelude::aeprintln;

/// Everything a command needs, resolved once at startup.
pub struct Context<'a, S: ?Sized, Z> {
    pub store: &'a S,
    pub config: &'a Config,
    pub poller: Poller<Z>,
    pub format: OutputFormat,
    pub quiet: bool,
    /// Date used to name archive files.
    pub today: NaiveDate,
}

impl<S, Z> Context<'_, S, Z>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    fn status(&self, message: impl AsRef<str>) {
        if !self.quiet {
            aeprintln!("{}", message.as_ref());
        }
    }

    fn table_name(&self) -> &str {
        &self.config.table.name
    }

    /// The descriptor a read is built from. Indexes missing from the
    /// configuration are taken from the live table, so indexes created
    /// with `index create` can be queried.
    async fn read_table(&self, index: Option<&str>) -> Result<Cow<'_, TableDescriptor>> {
        let configured = &self.config.table;
        let Some(index) = index.filter(|name| configured.index(name).is_none()) else {
            return Ok(Cow::Borrowed(configured));
        };

        let state = self
            .store
            .describe_table(&configured.name)
            .await?
            .ok_or_else(|| StoreError::table_not_found(&configured.name))?;
        tracing::debug!(
            table = %configured.name,
            index,
            "index not configured, using live table"
        );

        let mut table = configured.clone();
        table.indexes.extend(
            state
                .indexes
                .iter()
                .filter(|live| configured.index(&live.name).is_none())
                .map(|live| live.to_descriptor()),
        );
        Ok(Cow::Owned(table))
    }
}

/// Runs one parsed command.
pub async fn run<S, Z, W>(ctx: &Context<'_, S, Z>, command: Commands, out: &mut W) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
    W: Write,
{
    match command {
        Commands::Table(cmd) => table::run(ctx, cmd.action, out).await,
        Commands::Index(cmd) => index::run(ctx, cmd.action).await,
        Commands::Load(args) => items::load(ctx, args).await,
        Commands::Put(args) => items::put(ctx, args).await,
        Commands::Get(args) => items::get(ctx, args, out).await,
        Commands::Scan(cmd) => scan::run(ctx, cmd, out).await,
        Commands::Update(args) => items::update(ctx, args).await,
        Commands::Delete(args) => items::delete(ctx, args).await,
    }
}

/// Turns a finished provisioning task into a command result.
fn ensure_active(task: &ProvisioningTask) -> Result<()> {
    match task.state {
        ProvisioningState::Active => Ok(()),
        ProvisioningState::Failed => Err(ClientError::ProvisioningFailed {
            resource: task.resource.clone(),
        }),
        ProvisioningState::TimedOut | ProvisioningState::Creating => {
            Err(ClientError::ProvisioningTimedOut {
                resource: task.resource.clone(),
            })
        }
    }
}

fn confirm(prompt: &str, default: bool) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| ClientError::Prompt(e.to_string()))?;

    if confirmed {
        Ok(())
    } else {
        Err(ClientError::UserCancelled)
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::{context, output};
    use super::*;
    use crate::cli::index::{IndexAction, IndexCommand};
    use crate::cli::items::{GetArgs, PutArgs};
    use tablekit_core::query::QueryError;
    use tablekit_core::store::InMemoryStore;

    fn task(state: ProvisioningState) -> ProvisioningTask {
        ProvisioningTask {
            resource: "Orders".to_string(),
            state,
            attempts: 3,
            waited: Duration::from_secs(3),
        }
    }

    #[test]
    fn test_ensure_active() {
        assert!(ensure_active(&task(ProvisioningState::Active)).is_ok());
        assert!(matches!(
            ensure_active(&task(ProvisioningState::TimedOut)),
            Err(ClientError::ProvisioningTimedOut { .. })
        ));
        assert!(matches!(
            ensure_active(&task(ProvisioningState::Failed)),
            Err(ClientError::ProvisioningFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_through_index_created_at_runtime() {
        let store = InMemoryStore::new().with_activation_delay(1);
        let config = Config::default();
        store.create_table(&config.table).await.unwrap();
        let ctx = context(&store, &config);

        let put = PutArgs {
            keys: ["ID", "Area", "Order_Status", "Order_ID"].map(String::from).to_vec(),
            values: ["42", "Order", "pending", "7"].map(String::from).to_vec(),
        };
        run(&ctx, Commands::Put(put), &mut Vec::new()).await.unwrap();

        let create = IndexCommand {
            action: IndexAction::Create {
                name: "StatusIndex".to_string(),
                partition_key: "Order_Status".to_string(),
                numeric_partition: false,
                sort_key: None,
                numeric_sort: false,
                include: vec![],
            },
        };
        run(&ctx, Commands::Index(create), &mut Vec::new()).await.unwrap();
        assert!(config.table.index("StatusIndex").is_none());

        let get = GetArgs {
            partition: "pending".to_string(),
            sort: None,
            index: Some("StatusIndex".to_string()),
            projection: vec!["Order_ID".to_string()],
        };
        let mut buffer = Vec::new();
        run(&ctx, Commands::Get(get), &mut buffer).await.unwrap();

        let text = output(buffer);
        assert!(text.contains("ID: 42\n"));
        assert!(text.contains("Order_Status: pending\n"));
        assert!(text.contains("Order_ID: 7\n"));
    }

    #[tokio::test]
    async fn test_get_through_unknown_index_is_rejected() {
        let store = InMemoryStore::new();
        let config = Config::default();
        store.create_table(&config.table).await.unwrap();
        let ctx = context(&store, &config);

        let get = GetArgs {
            partition: "pending".to_string(),
            sort: None,
            index: Some("StatusIndex".to_string()),
            projection: vec![],
        };
        let error = run(&ctx, Commands::Get(get), &mut Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ClientError::Query(QueryError::UnknownIndex { .. })
        ));
    }
}
