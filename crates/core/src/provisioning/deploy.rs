//! Provisioning operations against a [`TableStore`].

use crate::model::{IndexDescriptor, TableDescriptor};
use crate::store::{self, ResourceStatus, StoreError, TableStore};

use super::error::{ProvisioningError, Result};
use super::plan::{DeployPlan, DestroyPlan};
use super::poller::{PollStatus, Poller, ProvisioningTask, Sleeper};

/// Checks a table: active once the table and all of its indexes are.
pub async fn check_table<S>(store: &S, table: &str) -> store::Result<PollStatus>
where
    S: TableStore + ?Sized,
{
    Ok(match store.describe_table(table).await? {
        None => PollStatus::NotFound,
        Some(state)
            if state.status == ResourceStatus::Active
                && state
                    .indexes
                    .iter()
                    .all(|index| index.status == ResourceStatus::Active) =>
        {
            PollStatus::Active
        }
        Some(_) => PollStatus::Pending,
    })
}

/// Checks one index of a table.
pub async fn check_index<S>(store: &S, table: &str, index: &str) -> store::Result<PollStatus>
where
    S: TableStore + ?Sized,
{
    let Some(state) = store.describe_table(table).await? else {
        return Ok(PollStatus::NotFound);
    };
    Ok(match state.index(index) {
        None => PollStatus::NotFound,
        Some(index) if index.status == ResourceStatus::Active => PollStatus::Active,
        Some(_) => PollStatus::Pending,
    })
}

/// Creates `table` unless it already exists, then waits for it to be active.
///
/// Losing a create race to another actor counts as the table already
/// existing.
pub async fn create_table_and_wait<S, Z>(
    store: &S,
    poller: &Poller<Z>,
    table: &TableDescriptor,
) -> Result<ProvisioningTask>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    let name = table.name.as_str();
    if store.describe_table(name).await?.is_some() {
        tracing::info!(table = %name, "table already exists");
    } else {
        match store.create_table(table).await {
            Ok(()) => tracing::info!(table = %name, "creating table"),
            Err(StoreError::AlreadyExists { .. }) => {
                tracing::info!(table = %name, "table was created concurrently");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let task = poller.run(name, move || check_table(store, name)).await?;
    Ok(task)
}

/// Adds `index` to an existing table unless present, then waits for the
/// index to be active.
pub async fn add_index_and_wait<S, Z>(
    store: &S,
    poller: &Poller<Z>,
    table: &TableDescriptor,
    index: &IndexDescriptor,
) -> Result<ProvisioningTask>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    let table_name = table.name.as_str();
    let index_name = index.name.as_str();
    let state = store
        .describe_table(table_name)
        .await?
        .ok_or_else(|| ProvisioningError::TableMissing {
            table: table_name.to_string(),
        })?;

    if state.index(index_name).is_some() {
        tracing::info!(table = %table_name, index = %index_name, "index already exists");
    } else {
        match store.add_index(table, index).await {
            Ok(()) => tracing::info!(table = %table_name, index = %index_name, "creating index"),
            Err(StoreError::AlreadyExists { .. }) => {
                tracing::info!(
                    table = %table_name,
                    index = %index_name,
                    "index was created concurrently"
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    let task = poller
        .run(index_name, move || check_index(store, table_name, index_name))
        .await?;
    Ok(task)
}

/// Executes a deploy plan. Stops at the first task that does not become
/// active and returns every task that ran.
pub async fn execute_deploy_plan<S, Z>(
    store: &S,
    poller: &Poller<Z>,
    plan: &DeployPlan,
) -> Result<Vec<ProvisioningTask>>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    let mut tasks = Vec::new();
    match plan {
        DeployPlan::CreateTable { table } => {
            tasks.push(create_table_and_wait(store, poller, table).await?);
        }
        DeployPlan::AddIndexes { table, indexes } => {
            for index in indexes {
                let task = add_index_and_wait(store, poller, table, index).await?;
                let active = task.is_active();
                tasks.push(task);
                if !active {
                    break;
                }
            }
        }
        DeployPlan::NoChanges { .. } => {}
    }
    Ok(tasks)
}

/// Executes a destroy plan.
pub async fn execute_destroy_plan<S>(store: &S, plan: &DestroyPlan) -> Result<()>
where
    S: TableStore + ?Sized,
{
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            store.delete_table(table_name).await?;
            tracing::info!(table = %table_name, "table deleted");
        }
        DestroyPlan::AlreadyGone { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IndexProjection, KeyAttribute};
    use crate::provisioning::poller::testing::RecordingSleeper;
    use crate::provisioning::poller::{PollSettings, ProvisioningState};
    use crate::store::InMemoryStore;

    fn orders() -> TableDescriptor {
        TableDescriptor::new("CustomersOrdersProducts", KeyAttribute::string("ID"))
            .with_sort_key(KeyAttribute::string("Area"))
    }

    fn status_index() -> IndexDescriptor {
        IndexDescriptor {
            name: "StatusIndex".to_string(),
            partition_key: KeyAttribute::string("Order_Status"),
            sort_key: None,
            projection: IndexProjection::All,
        }
    }

    fn poller(sleeper: &RecordingSleeper) -> Poller<RecordingSleeper> {
        Poller::new(PollSettings::default(), sleeper.clone())
    }

    #[tokio::test]
    async fn test_create_table_waits_until_active() {
        let store = InMemoryStore::new().with_activation_delay(2);
        let sleeper = RecordingSleeper::default();

        let task = create_table_and_wait(&store, &poller(&sleeper), &orders())
            .await
            .unwrap();

        assert!(task.is_active());
        assert_eq!(sleeper.recorded().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_existing_table_skips_create() {
        let store = InMemoryStore::new();
        store.create_table(&orders()).await.unwrap();
        let sleeper = RecordingSleeper::default();

        let task = create_table_and_wait(&store, &poller(&sleeper), &orders())
            .await
            .unwrap();

        assert!(task.is_active());
        // create, describe (exists check), describe (status)
        assert_eq!(store.calls(), 3);
    }

    #[tokio::test]
    async fn test_create_table_times_out() {
        let store = InMemoryStore::new().with_activation_delay(100);
        let sleeper = RecordingSleeper::default();

        let task = create_table_and_wait(&store, &poller(&sleeper), &orders())
            .await
            .unwrap();
        assert_eq!(task.state, ProvisioningState::TimedOut);
    }

    #[tokio::test]
    async fn test_add_index_requires_table() {
        let store = InMemoryStore::new();
        let sleeper = RecordingSleeper::default();

        let result =
            add_index_and_wait(&store, &poller(&sleeper), &orders(), &status_index()).await;
        assert_eq!(
            result,
            Err(ProvisioningError::TableMissing {
                table: "CustomersOrdersProducts".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_add_index_waits_for_index() {
        let store = InMemoryStore::new().with_activation_delay(1);
        let sleeper = RecordingSleeper::default();
        let poller = poller(&sleeper);
        create_table_and_wait(&store, &poller, &orders()).await.unwrap();

        let task = add_index_and_wait(&store, &poller, &orders(), &status_index())
            .await
            .unwrap();

        assert!(task.is_active());
        let state = store.describe_table("CustomersOrdersProducts").await.unwrap().unwrap();
        assert!(state.index("StatusIndex").is_some());
    }

    #[tokio::test]
    async fn test_execute_destroy_plan() {
        let store = InMemoryStore::new();
        store.create_table(&orders()).await.unwrap();

        let plan = DestroyPlan::DeleteTable {
            table_name: "CustomersOrdersProducts".to_string(),
        };
        execute_destroy_plan(&store, &plan).await.unwrap();
        assert!(store.list_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_no_changes_plan_does_nothing() {
        let store = InMemoryStore::new();
        let sleeper = RecordingSleeper::default();
        let plan = DeployPlan::NoChanges {
            table_name: "Movies".to_string(),
        };
        let tasks = execute_deploy_plan(&store, &poller(&sleeper), &plan).await.unwrap();
        assert!(tasks.is_empty());
        assert_eq!(store.calls(), 0);
    }
}
