//! Table commands: create, describe, list, drop, deploy.

use std::io::Write;

use tablekit_core::model::{BillingMode, KeyAttribute, TableDescriptor};
use tablekit_core::provisioning::{
    calculate_deploy_plan, calculate_destroy_plan, create_table_and_wait, execute_deploy_plan,
    execute_destroy_plan, format_deploy_plan, format_destroy_plan, DeployPlan, DestroyPlan,
    Sleeper,
};
use tablekit_core::store::{StoreError, TableStore};

use super::{confirm, ensure_active, Context};
use crate::cli::table::{Capacity, TableAction};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::{json, pretty};
use crate::prelude::{p_b, p_c, p_g, p_y, paint_plan_line};

pub async fn run<S, Z, W>(ctx: &Context<'_, S, Z>, action: TableAction, out: &mut W) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
    W: Write,
{
    match action {
        TableAction::Create {
            sort_key,
            no_sort_key,
            provisioned,
        } => {
            let table = creation_descriptor(&ctx.config.table, sort_key, no_sort_key, provisioned);
            create(ctx, &table).await
        }
        TableAction::Describe => describe(ctx, out).await,
        TableAction::List => list(ctx, out).await,
        TableAction::Drop { force } => drop_table(ctx, force).await,
        TableAction::Deploy { force } => deploy(ctx, force).await,
    }
}

/// Applies the command line overrides to the configured table.
fn creation_descriptor(
    configured: &TableDescriptor,
    sort_key: Option<String>,
    no_sort_key: bool,
    provisioned: Option<Capacity>,
) -> TableDescriptor {
    let mut table = configured.clone();
    if no_sort_key {
        table.sort_key = None;
    } else if let Some(name) = sort_key {
        table.sort_key = Some(KeyAttribute::string(name));
    }
    if let Some(Capacity { read, write }) = provisioned {
        table.billing_mode = BillingMode::Provisioned { read, write };
    }
    table
}

async fn create<S, Z>(ctx: &Context<'_, S, Z>, table: &TableDescriptor) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    ctx.status(format!("{} {}", p_b("Creating table"), table.name));
    let task = create_table_and_wait(ctx.store, &ctx.poller, table).await?;
    ensure_active(&task)?;
    ctx.status(p_g(&format!(
        "Table {} is active ({} attempts, waited {}ms)",
        table.name,
        task.attempts,
        task.waited.as_millis()
    )));
    Ok(())
}

async fn describe<S, Z, W>(ctx: &Context<'_, S, Z>, out: &mut W) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
    W: Write,
{
    let state = ctx
        .store
        .describe_table(ctx.table_name())
        .await?
        .ok_or_else(|| StoreError::table_not_found(ctx.table_name()))?;
    match ctx.format {
        OutputFormat::Json => {
            let value = json::table_state_to_json(&state);
            writeln!(out, "{}", json::format_json(&value))?
        }
        OutputFormat::Pretty => writeln!(out, "{}", pretty::format_table_state(&state))?,
    }
    Ok(())
}

async fn list<S, Z, W>(ctx: &Context<'_, S, Z>, out: &mut W) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
    W: Write,
{
    let names = ctx.store.list_tables().await?;
    match ctx.format {
        OutputFormat::Json => writeln!(out, "{}", json::format_json(&names))?,
        OutputFormat::Pretty => writeln!(out, "{}", pretty::format_table_names(&names))?,
    }
    Ok(())
}

async fn drop_table<S, Z>(ctx: &Context<'_, S, Z>, force: bool) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    ctx.status(format!("{} {}", p_b("Target:"), ctx.config.target_display()));
    let current = ctx.store.describe_table(ctx.table_name()).await?;
    let plan = calculate_destroy_plan(current.as_ref(), ctx.table_name());

    ctx.status(p_y("Destroy Plan:"));
    for line in format_destroy_plan(&plan) {
        ctx.status(format!("  {}", paint_plan_line(&line)));
    }

    if matches!(plan, DestroyPlan::AlreadyGone { .. }) {
        ctx.status(p_g("Nothing to destroy."));
        return Ok(());
    }

    if !force {
        confirm(
            "Are you sure you want to delete this table? ALL DATA WILL BE LOST",
            false,
        )?;
    }

    execute_destroy_plan(ctx.store, &plan).await?;
    ctx.status(p_g("Table deleted."));
    Ok(())
}

async fn deploy<S, Z>(ctx: &Context<'_, S, Z>, force: bool) -> Result<()>
where
    S: TableStore + ?Sized,
    Z: Sleeper,
{
    ctx.status(format!("{} {}", p_b("Target:"), ctx.config.target_display()));
    let current = ctx.store.describe_table(ctx.table_name()).await?;
    let plan = calculate_deploy_plan(current.as_ref(), &ctx.config.table);

    ctx.status(p_c("Deploy Plan:"));
    for line in format_deploy_plan(&plan) {
        ctx.status(format!("  {}", paint_plan_line(&line)));
    }

    if matches!(plan, DeployPlan::NoChanges { .. }) {
        ctx.status(p_g("Table is up to date."));
        return Ok(());
    }

    if !force {
        confirm("Apply these changes?", true)?;
    }

    ctx.status(p_b("Applying changes..."));
    let tasks = execute_deploy_plan(ctx.store, &ctx.poller, &plan).await?;
    for task in &tasks {
        ensure_active(task)?;
    }
    ctx.status(p_g("Table deployed successfully."));
    Ok(())
}
