//! tablekit CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tablekit_client::cli::Cli;
use tablekit_client::commands::{self, Context};
use tablekit_client::dynamodb::{create_client, DynamoDbStore};
use tablekit_client::prelude::{aeprintln, p_r};
use tablekit_client::{Config, Result};
use tablekit_core::provisioning::Poller;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose {
        "tablekit=debug"
    } else {
        "tablekit=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            aeprintln!("{} {}", p_r("Error:"), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.global.config.as_deref(), &cli.global.overrides())?;
    tracing::debug!(
        table = %config.table.name,
        destination = %config.target_display(),
        "configuration resolved"
    );

    let client = create_client(&config).await;
    let store = DynamoDbStore::new(client);
    let ctx = Context {
        store: &store,
        config: &config,
        poller: Poller::with_settings(config.poll),
        format: cli.global.format,
        quiet: cli.global.quiet,
        today: chrono::Utc::now().date_naive(),
    };

    let mut out = anstream::stdout();
    commands::run(&ctx, cli.command, &mut out).await
}
