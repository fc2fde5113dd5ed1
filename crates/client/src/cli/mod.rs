//! CLI command definitions.

pub mod index;
pub mod items;
pub mod scan;
pub mod table;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Overrides;

/// Load, query and update records in a partition/sort keyed DynamoDB table.
#[derive(Debug, Parser)]
#[command(name = "tablekit")]
#[command(about = "Load, query and update records in a DynamoDB table", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command.
#[derive(Debug, Clone, Args)]
pub struct Global {
    /// JSON configuration file.
    #[arg(long, global = true, env = "TABLEKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// AWS region.
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom endpoint URL (for local DynamoDB).
    #[arg(long, global = true, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Table name.
    #[arg(long, global = true, env = "TABLEKIT_TABLE")]
    pub table: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,
}

impl Global {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            table: self.table.clone(),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable `attr: value` blocks.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Table management.
    Table(table::TableCommand),
    /// Secondary index management.
    Index(index::IndexCommand),
    /// Load CSV or JSON files, one item per row.
    Load(items::LoadArgs),
    /// Insert a single item from parallel key and value lists.
    Put(items::PutArgs),
    /// Look up items by key.
    Get(items::GetArgs),
    /// Scan the table.
    Scan(scan::ScanCommand),
    /// Update one attribute of an item, restricted to an allowed vocabulary.
    Update(items::UpdateArgs),
    /// Delete an item.
    Delete(items::KeyArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tablekit",
            "table",
            "describe",
            "--table",
            "Movies",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.global.table.as_deref(), Some("Movies"));
        assert_eq!(cli.global.format, OutputFormat::Json);
        assert_eq!(cli.global.overrides().table.as_deref(), Some("Movies"));
    }
}
