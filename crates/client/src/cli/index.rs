//! Index CLI commands.

use clap::{Parser, Subcommand};

/// Secondary index commands.
#[derive(Debug, Parser)]
pub struct IndexCommand {
    #[command(subcommand)]
    pub action: IndexAction,
}

#[derive(Debug, Subcommand)]
pub enum IndexAction {
    /// Add a global secondary index and wait until it is active.
    Create {
        /// Index name.
        name: String,
        /// Partition key of the index.
        #[arg(long)]
        partition_key: String,
        /// Treat the index partition key as a number.
        #[arg(long)]
        numeric_partition: bool,
        /// Sort key of the index.
        #[arg(long)]
        sort_key: Option<String>,
        /// Treat the index sort key as a number.
        #[arg(long, requires = "sort_key")]
        numeric_sort: bool,
        /// Project only these non-key attributes (all attributes when omitted).
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,
    },
}
