//! Item CLI commands.

use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// CSV (or JSON with --json) files, loaded in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Partition key of the first generated item.
    #[arg(long, default_value_t = 0)]
    pub start_index: u64,

    /// Sort key value for rows without a sort key column. Give one value for
    /// every file or one per file.
    #[arg(long)]
    pub sort_value: Vec<String>,

    /// Read files as JSON arrays of flat objects.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PutArgs {
    /// Attribute names, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub keys: Vec<String>,

    /// Attribute values, comma separated, in the same order as --keys.
    #[arg(long, value_delimiter = ',', required = true)]
    pub values: Vec<String>,
}

/// Primary key of a single item.
#[derive(Debug, Clone, Args)]
pub struct KeyArgs {
    /// Partition key value.
    pub partition: String,

    /// Sort key value.
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Partition key value.
    pub partition: String,

    /// Sort key value. Without it every item in the partition is returned.
    #[arg(long)]
    pub sort: Option<String>,

    /// Query a secondary index instead of the table.
    #[arg(long)]
    pub index: Option<String>,

    /// Attributes to return alongside the key attributes.
    #[arg(long, value_delimiter = ',')]
    pub projection: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Attribute to set.
    #[arg(long, default_value = "Order_Status")]
    pub attribute: String,

    /// New value.
    #[arg(long)]
    pub value: String,

    /// Allowed values, comma separated (order statuses when omitted).
    #[arg(long, value_delimiter = ',')]
    pub allowed: Vec<String>,

    /// Only update when the attribute currently holds this value.
    #[arg(long)]
    pub expected: Option<String>,
}
