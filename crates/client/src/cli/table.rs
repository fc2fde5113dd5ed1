//! Table CLI commands.

use clap::{Parser, Subcommand};

/// Table management commands.
#[derive(Debug, Parser)]
pub struct TableCommand {
    #[command(subcommand)]
    pub action: TableAction,
}

/// Read and write capacity units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub read: i64,
    pub write: i64,
}

/// Available table actions.
#[derive(Debug, Subcommand)]
pub enum TableAction {
    /// Create the table unless it exists and wait until it is active.
    Create {
        /// Sort key name, overriding the configured one.
        #[arg(long, conflicts_with = "no_sort_key")]
        sort_key: Option<String>,
        /// Create the table with a partition key only.
        #[arg(long)]
        no_sort_key: bool,
        /// Provisioned capacity as READ,WRITE (on-demand when omitted).
        #[arg(long, value_parser = parse_capacity)]
        provisioned: Option<Capacity>,
    },
    /// Show status, keys, indexes and item count.
    Describe,
    /// List table names.
    List,
    /// Delete the table.
    Drop {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },
    /// Create the configured table or add its missing indexes.
    Deploy {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Parses `READ,WRITE` capacity units.
pub fn parse_capacity(s: &str) -> Result<Capacity, String> {
    let (read, write) = s
        .split_once(',')
        .ok_or_else(|| format!("expected READ,WRITE, got {s:?}"))?;
    let units = |raw: &str| -> Result<i64, String> {
        match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("capacity units must be positive integers, got {raw:?}")),
        }
    };
    Ok(Capacity {
        read: units(read)?,
        write: units(write)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capacity() {
        assert_eq!(
            parse_capacity("10,5"),
            Ok(Capacity { read: 10, write: 5 })
        );
        assert_eq!(
            parse_capacity(" 1 , 2 "),
            Ok(Capacity { read: 1, write: 2 })
        );
        assert!(parse_capacity("10").is_err());
        assert!(parse_capacity("10,0").is_err());
        assert!(parse_capacity("a,5").is_err());
    }
}
