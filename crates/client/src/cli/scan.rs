//! Scan CLI commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const ORDER_PROJECTION: &str = "Order_ID,Order_Customer,Order_Product,Order_Date,Order_Status";
const PRODUCT_PROJECTION: &str = "Product_ID,Product_Description,Product_Quantity,Product_Cost";

/// Scan commands.
#[derive(Debug, Parser)]
pub struct ScanCommand {
    #[command(subcommand)]
    pub action: ScanAction,

    /// Scan a secondary index instead of the table.
    #[arg(long, global = true)]
    pub index: Option<String>,

    /// Also write the results to `<table>-<yyyy-mm-dd>.txt` in this folder.
    #[arg(long, global = true)]
    pub archive: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ScanAction {
    /// Every item with every attribute.
    Full,
    /// Items whose date attribute falls strictly between two instants.
    Range {
        #[arg(long, default_value = "Order_Date")]
        attribute: String,
        /// Lower bound, `yyyy-MM-dd HH:mm:ss` (exclusive).
        #[arg(long, default_value = "2020-05-04 05:00:00")]
        start: String,
        /// Upper bound, `yyyy-MM-dd HH:mm:ss` (exclusive).
        #[arg(long, default_value = "2020-08-13 09:00:00")]
        end: String,
        /// Attributes to return, comma separated.
        #[arg(long, value_delimiter = ',', default_value = ORDER_PROJECTION)]
        projection: Vec<String>,
    },
    /// Items whose attribute equals a value.
    Equals {
        #[arg(long, default_value = "Order_Product")]
        attribute: String,
        #[arg(long, default_value = "3")]
        value: String,
        /// Attributes to return, comma separated.
        #[arg(long, value_delimiter = ',', default_value = ORDER_PROJECTION)]
        projection: Vec<String>,
    },
    /// Items whose numeric attribute is strictly below a bound.
    Below {
        #[arg(long, default_value = "Product_Quantity")]
        attribute: String,
        #[arg(long, default_value = "100")]
        bound: String,
        /// Attributes to return, comma separated.
        #[arg(long, value_delimiter = ',', default_value = PRODUCT_PROJECTION)]
        projection: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    use super::*;

    #[test]
    fn test_range_defaults() {
        let cli = Cli::try_parse_from(["tablekit", "scan", "range"]).unwrap();
        let Commands::Scan(scan) = cli.command else {
            panic!("expected scan");
        };
        let ScanAction::Range {
            attribute,
            start,
            end,
            projection,
        } = scan.action
        else {
            panic!("expected range");
        };
        assert_eq!(attribute, "Order_Date");
        assert_eq!(start, "2020-05-04 05:00:00");
        assert_eq!(end, "2020-08-13 09:00:00");
        assert_eq!(projection.len(), 5);
        assert_eq!(scan.archive, None);
    }

    #[test]
    fn test_archive_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tablekit", "scan", "below", "--archive", "out", "--bound", "7"])
                .unwrap();
        let Commands::Scan(scan) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(scan.archive, Some(PathBuf::from("out")));
        assert!(matches!(scan.action, ScanAction::Below { ref bound, .. } if bound == "7"));
    }
}
