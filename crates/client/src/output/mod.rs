//! Output formatting functions.

pub mod archive;
pub mod json;
pub mod pretty;

use tablekit_core::model::Item;

use crate::cli::OutputFormat;

/// Format read results for stdout. Both formats end in a newline once
/// there is anything to print.
pub fn format_items(items: &[Item], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format!("{}\n", json::format_items(items)),
        OutputFormat::Pretty => pretty::format_items(items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_core::model::TypedValue;

    #[test]
    fn test_json_items_end_with_newline() {
        let items = vec![Item::new().with("Order_ID", TypedValue::number(2))];
        assert_eq!(
            format_items(&items, OutputFormat::Json),
            "[{\"Order_ID\":2}]\n"
        );
        assert_eq!(format_items(&[], OutputFormat::Json), "[]\n");
    }

    #[test]
    fn test_pretty_items_end_with_newline() {
        let items = vec![Item::new().with("Order_ID", TypedValue::number(2))];
        assert!(format_items(&items, OutputFormat::Pretty).ends_with('\n'));
        assert_eq!(format_items(&[], OutputFormat::Pretty), "");
    }
}
