use std::collections::HashSet;

use crate::model::{Item, ItemKey, Record, RecordError, TableDescriptor};
use crate::typing::infer_type;

use super::error::{IngestError, Result};

/// Builds one record from parallel name and value lists.
///
/// Key attributes are typed by the table's declaration, every other
/// attribute by inference. Errors report row 1.
pub fn record_from_pairs(
    table: &TableDescriptor,
    names: &[String],
    values: &[String],
) -> Result<Record> {
    let invalid = |source: RecordError| IngestError::InvalidRecord { row: 1, source };

    if names.len() != values.len() {
        return Err(invalid(RecordError::UnmatchedPairs {
            keys: names.len(),
            values: values.len(),
        }));
    }
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(IngestError::Malformed {
                row: 1,
                message: "attribute names cannot be empty".to_string(),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(IngestError::DuplicateColumn {
                column: name.clone(),
            });
        }
    }

    let lookup = |wanted: &str| {
        names
            .iter()
            .zip(values)
            .find(|(name, _)| *name == wanted)
            .map(|(_, value)| value.as_str())
    };

    let partition_name = &table.partition_key.name;
    let partition = lookup(partition_name.as_str()).ok_or_else(|| {
        invalid(RecordError::MissingPartitionKey {
            table: table.name.clone(),
            name: partition_name.clone(),
        })
    })?;
    let sort = table
        .sort_key
        .as_ref()
        .map(|attribute| {
            lookup(attribute.name.as_str()).ok_or_else(|| {
                invalid(RecordError::MissingSortKey {
                    table: table.name.clone(),
                    name: attribute.name.clone(),
                })
            })
        })
        .transpose()?;
    let key = ItemKey::for_table(table, partition, sort).map_err(invalid)?;

    let mut attributes = Item::new();
    for (name, raw) in names.iter().zip(values) {
        if table.is_key_attribute(name) {
            continue;
        }
        let value =
            infer_type(name, raw).map_err(|source| IngestError::TypeParse { row: 1, source })?;
        attributes.insert(name.clone(), value);
    }

    Record::new(key, attributes).map_err(invalid)
}
