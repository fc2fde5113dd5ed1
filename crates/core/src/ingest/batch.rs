use std::collections::HashSet;

use crate::model::{
    AttributeType, Decimal, Item, ItemKey, KeyAttribute, KeyValue, Record, RecordError,
    TableDescriptor, TypedValue,
};
use crate::typing::ColumnSchema;

use super::error::{IngestError, Result};
use super::source::SourceRow;

/// How records of one batch are keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub table: String,
    /// Receives the generated row index.
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    /// Sort-key value applied to every row when the header has no such column.
    pub sort_value: Option<String>,
    pub start_index: u64,
}

impl IngestOptions {
    pub fn for_table(table: &TableDescriptor, start_index: u64) -> Self {
        Self {
            table: table.name.clone(),
            partition_key: table.partition_key.clone(),
            sort_key: table.sort_key.clone(),
            sort_value: None,
            start_index,
        }
    }

    pub fn with_sort_value(mut self, sort_value: impl Into<String>) -> Self {
        self.sort_value = Some(sort_value.into());
        self
    }
}

#[derive(Debug, Clone)]
enum SortSource {
    None,
    Column { position: usize, attribute: KeyAttribute },
    Constant(KeyValue),
}

/// Streams typed records out of header-led rows.
///
/// The first error ends the stream: nothing is produced from the failing row
/// onward.
pub struct RowIngestor<I> {
    rows: I,
    columns: Vec<ColumnSchema>,
    partition_key: KeyAttribute,
    sort: SortSource,
    next_index: u64,
    finished: bool,
}

impl<I> RowIngestor<I>
where
    I: Iterator<Item = Result<SourceRow>>,
{
    /// Reads the header and prepares the column schemas.
    pub fn new<R>(rows: R, options: IngestOptions) -> Result<Self>
    where
        R: IntoIterator<IntoIter = I>,
    {
        let mut rows = rows.into_iter();
        let SourceRow {
            line: header_line,
            fields: header,
        } = rows.next().ok_or(IngestError::EmptyInput)??;
        if header.is_empty() {
            return Err(IngestError::EmptyInput);
        }

        let mut seen = HashSet::new();
        for column in &header {
            if !seen.insert(column.as_str()) {
                return Err(IngestError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        if seen.contains(options.partition_key.name.as_str()) {
            return Err(IngestError::ReservedColumn {
                column: options.partition_key.name.clone(),
            });
        }

        let sort = sort_source(&header, header_line, &options)?;
        let columns = header.into_iter().map(ColumnSchema::new).collect();

        Ok(Self {
            rows,
            columns,
            partition_key: options.partition_key,
            sort,
            next_index: options.start_index,
            finished: false,
        })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    /// Index the next record would receive.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    fn build(&self, row: usize, fields: Vec<String>) -> Result<Record> {
        if fields.len() != self.columns.len() {
            return Err(IngestError::ColumnCountMismatch {
                row,
                expected: self.columns.len(),
                found: fields.len(),
            });
        }
        let invalid = |source: RecordError| IngestError::InvalidRecord { row, source };

        let partition_value = match self.partition_key.attribute_type {
            AttributeType::String => TypedValue::String(self.next_index.to_string()),
            AttributeType::Number => TypedValue::Number(Decimal::from(self.next_index)),
        };
        let partition =
            KeyValue::new(self.partition_key.name.clone(), partition_value).map_err(invalid)?;

        let (sort, skip) = match &self.sort {
            SortSource::None => (None, None),
            SortSource::Constant(value) => (Some(value.clone()), None),
            SortSource::Column {
                position,
                attribute,
            } => {
                let value = attribute.value_from(&fields[*position]).map_err(invalid)?;
                let key = KeyValue::new(attribute.name.clone(), value).map_err(invalid)?;
                (Some(key), Some(*position))
            }
        };

        let mut attributes = Item::new();
        for (position, (column, raw)) in self.columns.iter().zip(&fields).enumerate() {
            if skip == Some(position) {
                continue;
            }
            let value = column
                .infer(raw)
                .map_err(|source| IngestError::TypeParse { row, source })?;
            attributes.insert(column.name.clone(), value);
        }

        Record::new(ItemKey::new(partition, sort), attributes).map_err(invalid)
    }
}

fn sort_source(header: &[String], line: usize, options: &IngestOptions) -> Result<SortSource> {
    let header_error = |source: RecordError| IngestError::InvalidRecord { row: line, source };

    let Some(attribute) = &options.sort_key else {
        if options.sort_value.is_some() {
            return Err(header_error(RecordError::UnexpectedSortKey {
                table: options.table.clone(),
            }));
        }
        return Ok(SortSource::None);
    };

    if let Some(position) = header.iter().position(|c| *c == attribute.name) {
        return Ok(SortSource::Column {
            position,
            attribute: attribute.clone(),
        });
    }
    match &options.sort_value {
        Some(raw) => {
            let value = attribute.value_from(raw).map_err(header_error)?;
            let key = KeyValue::new(attribute.name.clone(), value).map_err(header_error)?;
            Ok(SortSource::Constant(key))
        }
        None => Err(IngestError::MissingSortKey {
            name: attribute.name.clone(),
        }),
    }
}

impl<I> Iterator for RowIngestor<I>
where
    I: Iterator<Item = Result<SourceRow>>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(err) => {
                self.finished = true;
                return Some(Err(err));
            }
        };

        let result = self.build(row.line, row.fields);
        if result.is_ok() {
            self.next_index += 1;
        } else {
            self.finished = true;
        }
        Some(result)
    }
}

/// Records produced from one complete source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedBatch {
    pub records: Vec<Record>,
    /// First unused index, for chaining another source into the same keyspace.
    pub next_index: u64,
}

/// Ingests a whole source, all or nothing.
pub fn ingest_batch<R>(rows: R, options: IngestOptions) -> Result<IngestedBatch>
where
    R: IntoIterator<Item = Result<SourceRow>>,
{
    let mut ingestor = RowIngestor::new(rows, options)?;
    let records = ingestor.by_ref().collect::<Result<Vec<_>>>()?;
    Ok(IngestedBatch {
        records,
        next_index: ingestor.next_index(),
    })
}
