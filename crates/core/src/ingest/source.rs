//! Row sources: turn raw input into rows of text fields.
//!
//! The first row of every source is the header. Each row carries the line it
//! was read from so diagnostics point at the input, not at a record count.

use std::io::{Cursor, Read};

use csv::StringRecord;

use serde_json::{Map, Value};

use super::error::{IngestError, Result};

/// One row of text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 1-based line (CSV) or object ordinal counting the header (JSON).
    pub line: usize,
    pub fields: Vec<String>,
}

impl SourceRow {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }
}

/// Line a record starts on. Record positions point just past the previous
/// record, before the blank lines the reader skips.
fn record_line(input: &[u8], position: Option<&csv::Position>) -> usize {
    let Some(position) = position else {
        return 1;
    };
    let start = usize::try_from(position.byte())
        .unwrap_or(input.len())
        .min(input.len());
    let skipped = input[start..]
        .iter()
        .take_while(|b| matches!(b, b'\n' | b'\r'))
        .filter(|b| **b == b'\n')
        .count();
    usize::try_from(position.line()).unwrap_or(usize::MAX) + skipped
}

/// Reads comma-separated rows. Quoted fields are honoured, nothing is
/// trimmed, and rows of any length are passed through so the ingestor can
/// report count mismatches itself. Blank lines are skipped but still count
/// towards line numbers.
pub fn csv_rows<R: Read>(mut source: R) -> impl Iterator<Item = Result<SourceRow>> {
    let mut input = Vec::new();
    let mut pending = source
        .read_to_end(&mut input)
        .err()
        .map(|err| IngestError::Malformed {
            row: 1,
            message: err.to_string(),
        });
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(input));
    let mut done = false;

    std::iter::from_fn(move || {
        if let Some(err) = pending.take() {
            done = true;
            return Some(Err(err));
        }
        if done {
            return None;
        }
        let mut record = StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(true) => {
                let line = record_line(reader.get_ref().get_ref(), record.position());
                Some(Ok(SourceRow::new(
                    line,
                    record.iter().map(str::to_string).collect(),
                )))
            }
            Ok(false) => {
                done = true;
                None
            }
            Err(err) => {
                done = true;
                Some(Err(IngestError::Malformed {
                    row: record_line(reader.get_ref().get_ref(), err.position()),
                    message: err.to_string(),
                }))
            }
        }
    })
}

/// Reads a JSON array of flat objects.
///
/// The keys of the first object form the header; every object must carry
/// exactly those keys. Strings are taken verbatim, numbers by their JSON
/// text and booleans as `true`/`false`.
pub fn json_rows(text: &str) -> impl Iterator<Item = Result<SourceRow>> {
    let rows = match serde_json::from_str::<Vec<Map<String, Value>>>(text) {
        Ok(objects) => object_rows(&objects),
        Err(err) => vec![Err(IngestError::Malformed {
            row: 1,
            message: err.to_string(),
        })],
    };
    rows.into_iter()
}

fn object_rows(objects: &[Map<String, Value>]) -> Vec<Result<SourceRow>> {
    let Some(first) = objects.first() else {
        return Vec::new();
    };
    let header: Vec<String> = first.keys().cloned().collect();

    let mut rows = vec![Ok(SourceRow::new(1, header.clone()))];
    for (index, object) in objects.iter().enumerate() {
        let row = index + 2;
        let fields = object_fields(row, &header, object).map(|f| SourceRow::new(row, f));
        let failed = fields.is_err();
        rows.push(fields);
        if failed {
            break;
        }
    }
    rows
}

fn object_fields(
    row: usize,
    header: &[String],
    object: &Map<String, Value>,
) -> Result<Vec<String>> {
    if object.len() != header.len() {
        return Err(IngestError::ColumnCountMismatch {
            row,
            expected: header.len(),
            found: object.len(),
        });
    }
    header
        .iter()
        .map(|column| match object.get(column) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(_) => Err(IngestError::UnsupportedValue {
                row,
                column: column.clone(),
            }),
            None => Err(IngestError::MissingField {
                row,
                column: column.clone(),
            }),
        })
        .collect()
}
