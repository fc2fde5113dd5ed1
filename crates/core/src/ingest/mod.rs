//! Record ingestion: header-led rows in, keyed typed records out.
//!
//! Sources ([`csv_rows`], [`json_rows`]) only split input into text fields.
//! [`RowIngestor`] owns the batch semantics: a fixed column count, generated
//! partition keys and per-column typing.

mod batch;
mod error;
mod pairs;
mod source;

pub use batch::{ingest_batch, IngestOptions, IngestedBatch, RowIngestor};
pub use error::{IngestError, Result};
pub use pairs::record_from_pairs;
pub use source::{csv_rows, json_rows, SourceRow};
