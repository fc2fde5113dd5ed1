use crate::ingest::{IngestError, RowIngestor, SourceRow};
use crate::model::{ItemKey, Record};
use crate::store::{AttributeUpdate, TableStore};
use crate::typing::infer_type;

use super::error::{LoadError, MutationError, Result};
use super::vocabulary::Vocabulary;

/// Acknowledgement of a single applied mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub table: String,
    pub key: ItemKey,
}

/// A value refused locally because it is outside the allowed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub attribute: String,
    pub value: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied(Ack),
    Rejected(Rejection),
}

/// Summary of a completed streaming load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub written: usize,
    pub next_index: u64,
}

/// Point writes against a store: one remote call per mutation, no retries.
pub struct MutationEngine<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> MutationEngine<'a, S>
where
    S: TableStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn put(&self, table: &str, record: &Record) -> Result<Ack> {
        self.store.put_item(table, record).await?;
        tracing::debug!(table = %table, key = %record.key(), "item written");
        Ok(Ack {
            table: table.to_string(),
            key: record.key().clone(),
        })
    }

    /// Sets `attribute` to `new_value` if the value belongs to `allowed`.
    ///
    /// Values outside the vocabulary are rejected without contacting the
    /// store. `expected_prior`, when given, must match the current value for
    /// the store to apply the update.
    pub async fn conditional_update(
        &self,
        table: &str,
        key: &ItemKey,
        attribute: &str,
        new_value: &str,
        allowed: &Vocabulary,
        expected_prior: Option<&str>,
    ) -> Result<UpdateOutcome> {
        if attribute.is_empty() {
            return Err(MutationError::EmptyAttribute);
        }
        if key.parts().any(|part| part.name == attribute) {
            return Err(MutationError::KeyAttribute {
                name: attribute.to_string(),
            });
        }
        if !allowed.contains(new_value) {
            tracing::info!(table = %table, attribute, value = new_value, "update rejected");
            return Ok(UpdateOutcome::Rejected(Rejection {
                attribute: attribute.to_string(),
                value: new_value.to_string(),
                allowed: allowed.values(),
            }));
        }

        let update = AttributeUpdate {
            attribute: attribute.to_string(),
            value: infer_type(attribute, new_value)?,
            expected_prior: expected_prior
                .map(|prior| infer_type(attribute, prior))
                .transpose()?,
        };
        self.store.update_item(table, key, &update).await?;
        tracing::debug!(table = %table, key = %key, attribute, "item updated");

        Ok(UpdateOutcome::Applied(Ack {
            table: table.to_string(),
            key: key.clone(),
        }))
    }

    pub async fn delete(&self, table: &str, key: &ItemKey) -> Result<Ack> {
        self.store.delete_item(table, key).await?;
        tracing::debug!(table = %table, key = %key, "item deleted");
        Ok(Ack {
            table: table.to_string(),
            key: key.clone(),
        })
    }

    /// Writes every record the ingestor yields, one put per record, as soon
    /// as it is parsed.
    pub async fn load<I>(
        &self,
        table: &str,
        mut ingestor: RowIngestor<I>,
    ) -> std::result::Result<LoadReport, LoadError>
    where
        I: Iterator<Item = std::result::Result<SourceRow, IngestError>>,
    {
        let mut written = 0;
        for next in ingestor.by_ref() {
            let record = next.map_err(|source| LoadError::Aborted { written, source })?;
            self.store
                .put_item(table, &record)
                .await
                .map_err(|source| LoadError::Store { written, source })?;
            written += 1;
            tracing::debug!(table = %table, key = %record.key(), "item written");
        }

        tracing::info!(
            table = %table,
            written,
            next_index = ingestor.next_index(),
            "load complete"
        );
        Ok(LoadReport {
            written,
            next_index: ingestor.next_index(),
        })
    }
}
