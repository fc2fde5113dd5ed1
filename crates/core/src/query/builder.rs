use crate::model::{Decimal, KeyAttribute, TableDescriptor, TypedValue};
use crate::typing::{infer_type, parse_timestamp};

use super::condition::{Comparator, Comparison, Condition};
use super::error::{QueryError, Result};
use super::request::{Projection, QueryRequest, RemoteRequest, ScanRequest};

/// Access patterns with their raw, not yet validated parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPattern {
    /// Lookup by partition key, optionally narrowed by the sort key.
    Key {
        partition: String,
        sort: Option<String>,
    },
    Full,
    /// `start < attribute < end`, both bounds `yyyy-MM-dd HH:mm:ss`.
    Range {
        attribute: String,
        start: String,
        end: String,
    },
    Equality {
        attribute: String,
        target: String,
    },
    /// `attribute < bound`.
    Threshold {
        attribute: String,
        bound: String,
    },
}

/// A read to perform, consumed by [`build_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub pattern: AccessPattern,
    pub index: Option<String>,
    pub projection: Vec<String>,
}

impl QuerySpec {
    fn new(pattern: AccessPattern) -> Self {
        Self {
            pattern,
            index: None,
            projection: Vec::new(),
        }
    }

    pub fn key(partition: impl Into<String>, sort: Option<String>) -> Self {
        Self::new(AccessPattern::Key {
            partition: partition.into(),
            sort,
        })
    }

    pub fn full() -> Self {
        Self::new(AccessPattern::Full)
    }

    pub fn range(
        attribute: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self::new(AccessPattern::Range {
            attribute: attribute.into(),
            start: start.into(),
            end: end.into(),
        })
    }

    pub fn equality(attribute: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(AccessPattern::Equality {
            attribute: attribute.into(),
            target: target.into(),
        })
    }

    pub fn threshold(attribute: impl Into<String>, bound: impl Into<String>) -> Self {
        Self::new(AccessPattern::Threshold {
            attribute: attribute.into(),
            bound: bound.into(),
        })
    }

    pub fn on_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn project<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = attributes.into_iter().map(Into::into).collect();
        self
    }
}

/// Validates a [`QuerySpec`] against `table` and turns it into a request.
///
/// Filtered patterns need an explicit projection. Key lookups always
/// project the key attributes plus the requested ones; only full scans
/// return every attribute when none is given.
pub fn build_request(table: &TableDescriptor, spec: &QuerySpec) -> Result<RemoteRequest> {
    let keys = key_schema(table, spec.index.as_deref())?;

    let filter = match &spec.pattern {
        AccessPattern::Key { partition, sort } => {
            let key_condition = key_condition(keys, partition, sort.as_deref())?;
            return Ok(RemoteRequest::Query(QueryRequest {
                table: table.name.clone(),
                index: spec.index.clone(),
                key_condition,
                projection: key_projection(table, keys, &spec.projection)?,
            }));
        }
        AccessPattern::Full => {
            return Ok(RemoteRequest::Scan(ScanRequest {
                table: table.name.clone(),
                index: spec.index.clone(),
                filter: None,
                projection: optional_projection(&spec.projection),
            }));
        }
        AccessPattern::Range {
            attribute,
            start,
            end,
        } => {
            check_attribute(attribute)?;
            let start_secs = timestamp_bound("start", start)?;
            let end_secs = timestamp_bound("end", end)?;
            if start_secs >= end_secs {
                return Err(QueryError::invalid("end", end, "must be later than start"));
            }
            Condition::new(Comparison::new(
                attribute.clone(),
                Comparator::Gt,
                TypedValue::Timestamp(start_secs),
            ))
            .and(Comparison::new(
                attribute.clone(),
                Comparator::Lt,
                TypedValue::Timestamp(end_secs),
            ))
        }
        AccessPattern::Equality { attribute, target } => {
            check_attribute(attribute)?;
            let value = infer_type(attribute, target)
                .map_err(|err| QueryError::invalid("target", target, err.to_string()))?;
            Condition::new(Comparison::new(attribute.clone(), Comparator::Eq, value))
        }
        AccessPattern::Threshold { attribute, bound } => {
            check_attribute(attribute)?;
            let value = Decimal::parse(bound)
                .map_err(|_| QueryError::invalid("bound", bound, "expected a number"))?;
            Condition::new(Comparison::new(
                attribute.clone(),
                Comparator::Lt,
                TypedValue::Number(value),
            ))
        }
    };

    if spec.projection.is_empty() {
        return Err(QueryError::invalid(
            "projection",
            "",
            "filtered reads need at least one attribute",
        ));
    }
    if let Some(empty) = spec.projection.iter().find(|a| a.is_empty()) {
        return Err(QueryError::invalid(
            "projection",
            empty.clone(),
            "attribute names cannot be empty",
        ));
    }

    Ok(RemoteRequest::Scan(ScanRequest {
        table: table.name.clone(),
        index: spec.index.clone(),
        filter: Some(filter),
        projection: Projection::Attributes(spec.projection.clone()),
    }))
}

fn key_schema<'a>(
    table: &'a TableDescriptor,
    index: Option<&str>,
) -> Result<(&'a KeyAttribute, Option<&'a KeyAttribute>)> {
    match index {
        None => Ok((&table.partition_key, table.sort_key.as_ref())),
        Some(name) => table
            .index(name)
            .map(|index| (&index.partition_key, index.sort_key.as_ref()))
            .ok_or_else(|| QueryError::UnknownIndex {
                index: name.to_string(),
                table: table.name.clone(),
            }),
    }
}

fn key_condition(
    (partition_key, sort_key): (&KeyAttribute, Option<&KeyAttribute>),
    partition: &str,
    sort: Option<&str>,
) -> Result<Condition> {
    let partition_value = partition_key
        .value_from(partition)
        .map_err(|err| QueryError::invalid("partition key", partition, err.to_string()))?;
    let mut condition = Condition::new(Comparison::new(
        partition_key.name.clone(),
        Comparator::Eq,
        partition_value,
    ));

    match (sort_key, sort) {
        (Some(attribute), Some(raw)) => {
            let sort_value = attribute
                .value_from(raw)
                .map_err(|err| QueryError::invalid("sort key", raw, err.to_string()))?;
            condition = condition.and(Comparison::new(
                attribute.name.clone(),
                Comparator::Eq,
                sort_value,
            ));
        }
        (None, Some(raw)) => {
            return Err(QueryError::invalid("sort key", raw, "the key schema has no sort key"));
        }
        (_, None) => {}
    }
    Ok(condition)
}

/// Key attributes of the table and of the queried index, followed by the
/// requested attributes. Duplicates are dropped.
fn key_projection(
    table: &TableDescriptor,
    (partition_key, sort_key): (&KeyAttribute, Option<&KeyAttribute>),
    requested: &[String],
) -> Result<Projection> {
    if let Some(empty) = requested.iter().find(|a| a.is_empty()) {
        return Err(QueryError::invalid(
            "projection",
            empty.clone(),
            "attribute names cannot be empty",
        ));
    }

    let keys = [
        Some(&table.partition_key),
        table.sort_key.as_ref(),
        Some(partition_key),
        sort_key,
    ];
    let mut names: Vec<String> = Vec::new();
    let candidates = keys
        .into_iter()
        .flatten()
        .map(|key| &key.name)
        .chain(requested);
    for name in candidates {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    Ok(Projection::Attributes(names))
}

fn optional_projection(attributes: &[String]) -> Projection {
    if attributes.is_empty() {
        Projection::All
    } else {
        Projection::Attributes(attributes.to_vec())
    }
}

fn check_attribute(attribute: &str) -> Result<()> {
    if attribute.is_empty() {
        return Err(QueryError::invalid("attribute", attribute, "cannot be empty"));
    }
    Ok(())
}

fn timestamp_bound(parameter: &'static str, raw: &str) -> Result<i64> {
    parse_timestamp(raw)
        .ok_or_else(|| QueryError::invalid(parameter, raw, "expected yyyy-MM-dd HH:mm:ss"))
}
