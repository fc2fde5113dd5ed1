use std::fmt;

use crate::model::Item;

use super::condition::Condition;
use super::expression::{ExpressionBuilder, Expressions};

/// Attributes returned by a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    All,
    Attributes(Vec<String>),
}

impl Projection {
    pub fn apply(&self, item: &Item) -> Item {
        match self {
            Projection::All => item.clone(),
            Projection::Attributes(names) => item.project(names),
        }
    }

    fn attributes(&self) -> Option<&[String]> {
        match self {
            Projection::All => None,
            Projection::Attributes(names) => Some(names),
        }
    }
}

/// A scan over a table or one of its indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub table: String,
    pub index: Option<String>,
    pub filter: Option<Condition>,
    pub projection: Projection,
}

/// A key-condition query over a table or one of its indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub table: String,
    pub index: Option<String>,
    pub key_condition: Condition,
    pub projection: Projection,
}

impl ScanRequest {
    pub fn full(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            index: None,
            filter: None,
            projection: Projection::All,
        }
    }

    pub fn expressions(&self) -> Expressions {
        let mut builder = ExpressionBuilder::new();
        let filter = self.filter.as_ref().map(|c| builder.condition(c));
        let projection = self.projection.attributes().map(|a| builder.projection(a));
        builder.finish(None, filter, projection)
    }
}

impl QueryRequest {
    pub fn expressions(&self) -> Expressions {
        let mut builder = ExpressionBuilder::new();
        let key_condition = builder.condition(&self.key_condition);
        let projection = self.projection.attributes().map(|a| builder.projection(a));
        builder.finish(Some(key_condition), None, projection)
    }
}

/// A fully validated read, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    Scan(ScanRequest),
    Query(QueryRequest),
}

impl RemoteRequest {
    pub fn table(&self) -> &str {
        match self {
            RemoteRequest::Scan(scan) => &scan.table,
            RemoteRequest::Query(query) => &query.table,
        }
    }

    pub fn projection(&self) -> &Projection {
        match self {
            RemoteRequest::Scan(scan) => &scan.projection,
            RemoteRequest::Query(query) => &query.projection,
        }
    }

    /// Filter or key condition, whichever applies.
    pub fn condition(&self) -> Option<&Condition> {
        match self {
            RemoteRequest::Scan(scan) => scan.filter.as_ref(),
            RemoteRequest::Query(query) => Some(&query.key_condition),
        }
    }

    pub fn expressions(&self) -> Expressions {
        match self {
            RemoteRequest::Scan(scan) => scan.expressions(),
            RemoteRequest::Query(query) => query.expressions(),
        }
    }
}

impl fmt::Display for RemoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (verb, index) = match self {
            RemoteRequest::Scan(scan) => ("scan", &scan.index),
            RemoteRequest::Query(query) => ("query", &query.index),
        };
        write!(f, "{verb} {}", self.table())?;
        if let Some(index) = index {
            write!(f, " ({index})")?;
        }
        if let Some(condition) = self.condition() {
            write!(f, " where {condition}")?;
        }
        if let Projection::Attributes(names) = self.projection() {
            write!(f, " returning {}", names.join(", "))?;
        }
        Ok(())
    }
}
