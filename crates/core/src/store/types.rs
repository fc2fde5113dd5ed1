use std::fmt;

use crate::model::{BillingMode, IndexDescriptor, IndexProjection, KeyAttribute, TypedValue};

/// Lifecycle status reported for a table or index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    Creating,
    Updating,
    Active,
    Deleting,
    /// Archived, inaccessible, or a status this client does not know.
    Unavailable,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceStatus::Creating => "CREATING",
            ResourceStatus::Updating => "UPDATING",
            ResourceStatus::Active => "ACTIVE",
            ResourceStatus::Deleting => "DELETING",
            ResourceStatus::Unavailable => "UNAVAILABLE",
        };
        f.write_str(s)
    }
}

/// Observed state of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexState {
    pub name: String,
    pub status: ResourceStatus,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub projection: IndexProjection,
}

impl IndexState {
    /// The descriptor a query against this index is built from.
    pub fn to_descriptor(&self) -> IndexDescriptor {
        IndexDescriptor {
            name: self.name.clone(),
            partition_key: self.partition_key.clone(),
            sort_key: self.sort_key.clone(),
            projection: self.projection.clone(),
        }
    }
}

/// Observed state of a table, as far as the engine interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub name: String,
    pub status: ResourceStatus,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub indexes: Vec<IndexState>,
    pub billing_mode: BillingMode,
    pub item_count: Option<i64>,
}

impl TableState {
    pub fn index(&self, name: &str) -> Option<&IndexState> {
        self.indexes.iter().find(|index| index.name == name)
    }
}

/// A single-attribute update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeUpdate {
    pub attribute: String,
    pub value: TypedValue,
    /// When set, the update only applies if the attribute currently holds this value.
    pub expected_prior: Option<TypedValue>,
}
