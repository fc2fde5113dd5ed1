//! Table descriptors (pure data).

use super::error::RecordError;
use super::value::{Decimal, TypedValue};

/// Table schema as requested from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub indexes: Vec<IndexDescriptor>,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// Scalar types a key attribute may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
}

/// Secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub projection: IndexProjection,
}

/// Attributes copied into a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexProjection {
    All,
    /// Key attributes plus the listed non-key attributes.
    Include(Vec<String>),
}

/// Capacity mode for the table and its indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
    Provisioned { read: i64, write: i64 },
}

impl AttributeType {
    /// Wire tag (`S` or `N`).
    pub fn tag(self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
        }
    }
}

impl KeyAttribute {
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeType::String,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeType::Number,
        }
    }

    /// Types a raw key value according to this attribute's declared type.
    pub fn value_from(&self, raw: &str) -> Result<TypedValue, RecordError> {
        if raw.is_empty() {
            return Err(RecordError::EmptyKeyValue {
                name: self.name.clone(),
            });
        }
        match self.attribute_type {
            AttributeType::String => Ok(TypedValue::String(raw.to_string())),
            AttributeType::Number => Decimal::parse(raw).map(TypedValue::Number).map_err(|_| {
                RecordError::KeyTypeMismatch {
                    name: self.name.clone(),
                    expected: "number",
                    value: raw.to_string(),
                }
            }),
        }
    }
}

impl IndexDescriptor {
    /// Key attributes of the index, partition key first.
    pub fn key_attributes(&self) -> impl Iterator<Item = &KeyAttribute> {
        std::iter::once(&self.partition_key).chain(self.sort_key.iter())
    }
}

impl TableDescriptor {
    /// Creates a descriptor with only a partition key and on-demand billing.
    pub fn new(name: impl Into<String>, partition_key: KeyAttribute) -> Self {
        Self {
            name: name.into(),
            partition_key,
            sort_key: None,
            indexes: Vec::new(),
            billing_mode: BillingMode::PayPerRequest,
        }
    }

    pub fn with_sort_key(mut self, sort_key: KeyAttribute) -> Self {
        self.sort_key = Some(sort_key);
        self
    }

    pub fn with_index(mut self, index: IndexDescriptor) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_billing_mode(mut self, billing_mode: BillingMode) -> Self {
        self.billing_mode = billing_mode;
        self
    }

    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn index(&self, name: &str) -> Option<&IndexDescriptor> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Returns true when `name` is the partition or sort key of the table.
    pub fn is_key_attribute(&self, name: &str) -> bool {
        self.partition_key.name == name || self.sort_key.as_ref().is_some_and(|sk| sk.name == name)
    }

    /// All distinct attribute definitions the store must know about: table
    /// keys first, then index keys in declaration order.
    pub fn attribute_definitions(&self) -> Vec<&KeyAttribute> {
        let mut definitions: Vec<&KeyAttribute> = Vec::new();
        let table_keys = std::iter::once(&self.partition_key).chain(self.sort_key.iter());
        let index_keys = self.indexes.iter().flat_map(|index| index.key_attributes());
        for attribute in table_keys.chain(index_keys) {
            if !definitions.iter().any(|a| a.name == attribute.name) {
                definitions.push(attribute);
            }
        }
        definitions
    }
}
