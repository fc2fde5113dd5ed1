use super::error::RecordError;
use super::table::TableDescriptor;
use super::value::TypedValue;

/// An ordered attribute map.
///
/// Insertion order is preserved so records keep the column order of their
/// source; inserting an existing name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    attributes: Vec<(String, TypedValue)>,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue) {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: TypedValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Keeps only the named attributes, in the order they were requested.
    pub fn project(&self, names: &[String]) -> Item {
        let mut projected = Item::new();
        for name in names {
            if let Some(value) = self.get(name) {
                projected.insert(name.clone(), value.clone());
            }
        }
        projected
    }
}

impl FromIterator<(String, TypedValue)> for Item {
    fn from_iter<T: IntoIterator<Item = (String, TypedValue)>>(iter: T) -> Self {
        let mut item = Item::new();
        for (name, value) in iter {
            item.insert(name, value);
        }
        item
    }
}

/// One key attribute with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub name: String,
    pub value: TypedValue,
}

impl KeyValue {
    pub fn new(name: impl Into<String>, value: TypedValue) -> Result<Self, RecordError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RecordError::EmptyKeyName);
        }
        if matches!(&value, TypedValue::String(s) if s.is_empty()) {
            return Err(RecordError::EmptyKeyValue { name });
        }
        Ok(Self { name, value })
    }
}

/// Primary key of an item: a partition key and an optional sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKey {
    pub partition: KeyValue,
    pub sort: Option<KeyValue>,
}

impl ItemKey {
    pub fn new(partition: KeyValue, sort: Option<KeyValue>) -> Self {
        Self { partition, sort }
    }

    /// Builds the key of `table` from raw text values, checking that a sort
    /// value is supplied exactly when the table declares a sort key.
    pub fn for_table(
        table: &TableDescriptor,
        partition: &str,
        sort: Option<&str>,
    ) -> Result<Self, RecordError> {
        let partition = KeyValue::new(
            table.partition_key.name.clone(),
            table.partition_key.value_from(partition)?,
        )?;
        let sort = match (&table.sort_key, sort) {
            (Some(attribute), Some(raw)) => Some(KeyValue::new(
                attribute.name.clone(),
                attribute.value_from(raw)?,
            )?),
            (Some(attribute), None) => {
                return Err(RecordError::MissingSortKey {
                    table: table.name.clone(),
                    name: attribute.name.clone(),
                })
            }
            (None, Some(_)) => {
                return Err(RecordError::UnexpectedSortKey {
                    table: table.name.clone(),
                })
            }
            (None, None) => None,
        };
        Ok(Self { partition, sort })
    }

    pub fn parts(&self) -> impl Iterator<Item = &KeyValue> {
        std::iter::once(&self.partition).chain(self.sort.iter())
    }

    /// True when `item` carries this key.
    pub fn matches(&self, item: &Item) -> bool {
        self.parts()
            .all(|part| item.get(&part.name) == Some(&part.value))
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.partition.name, self.partition.value)?;
        if let Some(sort) = &self.sort {
            write!(f, ", {}={}", sort.name, sort.value)?;
        }
        Ok(())
    }
}

/// A keyed record ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    key: ItemKey,
    attributes: Item,
}

impl Record {
    /// Creates a record. Non-key attributes must not reuse a key name.
    pub fn new(key: ItemKey, attributes: Item) -> Result<Self, RecordError> {
        if let Some(part) = key.parts().find(|part| attributes.contains(&part.name)) {
            return Err(RecordError::KeyAttributeInBody {
                name: part.name.clone(),
            });
        }
        Ok(Self { key, attributes })
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn attributes(&self) -> &Item {
        &self.attributes
    }

    /// Flattens the record into a single item, key attributes first.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        for part in self.key.parts() {
            item.insert(part.name.clone(), part.value.clone());
        }
        for (name, value) in self.attributes.iter() {
            item.insert(name, value.clone());
        }
        item
    }
}
