//! Placeholder expressions as the store expects them.
//!
//! Attribute names become `#n0, #n1, ...` and values `:v0, :v1, ...`. Names
//! are shared between the condition and the projection of one request.

use crate::model::TypedValue;

use super::condition::Condition;

/// Expression strings plus the placeholder tables they reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expressions {
    pub key_condition: Option<String>,
    pub filter: Option<String>,
    pub projection: Option<String>,
    pub names: Vec<(String, String)>,
    pub values: Vec<(String, TypedValue)>,
}

#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    names: Vec<(String, String)>,
    values: Vec<(String, TypedValue)>,
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn name(&mut self, attribute: &str) -> String {
        if let Some((placeholder, _)) = self.names.iter().find(|(_, a)| a == attribute) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.names.len());
        self.names.push((placeholder.clone(), attribute.to_string()));
        placeholder
    }

    fn value(&mut self, value: &TypedValue) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.push((placeholder.clone(), value.clone()));
        placeholder
    }

    pub fn condition(&mut self, condition: &Condition) -> String {
        condition
            .comparisons()
            .iter()
            .map(|c| {
                let name = self.name(&c.attribute);
                let value = self.value(&c.value);
                format!("{name} {} {value}", c.comparator.symbol())
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    pub fn projection(&mut self, attributes: &[String]) -> String {
        attributes
            .iter()
            .map(|a| self.name(a))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn finish(
        self,
        key_condition: Option<String>,
        filter: Option<String>,
        projection: Option<String>,
    ) -> Expressions {
        Expressions {
            key_condition,
            filter,
            projection,
            names: self.names,
            values: self.values,
        }
    }
}
