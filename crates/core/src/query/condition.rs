use std::cmp::Ordering;
use std::fmt;

use crate::model::{Item, TypedValue};

/// Comparison operators supported in filters and key conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Lt,
    Gt,
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Lt => "<",
            Comparator::Gt => ">",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Comparator::Eq => ordering == Ordering::Equal,
            Comparator::Lt => ordering == Ordering::Less,
            Comparator::Gt => ordering == Ordering::Greater,
        }
    }
}

/// `attribute <op> value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub attribute: String,
    pub comparator: Comparator,
    pub value: TypedValue,
}

impl Comparison {
    pub fn new(attribute: impl Into<String>, comparator: Comparator, value: TypedValue) -> Self {
        Self {
            attribute: attribute.into(),
            comparator,
            value,
        }
    }

    /// Evaluates the comparison against an item. A missing attribute or a
    /// value of another kind never matches.
    pub fn matches(&self, item: &Item) -> bool {
        item.get(&self.attribute)
            .and_then(|actual| actual.compare(&self.value))
            .is_some_and(|ordering| self.comparator.accepts(ordering))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.attribute, self.comparator.symbol())?;
        match &self.value {
            TypedValue::String(s) => write!(f, "{s:?}"),
            other => write!(f, "{}", other.wire_text()),
        }
    }
}

/// A conjunction of comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    comparisons: Vec<Comparison>,
}

impl Condition {
    pub fn new(first: Comparison) -> Self {
        Self {
            comparisons: vec![first],
        }
    }

    pub fn and(mut self, comparison: Comparison) -> Self {
        self.comparisons.push(comparison);
        self
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.comparisons.iter().all(|c| c.matches(item))
    }

    /// Placeholder-free text, for diagnostics.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, comparison) in self.comparisons.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{comparison}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(date: i64, status: &str) -> Item {
        Item::new()
            .with("Order_Date", TypedValue::Timestamp(date))
            .with("Order_Status", TypedValue::string(status))
    }

    #[test]
    fn test_range_condition_is_exclusive() {
        let condition = Condition::new(Comparison::new(
            "Order_Date",
            Comparator::Gt,
            TypedValue::Timestamp(10),
        ))
        .and(Comparison::new(
            "Order_Date",
            Comparator::Lt,
            TypedValue::Timestamp(20),
        ));

        assert!(!condition.matches(&order(10, "pending")));
        assert!(condition.matches(&order(11, "pending")));
        assert!(!condition.matches(&order(20, "pending")));
    }

    #[test]
    fn test_missing_attribute_never_matches() {
        let condition = Condition::new(Comparison::new(
            "Product_Quantity",
            Comparator::Lt,
            TypedValue::number(100),
        ));
        assert!(!condition.matches(&order(1, "pending")));
    }

    #[test]
    fn test_mixed_kinds_never_match() {
        let condition = Condition::new(Comparison::new(
            "Order_Status",
            Comparator::Eq,
            TypedValue::number(3),
        ));
        assert!(!condition.matches(&order(1, "3")));
    }

    #[test]
    fn test_render() {
        let condition = Condition::new(Comparison::new(
            "Order_Product",
            Comparator::Eq,
            TypedValue::number(3),
        ))
        .and(Comparison::new(
            "Order_Status",
            Comparator::Eq,
            TypedValue::string("pending"),
        ));
        assert_eq!(
            condition.render(),
            "Order_Product = 3 AND Order_Status = \"pending\""
        );
    }
}
