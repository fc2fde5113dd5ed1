use std::collections::BTreeSet;

/// A closed set of values an attribute may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    values: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Order status values: `backordered`, `delivered`, `delivering`, `pending`.
    pub fn order_statuses() -> Self {
        Self::new(["pending", "delivering", "delivered", "backordered"])
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in sorted order.
    pub fn values(&self) -> Vec<String> {
        self.values.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_statuses() {
        let vocabulary = Vocabulary::order_statuses();
        assert!(vocabulary.contains("pending"));
        assert!(!vocabulary.contains("shipped"));
        assert!(!vocabulary.contains("Pending"));
        assert_eq!(
            vocabulary.values(),
            vec!["backordered", "delivered", "delivering", "pending"]
        );
    }
}
