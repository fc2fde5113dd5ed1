use thiserror::Error;

/// Result type for request building.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised before any remote request exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid {parameter} {value:?}: {reason}")]
    InvalidQueryParameter {
        parameter: &'static str,
        value: String,
        reason: String,
    },
    #[error("Table '{table}' has no index named '{index}'")]
    UnknownIndex { index: String, table: String },
}

impl QueryError {
    pub(crate) fn invalid(
        parameter: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        QueryError::InvalidQueryParameter {
            parameter,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_parameter_display() {
        let error = QueryError::invalid("bound", "lots", "expected a number");
        assert_eq!(error.to_string(), "Invalid bound \"lots\": expected a number");
    }

    #[test]
    fn test_unknown_index_display() {
        let error = QueryError::UnknownIndex {
            index: "StatusIndex".to_string(),
            table: "Orders".to_string(),
        };
        assert_eq!(error.to_string(), "Table 'Orders' has no index named 'StatusIndex'");
    }
}
