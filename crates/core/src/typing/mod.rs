//! Attribute type inference from untyped text.
//!
//! A raw token becomes one of three [`TypedValue`] kinds:
//!
//! - columns whose name contains `date` (any case) must hold a
//!   `yyyy-MM-dd HH:mm:ss` date-time and become a [`TypedValue::Timestamp`];
//! - tokens made of ASCII digits with an optional leading `-` become a
//!   [`TypedValue::Number`];
//! - everything else stays a [`TypedValue::String`], byte for byte.
//!
//! Parsing is locale independent. Date-times are interpreted as UTC.

mod error;

pub use error::TypeParseError;

use chrono::{DateTime, NaiveDateTime};

use crate::model::{Decimal, TypedValue};

/// The fixed date-time layout accepted for timestamp columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TIMESTAMP_LEN: usize = "yyyy-MM-dd HH:mm:ss".len();

/// How values of a column are typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Values must be fixed-format date-times.
    Timestamp,
    /// Values are numbers when they look like integers, strings otherwise.
    Inferred,
}

/// A column name plus its inference hint, derived once from a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = if is_date_column(&name) {
            ColumnKind::Timestamp
        } else {
            ColumnKind::Inferred
        };
        Self { name, kind }
    }

    /// Types a raw token found in this column.
    pub fn infer(&self, raw: &str) -> Result<TypedValue, TypeParseError> {
        match self.kind {
            ColumnKind::Timestamp => parse_timestamp(raw)
                .map(TypedValue::Timestamp)
                .ok_or_else(|| TypeParseError::InvalidTimestamp {
                    column: self.name.clone(),
                    value: raw.to_string(),
                }),
            ColumnKind::Inferred => Ok(infer_untyped(raw)),
        }
    }
}

/// Infers the type of `raw` using `column_name` as the hint.
pub fn infer_type(column_name: &str, raw: &str) -> Result<TypedValue, TypeParseError> {
    ColumnSchema::new(column_name).infer(raw)
}

/// Returns true when a column name marks timestamp values.
pub fn is_date_column(name: &str) -> bool {
    name.to_ascii_lowercase().contains("date")
}

/// Parses a `yyyy-MM-dd HH:mm:ss` literal into whole seconds since the UTC
/// epoch. The literal must be zero padded.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    // chrono accepts unpadded fields, the fixed layout does not.
    if raw.len() != TIMESTAMP_LEN {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()?;
    Some(parsed.and_utc().timestamp())
}

/// Formats epoch seconds back into the fixed layout. Out-of-range values fall
/// back to the raw number.
pub fn format_timestamp(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        None => secs.to_string(),
    }
}

fn infer_untyped(raw: &str) -> TypedValue {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(number) = Decimal::parse(raw) {
            return TypedValue::Number(number);
        }
    }
    TypedValue::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_become_numbers() {
        for raw in ["0", "42", "-17", "007", "123456789012345678901234567890"] {
            let value = infer_type("Quantity", raw).unwrap();
            assert!(matches!(value, TypedValue::Number(_)), "{raw}");
        }
        assert_eq!(infer_type("Quantity", "-17").unwrap(), TypedValue::number(-17));
    }

    #[test]
    fn test_other_tokens_stay_verbatim_strings() {
        for raw in ["", "-", "+5", " 42", "42 ", "1.5", "1,000", "Widget", "3e4", "٣"] {
            assert_eq!(
                infer_type("Description", raw).unwrap(),
                TypedValue::String(raw.to_string()),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_date_columns_become_timestamps() {
        assert_eq!(
            infer_type("Order_Date", "2020-05-04 05:00:00").unwrap(),
            TypedValue::Timestamp(1_588_568_400)
        );
        assert_eq!(
            infer_type("SHIPDATE", "1970-01-01 00:00:00").unwrap(),
            TypedValue::Timestamp(0)
        );
        assert_eq!(
            infer_type("updateDate", "1969-12-31 23:59:59").unwrap(),
            TypedValue::Timestamp(-1)
        );
    }

    #[test]
    fn test_date_column_rejects_other_layouts() {
        for raw in [
            "2020-5-4 05:00:00",
            "2020-05-04T05:00:00",
            "2020-05-04 5:00:00",
            "2020-05-04",
            "2020-05-04 05:00:00Z",
            "2020-13-01 00:00:00",
            "42",
        ] {
            let result = infer_type("Order_Date", raw);
            assert_eq!(
                result,
                Err(TypeParseError::InvalidTimestamp {
                    column: "Order_Date".to_string(),
                    value: raw.to_string(),
                }),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_parse_timestamp_is_utc() {
        assert_eq!(parse_timestamp("2020-05-04 05:00:00"), Some(1_588_568_400));
        assert_eq!(parse_timestamp("2020-08-13 09:00:00"), Some(1_597_309_200));
        assert_eq!(parse_timestamp("2020-08-13 9:00:00"), None);
    }

    #[test]
    fn test_format_timestamp_round_trips_literal() {
        assert_eq!(format_timestamp(1_597_309_200), "2020-08-13 09:00:00");
    }

    #[test]
    fn test_column_schema_hint_is_case_insensitive() {
        assert_eq!(ColumnSchema::new("Order_DATE").kind, ColumnKind::Timestamp);
        assert_eq!(ColumnSchema::new("Order_Status").kind, ColumnKind::Inferred);
    }
}
