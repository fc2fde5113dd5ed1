use std::cmp::Ordering;
use std::fmt;

use super::error::ValueError;

/// A decimal number kept in canonical text form.
///
/// The remote store transports numbers as strings, so the value is held the
/// same way: an optional sign, an integer part without leading zeros and a
/// fractional part without trailing zeros. No precision is lost in either
/// direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    integer: String,
    fraction: String,
}

impl Decimal {
    /// Parses `[-]digits[.digits]`. Signs other than a leading `-`, exponents,
    /// whitespace and thousands separators are rejected.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidNumber(text.to_string());

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((int, frac)) => {
                if frac.is_empty() {
                    return Err(invalid());
                }
                (int, frac)
            }
            None => (unsigned, ""),
        };
        if integer.is_empty() {
            return Err(invalid());
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || !all_digits(fraction) {
            return Err(invalid());
        }

        let integer = integer.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');
        let integer = if integer.is_empty() { "0" } else { integer };
        let is_zero = integer == "0" && fraction.is_empty();

        Ok(Self {
            negative: negative && !is_zero,
            integer: integer.to_string(),
            fraction: fraction.to_string(),
        })
    }

    /// Returns the value as an `i64` when it is integral and in range.
    pub fn as_i64(&self) -> Option<i64> {
        if !self.fraction.is_empty() {
            return None;
        }
        self.to_string().parse().ok()
    }

    pub fn is_integer(&self) -> bool {
        self.fraction.is_empty()
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.integer
            .len()
            .cmp(&other.integer.len())
            .then_with(|| self.integer.cmp(&other.integer))
            .then_with(|| self.fraction.cmp(&other.fraction))
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self {
            negative: value < 0,
            integer: value.unsigned_abs().to_string(),
            fraction: String::new(),
        }
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self {
            negative: false,
            integer: value.to_string(),
            fraction: String::new(),
        }
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.integer)?;
        if !self.fraction.is_empty() {
            write!(f, ".{}", self.fraction)?;
        }
        Ok(())
    }
}

/// A typed attribute value.
///
/// The tag is decided once, when the value is created, and is never
/// reinterpreted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypedValue {
    String(String),
    Number(Decimal),
    /// Whole seconds since 1970-01-01T00:00:00Z.
    Timestamp(i64),
}

impl TypedValue {
    pub fn string(value: impl Into<String>) -> Self {
        TypedValue::String(value.into())
    }

    pub fn number(value: i64) -> Self {
        TypedValue::Number(Decimal::from(value))
    }

    /// Short tag used in plans and diagnostics (`S` or `N`, as on the wire).
    pub fn wire_tag(&self) -> &'static str {
        match self {
            TypedValue::String(_) => "S",
            TypedValue::Number(_) | TypedValue::Timestamp(_) => "N",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view shared by numbers and timestamps.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            TypedValue::String(_) => None,
            TypedValue::Number(n) => Some(n.clone()),
            TypedValue::Timestamp(secs) => Some(Decimal::from(*secs)),
        }
    }

    /// Compares two values the way the store does: numbers (and timestamps)
    /// numerically, strings lexicographically. Mixed kinds are unordered.
    pub fn compare(&self, other: &TypedValue) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::String(a), TypedValue::String(b)) => Some(a.cmp(b)),
            (TypedValue::String(_), _) | (_, TypedValue::String(_)) => None,
            (a, b) => Some(a.as_decimal()?.cmp(&b.as_decimal()?)),
        }
    }

    /// Text as sent to the store for this value.
    pub fn wire_text(&self) -> String {
        match self {
            TypedValue::String(s) => s.clone(),
            TypedValue::Number(n) => n.to_string(),
            TypedValue::Timestamp(secs) => secs.to_string(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => f.write_str(s),
            TypedValue::Number(n) => write!(f, "{n}"),
            TypedValue::Timestamp(secs) => write!(f, "{secs}"),
        }
    }
}
