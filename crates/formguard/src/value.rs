//! The value carried through a validation chain.

use crate::config::EmptyPolicy;
use crate::numeric::{parse_number, truncate_f64, truncate_to_i64, Number, Truncated};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A raw or coerced field value.
///
/// Values start out as [`Value::Text`]; `as_integer`, `as_float` and
/// `as_date` replace them with the coerced variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Text as received (trimmed)
    Text(String),
    /// Result of integer coercion
    Integer(i64),
    /// Result of float coercion
    Float(f64),
    /// Result of date coercion
    DateTime(DateTime<Tz>),
}

impl Value {
    /// Whether this value counts as empty under `policy`.
    pub fn is_empty(&self, policy: EmptyPolicy) -> bool {
        match (self, policy) {
            (Value::Text(s), EmptyPolicy::Strict) => s.is_empty(),
            (Value::Text(s), EmptyPolicy::Legacy) => s.is_empty() || s == "0",
            (Value::Integer(i), EmptyPolicy::Legacy) => *i == 0,
            (Value::Float(f), EmptyPolicy::Legacy) => *f == 0.0,
            _ => false,
        }
    }

    /// The text, if this is a [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is a [`Value::Integer`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The number as `f64`, for integer and float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The date, if this is a [`Value::DateTime`].
    pub fn as_datetime(&self) -> Option<&DateTime<Tz>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Consume into a string, rendering non-text values.
    pub fn into_string(self) -> String {
        match self {
            Value::Text(s) => s,
            other => other.to_string(),
        }
    }

    /// Length of the rendered value in characters.
    pub fn char_len(&self) -> usize {
        match self {
            Value::Text(s) => s.chars().count(),
            other => other.to_string().chars().count(),
        }
    }

    /// Numeric reading of the value: numbers as-is, text if it parses.
    pub(crate) fn number(&self) -> Option<Number> {
        match self {
            Value::Text(s) => parse_number(s),
            Value::Integer(i) => Some(Number::Integer(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::DateTime(_) => None,
        }
    }

    /// The value truncated toward zero into `i64`. Text is truncated from
    /// its decimal digits, not through `f64`.
    pub(crate) fn truncated(&self) -> Option<Truncated> {
        match self {
            Value::Text(s) => truncate_to_i64(s),
            Value::Integer(i) => Some(Truncated::Integer(*i)),
            Value::Float(f) => Some(truncate_f64(*f)),
            Value::DateTime(_) => None,
        }
    }

    /// Natural ordering between two values.
    ///
    /// Numbers and numeric text compare numerically, dates chronologically,
    /// other text lexicographically. Returns `None` when the two sides have
    /// no common ordering (a date against a number, for example).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::DateTime(_), _) | (_, Value::DateTime(_)) => None,
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            _ => match (self.number(), other.number()) {
                (Some(Number::Integer(a)), Some(Number::Integer(b))) => Some(a.cmp(&b)),
                (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()),
                _ => match (self, other) {
                    (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
                    _ => None,
                },
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<DateTime<Tz>> for Value {
    fn from(dt: DateTime<Tz>) -> Self {
        Value::DateTime(dt)
    }
}
