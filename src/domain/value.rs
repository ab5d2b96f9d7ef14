//! Typed values returned by tags and stored in flags

use crate::domain::time::{DurationValue, Timestamp};
use std::fmt;

/// Runtime representation of a tag or flag value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    /// Plain text
    Element(String),
    Duration(DurationValue),
    Time(Timestamp),
    List(Vec<Value>),
}

impl Value {
    pub fn element(text: impl Into<String>) -> Self {
        Value::Element(text.into())
    }

    /// Build a list of plain-text elements
    pub fn element_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Value::element).collect())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<DurationValue> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<Timestamp> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Element(s) => write!(f, "{}", s),
            Value::Duration(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join("|"))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Element(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Element(s)
    }
}
