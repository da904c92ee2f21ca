//! Column, value, and row types for the tabular surface
//!
//! The Moosend subscriber payload has a fixed set of main fields; any other
//! requested column is treated as a list custom field.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Subscriber fields that appear directly on the API record. Anything else
/// is resolved through the record's custom-field list.
pub const MAIN_FIELDS: &[&str] = &[
    "ID",
    "Name",
    "Email",
    "CreatedOn",
    "UnsubscribedOn",
    "UnsubscribedFromID",
    "SubscribeType",
    "SubscribeMethod",
];

/// Declared type of an output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit signed integer
    Integer,
    /// UTF-8 text
    Text,
    /// Timestamp with time zone (UTC-anchored instant)
    TimestampTz,
    /// Timestamp without time zone
    Timestamp,
    /// Any other declared type; raw values pass through as text
    Opaque,
}

/// A requested output column: name plus declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name as requested by the caller
    pub name: String,
    /// Declared output type
    pub ty: ColumnType,
}

impl Column {
    /// Convenience constructor
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Whether this column maps to a main subscriber field rather than a
    /// list custom field
    pub fn is_main_field(&self) -> bool {
        MAIN_FIELDS.contains(&self.name.as_str())
    }
}

/// A typed cell value produced by coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or unmappable value
    Null,
    /// Integer column value
    Integer(i64),
    /// Text column value
    Text(String),
    /// Timestamp-with-time-zone column value
    TimestampTz(DateTime<Utc>),
    /// Timestamp-without-time-zone column value
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Whether this cell is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// One emitted record: mapping from requested column name to typed value.
/// Ordered so row output is deterministic.
pub type Row = BTreeMap<String, Value>;

/// A scan predicate passed down by the caller. Accepted for interface
/// compatibility and never applied; filtering stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    /// Column the predicate applies to
    pub column: String,
    /// Comparison operator, e.g. `=` or `>`
    pub operator: String,
    /// Right-hand operand rendered as text
    pub operand: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_field_detection() {
        assert!(Column::new("Email", ColumnType::Text).is_main_field());
        assert!(Column::new("CreatedOn", ColumnType::TimestampTz).is_main_field());
        assert!(!Column::new("FavouriteColour", ColumnType::Text).is_main_field());
    }

    #[test]
    fn value_null_checks() {
        assert!(Value::Null.is_null());
        assert!(!Value::Integer(7).is_null());
        assert_eq!(Value::Text("x".into()).as_text(), Some("x"));
        assert_eq!(Value::Integer(7).as_text(), None);
    }
}
