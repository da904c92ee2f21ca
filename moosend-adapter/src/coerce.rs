//! Raw-value coercion
//!
//! API field values arrive as strings regardless of the declared column
//! type. Timestamps use the service's embedded-epoch convention, e.g.
//! `/Date(1449010452000+0200)/` (milliseconds since the Unix epoch plus a
//! display offset).

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AdapterError, Result};
use crate::schema::{ColumnType, Value};

static EPOCH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/Date\((\d+)([+-]\d{4})\)/$").expect("embedded-epoch regex is valid")
});

/// Convert one raw field value into a typed value for the declared column
/// type.
///
/// Null input is null output, unconditionally. A non-numeric value in an
/// integer column is an error; a timestamp value that does not match the
/// embedded-epoch pattern resolves to null without raising, which is how
/// the service represents never-set dates.
pub fn coerce(column: &str, raw: Option<&str>, ty: ColumnType) -> Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };

    match ty {
        ColumnType::Integer => raw
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| AdapterError::Coerce {
                column: column.to_string(),
                value: raw.to_string(),
            }),
        ColumnType::Text | ColumnType::Opaque => Ok(Value::Text(raw.to_string())),
        ColumnType::TimestampTz => Ok(parse_epoch_millis(raw)
            .map(Value::TimestampTz)
            .unwrap_or(Value::Null)),
        ColumnType::Timestamp => Ok(parse_epoch_millis(raw)
            .map(|utc| Value::Timestamp(utc.with_timezone(&Local).naive_local()))
            .unwrap_or(Value::Null)),
    }
}

/// Extract the millisecond epoch from an embedded-epoch date string.
/// Returns `None` when the value does not match the pattern.
fn parse_epoch_millis(raw: &str) -> Option<DateTime<chrono::Utc>> {
    let captures = EPOCH_DATE.captures(raw)?;
    let millis: i64 = captures.get(1)?.as_str().parse().ok()?;
    let secs = millis.div_euclid(1000);
    let nanos = (millis.rem_euclid(1000) as u32) * 1_000_000;
    DateTime::from_timestamp(secs, nanos)
}
