//! Column-to-field resolution
//!
//! A requested column is matched against the subscriber's main fields
//! first, then against its custom-field list by exact name. The custom
//! scan stays linear; records carry at most a handful of entries.

use crate::logging::{LogSink, Severity};
use crate::wire::Subscriber;

/// Find the raw value for a requested column on one subscriber record.
///
/// A column matching neither a main field nor a custom field logs a
/// warning and resolves to `None`; the scan keeps going.
pub fn resolve<'a>(column: &str, subscriber: &'a Subscriber, log: &dyn LogSink) -> Option<&'a str> {
    if let Some(value) = subscriber.main_field(column) {
        return value;
    }

    for field in &subscriber.custom_fields {
        if field.name == column {
            return field.value.as_deref();
        }
    }

    log.log(
        Severity::Warning,
        &format!("{column} could not be matched to output from the Moosend API"),
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLog;
    use crate::wire::CustomField;

    fn subscriber() -> Subscriber {
        Subscriber {
            email: Some("ada@example.com".to_string()),
            custom_fields: vec![
                CustomField {
                    name: "Plan".to_string(),
                    value: Some("pro".to_string()),
                },
                CustomField {
                    name: "Referrer".to_string(),
                    value: None,
                },
            ],
            ..Subscriber::default()
        }
    }

    #[test]
    fn main_field_wins() {
        let log = MemoryLog::new();
        let subscriber = subscriber();
        assert_eq!(resolve("Email", &subscriber, &log), Some("ada@example.com"));
        assert!(log.lines().is_empty());
    }

    #[test]
    fn falls_back_to_custom_fields() {
        let log = MemoryLog::new();
        let subscriber = subscriber();
        assert_eq!(resolve("Plan", &subscriber, &log), Some("pro"));
        assert_eq!(resolve("Referrer", &subscriber, &log), None);
        assert!(log.lines().is_empty());
    }

    #[test]
    fn unmatched_column_warns_and_resolves_none() {
        let log = MemoryLog::new();
        let subscriber = subscriber();
        assert_eq!(resolve("Nickname", &subscriber, &log), None);

        let warnings = log.lines_at(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Nickname could not be matched"));
    }

    #[test]
    fn null_main_field_resolves_none_without_warning() {
        let log = MemoryLog::new();
        let subscriber = subscriber();
        assert_eq!(resolve("UnsubscribedOn", &subscriber, &log), None);
        assert!(log.lines().is_empty());
    }
}
