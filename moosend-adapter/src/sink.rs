//! Row mutations mapped onto the Moosend write endpoints
//!
//! Inserts and updates both land on the subscribe endpoint, which upserts
//! by email; deletes land on the remove endpoint. One blocking HTTP round
//! trip per row, no batching.

use crate::coerce::coerce;
use crate::config::MoosendConfig;
use crate::error::{AdapterError, Result};
use crate::fetch::HttpTransport;
use crate::logging::{LogSink, Severity};
use crate::resolve::resolve;
use crate::schema::{Column, Row, Value};
use crate::wire::{Envelope, RemoveRequest, SubscribeRequest, Subscriber};

/// Applies row-level writes to one mailing list
pub struct SubscriberSink<'a> {
    config: &'a MoosendConfig,
    columns: &'a [Column],
    transport: &'a dyn HttpTransport,
    log: &'a dyn LogSink,
}

impl<'a> SubscriberSink<'a> {
    /// Bind a sink to its configuration, declared columns, transport,
    /// and log sink
    pub fn new(
        config: &'a MoosendConfig,
        columns: &'a [Column],
        transport: &'a dyn HttpTransport,
        log: &'a dyn LogSink,
    ) -> Self {
        Self {
            config,
            columns,
            transport,
            log,
        }
    }

    /// Insert one subscriber. Delegates to [`update`](Self::update) with
    /// no prior identity; the subscribe endpoint upserts by email.
    pub fn insert(&self, new_values: &Row) -> Result<Option<Row>> {
        self.update(None, new_values)
    }

    /// Update the subscriber identified by `rowid` (the primary-key
    /// column's value, an email address).
    ///
    /// On success returns the written row as echoed by the service,
    /// restricted to the declared columns. An API-level failure is logged
    /// at error severity and returns `Ok(None)`: no row was produced.
    pub fn update(&self, rowid: Option<&str>, new_values: &Row) -> Result<Option<Row>> {
        self.require_writes()?;

        let body = SubscribeRequest {
            name: new_values
                .get("Name")
                .and_then(Value::as_text)
                .map(str::to_string),
            email: new_values
                .get("Email")
                .and_then(Value::as_text)
                .or(rowid)
                .map(str::to_string),
            has_external_double_opt_in: true,
            custom_fields: self.custom_field_pairs(new_values),
        };

        let url = self
            .config
            .api_url(&format!("subscribers/{}/subscribe.json", self.config.list_id))?;
        let response = self
            .transport
            .post_json(&url, &serde_json::to_value(&body)?)?;
        let envelope: Envelope<Subscriber> = serde_json::from_str(&response)?;

        if !envelope.is_ok() {
            self.log.log(Severity::Error, envelope.error_message());
            return Ok(None);
        }
        let subscriber = envelope.context.ok_or_else(|| AdapterError::Api {
            code: 0,
            message: "success envelope carried no Context".to_string(),
        })?;

        self.echo_row(&subscriber).map(Some)
    }

    /// Delete the subscriber identified by `rowid` (an email address).
    ///
    /// Fire-and-forget at the API level: a non-zero envelope code is
    /// logged and swallowed. Transport and decode failures propagate.
    pub fn delete(&self, rowid: &str) -> Result<()> {
        self.require_writes()?;

        let body = RemoveRequest {
            email: rowid.to_string(),
        };
        let url = self
            .config
            .api_url(&format!("subscribers/{}/remove.json", self.config.list_id))?;
        let response = self
            .transport
            .post_json(&url, &serde_json::to_value(&body)?)?;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(&response)?;

        if !envelope.is_ok() {
            self.log.log(Severity::Error, envelope.error_message());
        }
        Ok(())
    }

    fn require_writes(&self) -> Result<()> {
        if self.config.primary_key.is_none() {
            return Err(AdapterError::WritesDisabled);
        }
        Ok(())
    }

    /// Render `"name=value"` strings for every declared custom-field
    /// column present and non-null in the new values
    fn custom_field_pairs(&self, new_values: &Row) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !c.is_main_field())
            .filter_map(|c| {
                let value = new_values.get(&c.name)?;
                render(value).map(|v| format!("{}={v}", c.name))
            })
            .collect()
    }

    /// Build the returned row from the service's echoed subscriber,
    /// restricted to the declared columns
    fn echo_row(&self, subscriber: &Subscriber) -> Result<Row> {
        let mut row = Row::new();
        for column in self.columns {
            let raw = resolve(&column.name, subscriber, self.log);
            let value = coerce(&column.name, raw, column.ty)?;
            row.insert(column.name.clone(), value);
        }
        Ok(row)
    }
}

/// Render a typed value as the raw string the API expects
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::TimestampTz(ts) => Some(ts.to_rfc3339()),
        Value::Timestamp(ts) => Some(ts.to_string()),
    }
}
