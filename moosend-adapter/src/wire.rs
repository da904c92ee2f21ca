//! Serde models for the Moosend wire format
//!
//! Every response is wrapped in a uniform envelope: a status code, an
//! optional error message, and on success a context payload. Field names
//! follow the service's PascalCase convention.

use serde::{Deserialize, Serialize};

/// Uniform response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<C> {
    /// Status code; zero means success
    #[serde(rename = "Code")]
    pub code: i64,
    /// Error message, present when the code is non-zero
    #[serde(rename = "Error")]
    pub error: Option<String>,
    /// Payload, present on success
    #[serde(rename = "Context")]
    pub context: Option<C>,
}

impl<C> Envelope<C> {
    /// Whether the envelope signals success
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    /// The service-provided error message, or a placeholder when the
    /// envelope failed without one
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown Moosend API error")
    }
}

/// Context payload of a subscriber page response
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriberPage {
    /// Subscribers on this page
    #[serde(rename = "Subscribers", default)]
    pub subscribers: Vec<Subscriber>,
    /// Paging metadata
    #[serde(rename = "Paging")]
    pub paging: Paging,
}

/// Paging metadata attached to a page response
#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    /// Total number of pages for the current page size; pages are
    /// 1-indexed and contiguous
    #[serde(rename = "TotalPageCount")]
    pub total_page_count: u32,
    /// Page this response covers
    #[serde(rename = "CurrentPage", default)]
    pub current_page: u32,
}

/// One raw subscriber record. Main-field values arrive as JSON strings
/// (or null); anything else lives in the custom-field list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subscriber {
    /// Subscriber identifier
    #[serde(rename = "ID")]
    pub id: Option<String>,
    /// Display name
    #[serde(rename = "Name")]
    pub name: Option<String>,
    /// Email address
    #[serde(rename = "Email")]
    pub email: Option<String>,
    /// Subscription timestamp, in the API's embedded-epoch format
    #[serde(rename = "CreatedOn")]
    pub created_on: Option<String>,
    /// Unsubscription timestamp, if any
    #[serde(rename = "UnsubscribedOn")]
    pub unsubscribed_on: Option<String>,
    /// List the subscriber unsubscribed from, if any
    #[serde(rename = "UnsubscribedFromID")]
    pub unsubscribed_from_id: Option<String>,
    /// Subscription state discriminator
    #[serde(rename = "SubscribeType")]
    pub subscribe_type: Option<String>,
    /// How the subscriber was added
    #[serde(rename = "SubscribeMethod")]
    pub subscribe_method: Option<String>,
    /// List custom fields as name/value pairs; values are raw strings
    #[serde(rename = "CustomFields", default)]
    pub custom_fields: Vec<CustomField>,
}

impl Subscriber {
    /// Direct main-field lookup by column name. Returns `None` when the
    /// name is not a main field; a present main field with a null value
    /// yields `Some(None)`.
    pub fn main_field(&self, name: &str) -> Option<Option<&str>> {
        let value = match name {
            "ID" => &self.id,
            "Name" => &self.name,
            "Email" => &self.email,
            "CreatedOn" => &self.created_on,
            "UnsubscribedOn" => &self.unsubscribed_on,
            "UnsubscribedFromID" => &self.unsubscribed_from_id,
            "SubscribeType" => &self.subscribe_type,
            "SubscribeMethod" => &self.subscribe_method,
            _ => return None,
        };
        Some(value.as_deref())
    }
}

/// One custom-field entry on a subscriber record
#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    /// Custom field name
    #[serde(rename = "Name")]
    pub name: String,
    /// Raw string value; the API never types these
    #[serde(rename = "Value")]
    pub value: Option<String>,
}

/// Request body for the subscribe (insert/update) endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    /// Subscriber display name
    #[serde(rename = "Name")]
    pub name: Option<String>,
    /// Subscriber email address
    #[serde(rename = "Email")]
    pub email: Option<String>,
    /// Always true: opt-in is handled outside this adapter
    #[serde(rename = "HasExternalDoubleOptIn")]
    pub has_external_double_opt_in: bool,
    /// Custom fields rendered as `"name=value"` strings
    #[serde(rename = "CustomFields")]
    pub custom_fields: Vec<String>,
}

/// Request body for the remove (delete) endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RemoveRequest {
    /// Email address identifying the subscriber
    #[serde(rename = "Email")]
    pub email: String,
}
