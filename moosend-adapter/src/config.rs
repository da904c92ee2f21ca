//! Adapter configuration
//!
//! Built once per adapter instance from a string-keyed options map (the
//! shape a host passes to a foreign-table plugin) and validated up front.

use std::collections::HashMap;

use url::Url;

use crate::error::{AdapterError, Result};
use crate::schema::Column;

/// Default page size for subscriber list requests
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Default Moosend API base URL
pub const DEFAULT_ENDPOINT: &str = "http://api.moosend.com/v3/";

/// Configuration for one Moosend list adapter instance
#[derive(Debug, Clone)]
pub struct MoosendConfig {
    /// Moosend API key
    pub api_key: String,
    /// Mailing list identifier
    pub list_id: String,
    /// Column serving as the row identifier; must hold the subscriber's
    /// email address. Writes are disabled when unset.
    pub primary_key: Option<String>,
    /// Subscribers requested per page
    pub page_size: u32,
    /// API base URL
    pub endpoint_url: String,
}

impl MoosendConfig {
    /// Build a configuration from explicit required values, applying
    /// defaults for the rest
    pub fn new(api_key: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            list_id: list_id.into(),
            primary_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Set the primary-key column name
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Override the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the API base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_url = endpoint.into();
        self
    }

    /// Build a configuration from a host-supplied options map.
    ///
    /// Recognized keys: `api_key`, `list_id`, `primary_key`, `page_size`,
    /// `endpoint_url`. Missing required keys surface as configuration
    /// errors; a malformed `page_size` falls back to the default.
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self> {
        let api_key = options
            .get("api_key")
            .cloned()
            .ok_or_else(|| missing("You must supply an API key to Moosend in the options"))?;
        let list_id = options
            .get("list_id")
            .cloned()
            .ok_or_else(|| missing("You must supply a mailing list ID in the options"))?;

        let page_size = options
            .get("page_size")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self {
            api_key,
            list_id,
            primary_key: options.get("primary_key").cloned(),
            page_size,
            endpoint_url: options
                .get("endpoint_url")
                .cloned()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }

    /// Resolve an API path against the configured endpoint, appending the
    /// apikey query parameter every request carries
    pub fn api_url(&self, path: &str) -> Result<Url> {
        let mut base = self.endpoint_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let mut url = Url::parse(&base)?.join(path)?;
        url.query_pairs_mut().append_pair("apikey", &self.api_key);
        Ok(url)
    }

    /// Validate the configuration against the declared column set
    pub fn validate(&self, columns: &[Column]) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(missing("You must supply an API key to Moosend in the options"));
        }
        if self.list_id.is_empty() {
            return Err(missing("You must supply a mailing list ID in the options"));
        }
        if self.page_size == 0 {
            return Err(AdapterError::Configuration(
                "page_size must be greater than 0".to_string(),
            ));
        }
        Url::parse(&self.endpoint_url)
            .map_err(|e| AdapterError::Configuration(format!("Invalid endpoint_url: {e}")))?;

        if let Some(pk) = &self.primary_key {
            if !columns.iter().any(|c| &c.name == pk) {
                return Err(AdapterError::Configuration(format!(
                    "primary_key column {pk} is not in the declared column set"
                )));
            }
        }
        Ok(())
    }
}

fn missing(message: &str) -> AdapterError {
    AdapterError::Configuration(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_options_applies_defaults() {
        let config =
            MoosendConfig::from_options(&options(&[("api_key", "key"), ("list_id", "list")]))
                .unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT);
        assert!(config.primary_key.is_none());
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = MoosendConfig::from_options(&options(&[("list_id", "list")])).unwrap_err();
        assert!(matches!(err, AdapterError::Configuration(_)));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn missing_list_id_is_fatal() {
        let err = MoosendConfig::from_options(&options(&[("api_key", "key")])).unwrap_err();
        assert!(err.to_string().contains("mailing list ID"));
    }

    #[test]
    fn bad_page_size_falls_back_to_default() {
        let config = MoosendConfig::from_options(&options(&[
            ("api_key", "key"),
            ("list_id", "list"),
            ("page_size", "not-a-number"),
        ]))
        .unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn api_url_normalizes_trailing_slash_and_carries_apikey() {
        let config = MoosendConfig::new("k", "l").with_endpoint("http://localhost:9000/v3");
        let url = config.api_url("subscribers/l/subscribe.json").unwrap();
        assert_eq!(url.path(), "/v3/subscribers/l/subscribe.json");
        assert_eq!(url.query(), Some("apikey=k"));
    }

    #[test]
    fn primary_key_must_name_a_declared_column() {
        let config = MoosendConfig::new("key", "list").with_primary_key("Email");
        let columns = vec![Column::new("Name", ColumnType::Text)];
        assert!(config.validate(&columns).is_err());

        let columns = vec![
            Column::new("Name", ColumnType::Text),
            Column::new("Email", ColumnType::Text),
        ];
        assert!(config.validate(&columns).is_ok());
    }
}
