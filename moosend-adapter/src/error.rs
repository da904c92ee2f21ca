//! Error types for the Moosend adapter

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Main error type for adapter operations
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Configuration error surfaced at construction
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-zero status code in an API envelope
    #[error("Moosend API error (code {code}): {message}")]
    Api {
        /// Status code from the envelope
        code: i64,
        /// Error message supplied by the service
        message: String,
    },

    /// HTTP transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Malformed response envelope
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid URL built from the configured endpoint
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Value in an integer-typed column that is not numeric
    #[error("Column {column} holds non-numeric value: {value}")]
    Coerce {
        /// The column being coerced
        column: String,
        /// The raw value that failed to parse
        value: String,
    },

    /// Mutation attempted without a configured primary key
    #[error("Writes require a primary_key option naming an email-valued column")]
    WritesDisabled,
}

impl AdapterError {
    /// Check if this error is fatal to the adapter instance rather than
    /// to a single scan or mutation
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AdapterError::Configuration(_) | AdapterError::WritesDisabled
        )
    }
}
