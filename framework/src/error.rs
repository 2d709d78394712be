//! Binding error types
//!
//! Every failure the binder or the host layer can produce is a variant of
//! [`BindError`]. Each variant knows its HTTP status, and
//! `From<BindError> for HttpResponse` renders the body, so handlers and
//! middleware propagate with `?` and convert once.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field-level validation failures keyed by the field's name for the
/// active data source.
///
/// # Response Format
///
/// Serializes as a flat JSON object:
///
/// ```json
/// {
///     "name": "length",
///     "age": "range"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    /// Create an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for a field
    ///
    /// The first violation recorded for a field is kept.
    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| reason.into());
    }

    /// Get the violation reason for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over `(field, reason)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names that failed, in order
    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    /// Convert to JSON Value for response
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.errors).unwrap_or_default()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, reason)| format!("{}: {}", field, reason))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Errors produced while binding a request
///
/// Every variant is terminal for the request it belongs to.
#[derive(Debug, Clone, Error)]
pub enum BindError {
    /// The configured source name is not one of the known sources (500)
    #[error("Unrecognized data source: {0}")]
    UnrecognizedSource(String),

    /// The payload could not be decoded into the schema (422)
    ///
    /// Carries the decoder's own error text.
    #[error("{0}")]
    Parse(String),

    /// The body could not be re-read as a multipart form (500)
    #[error("Failed to parse multipart form: {0}")]
    Multipart(String),

    /// A configured file field cannot hold uploaded files (415)
    #[error("Unsupported field type for {field}: {shape}")]
    UnsupportedFileField {
        /// Struct field named in the file-field mapping
        field: String,
        /// The field's actual shape
        shape: String,
    },

    /// The bound value violated one or more rules (422)
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// A route parameter was requested but not matched (400)
    #[error("Missing required parameter: {0}")]
    Param(String),

    /// The request body exceeded the server's limit (413)
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Generic internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl BindError {
    /// Create a Parse error from any displayable decoder error
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }

    /// Create an UnsupportedFileField error
    pub fn unsupported_file_field(field: impl Into<String>, shape: impl Into<String>) -> Self {
        Self::UnsupportedFileField {
            field: field.into(),
            shape: shape.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnrecognizedSource(_) => 500,
            Self::Parse(_) => 422,
            Self::Multipart(_) => 500,
            Self::UnsupportedFileField { .. } => 415,
            Self::Validation(_) => 422,
            Self::Param(_) => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::Internal(_) => 500,
        }
    }

    /// Whether the error points at a setup mistake rather than a bad request
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedSource(_) | Self::UnsupportedFileField { .. } | Self::Internal(_)
        )
    }
}
