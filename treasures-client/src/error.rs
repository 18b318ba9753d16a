//! Client error types

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One field rejected by server-side validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted location, e.g. "body.price"
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Client error type
///
/// Every variant's `Display` is a message suitable for direct display in
/// the storefront or admin panel.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An admin operation was attempted without a stored bearer token
    #[error("Not authenticated")]
    AuthenticationRequired,

    /// Login was rejected
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The server rejected the payload field-by-field (422)
    #[error("Validation error: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The per-attempt timeout ceiling elapsed
    #[error("Request timeout - the server is taking too long to respond. Please check your connection and try again.")]
    Timeout,

    /// The server could not be reached at all
    #[error("Cannot connect to API at {base_url}. Please check if the backend is running and accessible.")]
    Connectivity { base_url: String },

    /// The server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure outside the retried listing path
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token persistence failed
    #[error("Storage error: {0}")]
    Store(#[from] treasures_cart::StoreError),

    /// Payload encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

// ============================================================================
// Server error payload decoding
// ============================================================================

/// FastAPI-style error body: `detail` is either a message string or a list
/// of per-field validation entries; some handlers add a `message` field.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidationEntry {
    #[serde(default)]
    loc: Vec<Value>,
    msg: String,
}

/// Decode a 422 body into per-field errors
///
/// Returns `None` when the body does not carry a structured `detail` list,
/// in which case the caller falls back to a generic server error.
pub(crate) fn decode_validation(body: &str) -> Option<Vec<FieldError>> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let entries: Vec<ValidationEntry> = serde_json::from_value(parsed.detail?).ok()?;

    let fields: Vec<FieldError> = entries
        .into_iter()
        .map(|entry| {
            let field = entry
                .loc
                .iter()
                .map(|part| match part {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".");
            FieldError {
                field,
                message: entry.msg,
            }
        })
        .collect();

    if fields.is_empty() { None } else { Some(fields) }
}

/// Pull the server-provided detail message out of an error body
///
/// Falls back to the raw body when it is not JSON, and to a generic
/// message when the body is empty.
pub(crate) fn server_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(Value::String(detail)) = parsed.detail {
            return detail;
        }
        if let Some(message) = parsed.message {
            return message;
        }
    }

    if body.trim().is_empty() {
        "Request failed".to_string()
    } else {
        body.trim().to_string()
    }
}
