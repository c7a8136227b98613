//! Error handling
//!
//! Every failure a request attempt can end in. All of them are terminal for the
//! attempt (nothing is retried) and all of them render as user-facing text.

use std::fmt;
use thiserror::Error;

use crate::logic::features::layout::LayoutMismatchError;

// ============================================================================
// EXTRACTION
// ============================================================================

/// Which input field an extraction error points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    /// Zero-based position in a numeric form
    Index(usize),
    /// Named input (text, user, symbol, url)
    Name(&'static str),
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Forms label features from 1
            FieldRef::Index(i) => write!(f, "Feature {}", i + 1),
            FieldRef::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Raw input could not be turned into a payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Invalid URL {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("{} must be a number (got {value:?})", feature_label(.index))]
    NotANumber { index: usize, value: String },

    #[error("{field} is required")]
    MissingValue { field: FieldRef },

    #[error("Expected {expected} features, got {actual}")]
    WrongArity { expected: usize, actual: usize },

    #[error("{domain} predictions do not accept {got} input")]
    UnsupportedInput { domain: &'static str, got: &'static str },

    #[error("Invalid ticker symbol {0:?}")]
    InvalidSymbol(String),

    #[error("Unknown history period {0:?}")]
    InvalidPeriod(String),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),
}

impl ExtractionError {
    pub fn missing_index(index: usize) -> Self {
        Self::MissingValue { field: FieldRef::Index(index) }
    }

    pub fn missing_named(name: &'static str) -> Self {
        Self::MissingValue { field: FieldRef::Name(name) }
    }
}

fn feature_label(index: &usize) -> FieldRef {
    FieldRef::Index(*index)
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Backend body did not have the shape its domain promises
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    #[error("Missing field `{0}` in response")]
    MissingField(String),

    #[error("Field `{field}` has the wrong type (expected {expected})")]
    WrongType { field: String, expected: &'static str },

    #[error("Field `{field}` is out of range: {value}")]
    OutOfRange { field: String, value: f64 },
}

impl NormalizationError {
    /// Same error with its field nested under `parent` ("data[3]" + "close")
    pub fn within(self, parent: &str) -> Self {
        let nest = |field: String| format!("{}.{}", parent, field);
        match self {
            Self::MissingField(field) => Self::MissingField(nest(field)),
            Self::WrongType { field, expected } => Self::WrongType { field: nest(field), expected },
            Self::OutOfRange { field, value } => Self::OutOfRange { field: nest(field), value },
        }
    }
}

// ============================================================================
// BACKEND TRANSPORT
// ============================================================================

/// A backend call that never produced a usable 2xx JSON body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe_transport(.status, .message))]
pub struct BackendError {
    /// HTTP status when a response was received
    pub status: Option<u16>,
    pub message: String,
}

impl BackendError {
    pub fn network(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }
}

fn describe_transport(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Request failed (HTTP {}): {}", code, message),
        None => format!("Cannot connect to backend server: {}", message),
    }
}

// ============================================================================
// REQUEST LIFECYCLE
// ============================================================================

/// Terminal outcome of a failed `submit`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Validation failed: {}", join_messages(.0))]
    ValidationFailed(Vec<ExtractionError>),

    #[error("Server is not available. Please ensure the backend is running.")]
    BackendUnavailable,

    #[error("A prediction is already in progress")]
    Busy,

    #[error("{}", describe_transport(.status, .message))]
    TransportError { status: Option<u16>, message: String },

    #[error("{0}")]
    BackendReportedError(String),

    #[error("Unexpected response: {0}")]
    NormalizationError(#[from] NormalizationError),

    #[error("Prediction client has been shut down")]
    ShutDown,
}

impl From<BackendError> for PredictionError {
    fn from(err: BackendError) -> Self {
        PredictionError::TransportError { status: err.status, message: err.message }
    }
}

fn join_messages(errors: &[ExtractionError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

// ============================================================================
// SETUP
// ============================================================================

/// Client could not be configured
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Unknown domain {0:?} (expected phishing, fraud, spam, recommendation or stock)")]
    UnknownDomain(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ref_is_one_based() {
        assert_eq!(ExtractionError::missing_index(2).to_string(), "Feature 3 is required");
        assert_eq!(ExtractionError::missing_named("text").to_string(), "text is required");
    }

    #[test]
    fn test_validation_failed_lists_every_error() {
        let err = PredictionError::ValidationFailed(vec![
            ExtractionError::missing_index(0),
            ExtractionError::NotANumber { index: 4, value: "abc".into() },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Feature 1 is required"));
        assert!(msg.contains("Feature 5 must be a number"));
    }

    #[test]
    fn test_nested_normalization_field() {
        let err = NormalizationError::MissingField("close".into()).within("data[3]");
        assert_eq!(err.to_string(), "Missing field `data[3].close` in response");
    }

    #[test]
    fn test_backend_error_converts_to_transport() {
        let err: PredictionError = BackendError::http(503, "model warming up").into();
        assert_eq!(
            err,
            PredictionError::TransportError { status: Some(503), message: "model warming up".into() }
        );
        assert_eq!(err.to_string(), "Request failed (HTTP 503): model warming up");

        let err: PredictionError = BackendError::network("connection refused").into();
        assert!(err.to_string().starts_with("Cannot connect"));
    }
}
