//! Backend Module - Inference service transport
//!
//! The orchestrator and the health monitor only see the `Backend` trait;
//! `HttpBackend` is the real implementation.

pub mod client;
pub mod config;

pub use client::HttpBackend;
pub use config::ClientConfig;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendError;
use crate::logic::features::PredictPayload;

/// Remote inference service
#[async_trait]
pub trait Backend: Send + Sync {
    /// Liveness endpoint body
    async fn health(&self) -> Result<Value, BackendError>;

    /// Prediction endpoint body for `payload`
    async fn predict(&self, payload: &PredictPayload) -> Result<Value, BackendError>;

    /// GET any other endpoint under the base URL
    async fn fetch(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, BackendError>;
}

/// Message used when the backend says `success: false` without saying why
pub const DEFAULT_FAILURE_MESSAGE: &str = "Prediction failed";

/// A 2xx body can still carry a failure
pub fn reported_error(body: &Value) -> Option<String> {
    let message = body.get("error").and_then(Value::as_str);
    if let Some(message) = message {
        return Some(message.to_string());
    }
    match body.get("success").and_then(Value::as_bool) {
        Some(false) => Some(DEFAULT_FAILURE_MESSAGE.to_string()),
        _ => None,
    }
}
