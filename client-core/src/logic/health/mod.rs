//! Health Module - Backend availability
//!
//! Tri-state liveness, fed only by probe results.

pub mod monitor;

pub use monitor::{HealthMonitor, HealthStatus};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BackendError;

/// Payload `status` values that mean "up"
pub const HEALTHY_STATUSES: &[&str] = &["ok", "healthy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Not probed yet
    #[default]
    Unknown,
    Online,
    Offline,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Unknown => "unknown",
            HealthState::Online => "online",
            HealthState::Offline => "offline",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, HealthState::Online)
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map one probe outcome to a state. Never yields `Unknown`.
pub fn classify_probe(result: &Result<Value, BackendError>) -> HealthState {
    match result {
        Ok(body) => match body.get("status").and_then(Value::as_str) {
            Some(status) if HEALTHY_STATUSES.contains(&status) => HealthState::Online,
            _ => HealthState::Offline,
        },
        Err(_) => HealthState::Offline,
    }
}
