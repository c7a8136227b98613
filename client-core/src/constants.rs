//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every getter reads its environment variable and falls back to the default here.

use std::time::Duration;

/// Default inference backend URL
///
/// All demo backends listen on port 5000 during development.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default health poll interval (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;

/// Default prediction request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default health probe timeout (seconds)
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Prediction Client";

// ============================================
// Environment variable names
// ============================================

pub const ENV_API_URL: &str = "PREDICT_API_URL";
pub const ENV_HEALTH_PATH: &str = "PREDICT_HEALTH_PATH";
pub const ENV_PREDICT_PATH: &str = "PREDICT_PATH";
pub const ENV_POLL_INTERVAL_MS: &str = "PREDICT_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PREDICT_REQUEST_TIMEOUT_SECS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "PREDICT_PROBE_TIMEOUT_SECS";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get backend URL from environment or use default
pub fn get_api_url() -> String {
    std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get health poll interval from environment or use default
pub fn get_poll_interval() -> Duration {
    Duration::from_millis(env_u64(ENV_POLL_INTERVAL_MS, DEFAULT_POLL_INTERVAL_MS))
}

/// Get prediction timeout from environment or use default
pub fn get_request_timeout() -> Duration {
    Duration::from_secs(env_u64(ENV_REQUEST_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS))
}

/// Get probe timeout from environment or use default
pub fn get_probe_timeout() -> Duration {
    Duration::from_secs(env_u64(ENV_PROBE_TIMEOUT_SECS, DEFAULT_PROBE_TIMEOUT_SECS))
}

/// Read a positive integer, warning and falling back on garbage or zero
fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 => value,
            _ => {
                log::warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
