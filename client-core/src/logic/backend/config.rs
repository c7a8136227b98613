//! Backend configuration
//!
//! Where the backend lives and how patient to be with it. Defaults come from
//! `constants`, overridable per variable through the environment or `.env`.

use reqwest::Url;
use std::time::Duration;

use crate::constants;
use crate::error::ConfigError;
use crate::logic::domain::Domain;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub domain: Domain,
    /// Backend base URL, no trailing slash
    pub base_url: String,
    pub health_path: String,
    pub predict_path: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
}

impl ClientConfig {
    /// Defaults for `domain` against `base_url`
    pub fn new(domain: Domain, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            domain,
            base_url: validate_base_url(base_url)?,
            health_path: domain.default_health_path().to_string(),
            predict_path: domain.default_predict_path().to_string(),
            poll_interval: Duration::from_millis(constants::DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(constants::DEFAULT_REQUEST_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(constants::DEFAULT_PROBE_TIMEOUT_SECS),
        })
    }

    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env(domain: Domain) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::new(domain, &constants::get_api_url())?;

        if let Ok(path) = std::env::var(constants::ENV_HEALTH_PATH) {
            config.health_path = normalize_path(&path);
        }
        if let Ok(path) = std::env::var(constants::ENV_PREDICT_PATH) {
            config.predict_path = normalize_path(&path);
        }

        config.poll_interval = constants::get_poll_interval();
        config.request_timeout = constants::get_request_timeout();
        config.probe_timeout = constants::get_probe_timeout();

        Ok(config)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, self.health_path)
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, self.predict_path)
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "expected an http(s) URL with a host".to_string(),
        });
    }

    Ok(trimmed.to_string())
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
