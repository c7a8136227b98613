//! Prediction Domains
//!
//! One entry per demo backend. A domain fixes the request payload, the
//! endpoints and the response shape the normalizer expects.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// URL classifier, 10 heuristic features
    Phishing,
    /// Fraud / intrusion classifier, 10 raw features
    Fraud,
    /// Message classifier, free text
    Spam,
    /// Per-user ranked recommendations
    Recommendation,
    /// Next-day price forecast for a ticker
    Stock,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Phishing,
        Domain::Fraud,
        Domain::Spam,
        Domain::Recommendation,
        Domain::Stock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Phishing => "phishing",
            Domain::Fraud => "fraud",
            Domain::Spam => "spam",
            Domain::Recommendation => "recommendation",
            Domain::Stock => "stock",
        }
    }

    /// Liveness endpoint the backend exposes
    pub fn default_health_path(&self) -> &'static str {
        match self {
            Domain::Phishing => "/health",
            _ => "/",
        }
    }

    /// Prediction endpoint the backend exposes
    pub fn default_predict_path(&self) -> &'static str {
        match self {
            Domain::Stock => "/api/predict",
            _ => "/predict",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phishing" | "phishing_url" | "url" => Ok(Domain::Phishing),
            "fraud" | "intrusion" => Ok(Domain::Fraud),
            "spam" => Ok(Domain::Spam),
            "recommendation" | "recommendations" | "recommend" => Ok(Domain::Recommendation),
            "stock" | "stocks" => Ok(Domain::Stock),
            _ => Err(ConfigError::UnknownDomain(s.to_string())),
        }
    }
}
