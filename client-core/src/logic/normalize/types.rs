//! Result Types
//!
//! One record for every domain, so display code never branches on backend shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::logic::domain::Domain;

/// Normalized prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub domain: Domain,
    pub label: Label,
    /// Always within [0, 1]
    pub confidence: f64,
    /// Extra scores the backend reported, by name.
    /// Recommendation scores are keyed `"{rank}:{item}"`, rank from 1.
    pub secondary_scores: BTreeMap<String, f64>,
    pub received_at: DateTime<Utc>,
}

impl PredictionResult {
    /// "87.50%"
    pub fn confidence_percent(&self) -> String {
        format_percent(self.confidence)
    }

    /// One-line headline for the label
    pub fn headline(&self) -> String {
        match &self.label {
            Label::Class { name } => name.to_uppercase(),
            Label::Recommendations { user, items, .. } => {
                let noun = if items.len() == 1 { "item" } else { "items" };
                format!("{} recommended {} for {}", items.len(), noun, user)
            }
            Label::Price(forecast) => format!(
                "{}: {:.2} -> {:.2}",
                forecast.symbol, forecast.current_price, forecast.predicted_price
            ),
        }
    }
}

/// Render a [0, 1] value as a percentage with two decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// What the backend decided
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Label {
    /// Binary classification ("phishing", "fraud", "spam", ...)
    Class { name: String },
    /// Ranked list, backend order
    Recommendations {
        user: String,
        items: Vec<Recommendation>,
        message: Option<String>,
    },
    /// Point forecast
    Price(PriceForecast),
}

impl Label {
    pub fn class(name: &str) -> Self {
        Label::Class { name: name.to_string() }
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Label::Class { name } => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item: String,
    /// Backend rating, 0 to 5
    pub rating: f64,
    /// rating / 5
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceForecast {
    pub symbol: String,
    pub company_name: Option<String>,
    pub current_price: f64,
    pub predicted_price: f64,
    pub prediction_date: Option<String>,
}

impl PriceForecast {
    pub fn is_upward(&self) -> bool {
        self.predicted_price >= self.current_price
    }
}
