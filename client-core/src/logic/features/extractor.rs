//! Extraction Strategies
//!
//! Raw form input → request payload, one strategy per domain.
//! Pure and synchronous; nothing here touches the network.

use serde::{Deserialize, Serialize};

use super::layout::FeatureLayout;
use super::numeric::parse_fields;
use super::url::extract_url_features;
use super::vector::FeatureVector;
use crate::error::ExtractionError;
use crate::logic::domain::Domain;

// ============================================================================
// INPUT / OUTPUT
// ============================================================================

/// What the user typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// URL to score heuristically
    Url(String),
    /// One string per feature, as entered in a numeric form
    Fields(Vec<String>),
    /// Free text message
    Text(String),
    /// User id
    User(String),
    /// Ticker symbol
    Symbol(String),
}

impl RawInput {
    pub fn kind(&self) -> &'static str {
        match self {
            RawInput::Url(_) => "url",
            RawInput::Fields(_) => "numeric",
            RawInput::Text(_) => "text",
            RawInput::User(_) => "user",
            RawInput::Symbol(_) => "symbol",
        }
    }
}

/// JSON body for the prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictPayload {
    Features { features: Vec<f64> },
    Text { text: String },
    User { user: String },
    Symbol { symbol: String },
}

/// Only vectors still matching their domain's layout become payloads
impl TryFrom<FeatureVector> for PredictPayload {
    type Error = ExtractionError;

    fn try_from(vector: FeatureVector) -> Result<Self, Self::Error> {
        vector.validate()?;
        Ok(PredictPayload::Features { features: vector.into_values() })
    }
}

fn vector_payload(vector: FeatureVector) -> Result<PredictPayload, Vec<ExtractionError>> {
    PredictPayload::try_from(vector).map_err(|e| vec![e])
}

// ============================================================================
// STRATEGY TRAIT
// ============================================================================

/// Pluggable input → payload strategy
pub trait FeatureExtractor: Send + Sync {
    fn domain(&self) -> Domain;

    /// All problems with the input, or the payload to send
    fn extract(&self, input: &RawInput) -> Result<PredictPayload, Vec<ExtractionError>>;
}

/// Default strategy for a domain
pub fn extractor_for(domain: Domain) -> Box<dyn FeatureExtractor> {
    match domain {
        Domain::Phishing => Box::new(PhishingExtractor),
        Domain::Fraud => Box::new(NumericExtractor::new(FeatureLayout::FRAUD)),
        Domain::Spam => Box::new(TextExtractor),
        Domain::Recommendation => Box::new(UserExtractor),
        Domain::Stock => Box::new(SymbolExtractor),
    }
}

fn unsupported(domain: Domain, input: &RawInput) -> Vec<ExtractionError> {
    vec![ExtractionError::UnsupportedInput {
        domain: domain.as_str(),
        got: input.kind(),
    }]
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// URL heuristics, or hand-edited feature fields
#[derive(Debug, Clone, Copy, Default)]
pub struct PhishingExtractor;

impl FeatureExtractor for PhishingExtractor {
    fn domain(&self) -> Domain {
        Domain::Phishing
    }

    fn extract(&self, input: &RawInput) -> Result<PredictPayload, Vec<ExtractionError>> {
        match input {
            RawInput::Url(url) => extract_url_features(url)
                .map_err(|e| vec![e])
                .and_then(vector_payload),
            RawInput::Fields(fields) => {
                parse_fields(FeatureLayout::PHISHING, fields).and_then(vector_payload)
            }
            other => Err(unsupported(self.domain(), other)),
        }
    }
}

/// Direct numeric entry against a fixed layout
#[derive(Debug, Clone, Copy)]
pub struct NumericExtractor {
    layout: FeatureLayout,
}

impl NumericExtractor {
    pub fn new(layout: FeatureLayout) -> Self {
        Self { layout }
    }
}

impl FeatureExtractor for NumericExtractor {
    fn domain(&self) -> Domain {
        self.layout.domain
    }

    fn extract(&self, input: &RawInput) -> Result<PredictPayload, Vec<ExtractionError>> {
        match input {
            RawInput::Fields(fields) => parse_fields(self.layout, fields).and_then(vector_payload),
            other => Err(unsupported(self.domain(), other)),
        }
    }
}

/// Message text, sent as typed
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl FeatureExtractor for TextExtractor {
    fn domain(&self) -> Domain {
        Domain::Spam
    }

    fn extract(&self, input: &RawInput) -> Result<PredictPayload, Vec<ExtractionError>> {
        match input {
            RawInput::Text(text) if text.trim().is_empty() => {
                Err(vec![ExtractionError::missing_named("text")])
            }
            RawInput::Text(text) => Ok(PredictPayload::Text { text: text.clone() }),
            other => Err(unsupported(self.domain(), other)),
        }
    }
}

/// User id, trimmed
#[derive(Debug, Clone, Copy, Default)]
pub struct UserExtractor;

impl FeatureExtractor for UserExtractor {
    fn domain(&self) -> Domain {
        Domain::Recommendation
    }

    fn extract(&self, input: &RawInput) -> Result<PredictPayload, Vec<ExtractionError>> {
        match input {
            RawInput::User(user) => match user.trim() {
                "" => Err(vec![ExtractionError::missing_named("user")]),
                trimmed => Ok(PredictPayload::User { user: trimmed.to_string() }),
            },
            other => Err(unsupported(self.domain(), other)),
        }
    }
}

/// Ticker symbol, trimmed and upper-cased
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolExtractor;

impl FeatureExtractor for SymbolExtractor {
    fn domain(&self) -> Domain {
        Domain::Stock
    }

    fn extract(&self, input: &RawInput) -> Result<PredictPayload, Vec<ExtractionError>> {
        match input {
            RawInput::Symbol(symbol) => normalize_symbol(symbol)
                .map(|symbol| PredictPayload::Symbol { symbol })
                .map_err(|e| vec![e]),
            other => Err(unsupported(self.domain(), other)),
        }
    }
}

/// Trimmed, upper-cased ticker ("brk-b" → "BRK-B", "^gspc" → "^GSPC").
/// The symbol also ends up in URL paths, so only ticker characters pass.
pub fn normalize_symbol(raw: &str) -> Result<String, ExtractionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::missing_named("symbol"));
    }
    let valid = trimmed.len() <= 16
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(ExtractionError::InvalidSymbol(trimmed.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}
