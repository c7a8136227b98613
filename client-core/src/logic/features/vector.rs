//! Feature Vector - Core data structure for backend input
//!
//! Every vector remembers the layout it was built against so a phishing
//! vector can never be posted to the fraud backend by accident.

use serde::{Deserialize, Serialize};

use super::layout::{FeatureLayout, LayoutMismatchError, LAYOUT_VERSION};
use crate::error::ExtractionError;
use crate::logic::domain::Domain;

/// Versioned feature vector with layout metadata
///
/// Only constructible with the right arity and finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Domain whose layout the values follow
    pub domain: Domain,
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout
    pub layout_hash: u32,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build a vector, checking arity and finiteness against `layout`
    pub fn new(layout: FeatureLayout, values: Vec<f64>) -> Result<Self, ExtractionError> {
        if values.len() != layout.len() {
            return Err(ExtractionError::WrongArity {
                expected: layout.len(),
                actual: values.len(),
            });
        }

        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(ExtractionError::NotANumber {
                index,
                value: values[index].to_string(),
            });
        }

        Ok(Self {
            domain: layout.domain,
            version: LAYOUT_VERSION,
            layout_hash: layout.hash(),
            values,
        })
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn layout(&self) -> Option<FeatureLayout> {
        FeatureLayout::for_domain(self.domain)
    }

    /// Validate that this vector still matches its domain's current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        match self.layout() {
            Some(layout) => layout.validate(self.version, self.layout_hash),
            None => Err(LayoutMismatchError {
                domain: self.domain,
                expected_version: LAYOUT_VERSION,
                expected_hash: 0,
                actual_version: self.version,
                actual_hash: self.layout_hash,
            }),
        }
    }

    /// Named values for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        let names = self.layout().map(|l| l.names).unwrap_or(&[]);
        serde_json::json!({
            "domain": self.domain,
            "feature_version": self.version,
            "layout_hash": format!("{:08x}", self.layout_hash),
            "named_values": names.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<String, serde_json::Value>>(),
        })
    }
}

/// Round to 2 decimal places, the precision the backends were trained on
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
