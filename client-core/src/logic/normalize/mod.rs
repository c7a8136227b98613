//! Normalize Module - Backend responses to one result shape
//!
//! Purely structural: no network, no state. Each domain's body layout lives in
//! `shapes`; the helpers here read typed fields out of a JSON object and turn
//! every mismatch into a `NormalizationError` naming the field.

pub mod shapes;
pub mod types;

pub use types::{format_percent, Label, PredictionResult, PriceForecast, Recommendation};

use serde_json::Value;

use crate::error::NormalizationError;
use crate::logic::domain::Domain;

/// Turn a successful backend body into a `PredictionResult`
pub fn normalize(domain: Domain, body: &Value) -> Result<PredictionResult, NormalizationError> {
    match domain {
        Domain::Phishing => shapes::phishing(body),
        Domain::Fraud => shapes::fraud(body),
        Domain::Spam => shapes::spam(body),
        Domain::Recommendation => shapes::recommendation(body),
        Domain::Stock => shapes::stock(body),
    }
}

/// Look up a dotted path ("probabilities.phishing")
fn field<'a>(body: &'a Value, path: &str) -> Result<&'a Value, NormalizationError> {
    let mut current = body;
    for key in path.split('.') {
        current = match current {
            Value::Object(map) => map
                .get(key)
                .ok_or_else(|| NormalizationError::MissingField(path.to_string()))?,
            _ => return Err(wrong_type(path, "object")),
        };
    }
    Ok(current)
}

fn wrong_type(path: &str, expected: &'static str) -> NormalizationError {
    NormalizationError::WrongType { field: path.to_string(), expected }
}

fn as_number(value: &Value, path: &str) -> Result<f64, NormalizationError> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| wrong_type(path, "number"))
}

pub(crate) fn number(body: &Value, path: &str) -> Result<f64, NormalizationError> {
    as_number(field(body, path)?, path)
}

pub(crate) fn integer(body: &Value, path: &str) -> Result<i64, NormalizationError> {
    let value = field(body, path)?;
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    // 1.0 is still an integer label
    match value.as_f64() {
        Some(n) if n.fract() == 0.0 && n.is_finite() => Ok(n as i64),
        _ => Err(wrong_type(path, "integer")),
    }
}

pub(crate) fn boolean(body: &Value, path: &str) -> Result<bool, NormalizationError> {
    field(body, path)?
        .as_bool()
        .ok_or_else(|| wrong_type(path, "boolean"))
}

pub(crate) fn string(body: &Value, path: &str) -> Result<String, NormalizationError> {
    field(body, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(path, "string"))
}

pub(crate) fn array<'a>(body: &'a Value, path: &str) -> Result<&'a [Value], NormalizationError> {
    field(body, path)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| wrong_type(path, "array"))
}

/// Number that must lie in [0, 1]
pub(crate) fn unit_interval(body: &Value, path: &str) -> Result<f64, NormalizationError> {
    check_unit(number(body, path)?, path)
}

pub(crate) fn check_unit(value: f64, path: &str) -> Result<f64, NormalizationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(NormalizationError::OutOfRange { field: path.to_string(), value })
    }
}

/// Absent or null → None; present with the wrong type is still an error
pub(crate) fn optional_number(body: &Value, path: &str) -> Result<Option<f64>, NormalizationError> {
    match body.get(path) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_number(value, path).map(Some),
    }
}

pub(crate) fn optional_string(body: &Value, path: &str) -> Result<Option<String>, NormalizationError> {
    match body.get(path) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| wrong_type(path, "string")),
    }
}
