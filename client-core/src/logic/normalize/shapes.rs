//! Per-domain response shapes

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

use super::types::{Label, PredictionResult, PriceForecast, Recommendation};
use super::{
    array, boolean, check_unit, integer, number, optional_number, optional_string, string,
    unit_interval,
};
use crate::error::NormalizationError;
use crate::logic::domain::Domain;

/// Highest rating the recommender hands out
pub const MAX_RATING: f64 = 5.0;

fn result(
    domain: Domain,
    label: Label,
    confidence: f64,
    secondary_scores: BTreeMap<String, f64>,
) -> PredictionResult {
    PredictionResult {
        domain,
        label,
        confidence,
        secondary_scores,
        received_at: Utc::now(),
    }
}

// ============================================================================
// CLASSIFIERS
// ============================================================================

/// `{prediction, confidence, probabilities: {legitimate, phishing}}`
///
/// Class 0 is the phishing class.
pub fn phishing(body: &Value) -> Result<PredictionResult, NormalizationError> {
    let prediction = integer(body, "prediction")?;
    let name = match prediction {
        0 => "phishing",
        1 => "legitimate",
        other => {
            return Err(NormalizationError::OutOfRange {
                field: "prediction".into(),
                value: other as f64,
            })
        }
    };
    let confidence = unit_interval(body, "confidence")?;
    let legitimate = unit_interval(body, "probabilities.legitimate")?;
    let phishing = unit_interval(body, "probabilities.phishing")?;

    let mut scores = BTreeMap::new();
    scores.insert("legitimate_probability".to_string(), legitimate);
    scores.insert("phishing_probability".to_string(), phishing);

    Ok(result(Domain::Phishing, Label::class(name), confidence, scores))
}

/// `{is_fraud, confidence, risk_score}`
pub fn fraud(body: &Value) -> Result<PredictionResult, NormalizationError> {
    let is_fraud = boolean(body, "is_fraud")?;
    let confidence = unit_interval(body, "confidence")?;
    let risk_score = unit_interval(body, "risk_score")?;

    let label = Label::class(if is_fraud { "fraud" } else { "normal" });
    let mut scores = BTreeMap::new();
    scores.insert("risk_score".to_string(), risk_score);

    Ok(result(Domain::Fraud, label, confidence, scores))
}

/// `{is_spam, confidence, spam_probability}`
pub fn spam(body: &Value) -> Result<PredictionResult, NormalizationError> {
    let is_spam = boolean(body, "is_spam")?;
    let confidence = unit_interval(body, "confidence")?;
    let spam_probability = unit_interval(body, "spam_probability")?;

    let label = Label::class(if is_spam { "spam" } else { "ham" });
    let mut scores = BTreeMap::new();
    scores.insert("spam_probability".to_string(), spam_probability);

    Ok(result(Domain::Spam, label, confidence, scores))
}

// ============================================================================
// RECOMMENDATIONS
// ============================================================================

/// `{user, recommendations: [{item, rating}], message?, confidence?}`
pub fn recommendation(body: &Value) -> Result<PredictionResult, NormalizationError> {
    let user = string(body, "user")?;
    let entries = array(body, "recommendations")?;

    let mut items = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        items.push(recommendation_item(entry, i)?);
    }

    let confidence = match optional_number(body, "confidence")? {
        Some(value) => check_unit(value, "confidence")?,
        // Backend order is best first
        None => items.first().map(|top| top.score).unwrap_or(0.0),
    };

    // Ranked keys so repeated item names stay distinct
    let scores = items
        .iter()
        .enumerate()
        .map(|(i, rec)| (score_key(i, &rec.item), rec.score))
        .collect();
    let message = optional_string(body, "message")?;

    let label = Label::Recommendations { user, items, message };
    Ok(result(Domain::Recommendation, label, confidence, scores))
}

/// Secondary score key for the item at zero-based `index`
pub fn score_key(index: usize, item: &str) -> String {
    format!("{}:{}", index + 1, item)
}

fn recommendation_item(entry: &Value, index: usize) -> Result<Recommendation, NormalizationError> {
    let item_path = format!("recommendations[{}].item", index);
    let rating_path = format!("recommendations[{}].rating", index);

    let item = match entry.get("item") {
        None => return Err(NormalizationError::MissingField(item_path)),
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or(NormalizationError::WrongType { field: item_path, expected: "string" })?,
    };

    let rating = match entry.get("rating") {
        None => return Err(NormalizationError::MissingField(rating_path)),
        Some(value) => value
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| NormalizationError::WrongType {
                field: rating_path.clone(),
                expected: "number",
            })?,
    };
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(NormalizationError::OutOfRange { field: rating_path, value: rating });
    }

    Ok(Recommendation { item, rating, score: rating / MAX_RATING })
}

// ============================================================================
// FORECASTS
// ============================================================================

/// `{symbol, current_price, predicted_price, company_name?, price_change?,
/// percent_change?, prediction_date?, confidence?}`
pub fn stock(body: &Value) -> Result<PredictionResult, NormalizationError> {
    let symbol = string(body, "symbol")?;
    let predicted_price = number(body, "predicted_price")?;
    let current_price = number(body, "current_price")?;

    // A point forecast carries no probability of its own
    let confidence = match optional_number(body, "confidence")? {
        Some(value) => check_unit(value, "confidence")?,
        None => 1.0,
    };

    let mut scores = BTreeMap::new();
    scores.insert("current_price".to_string(), current_price);
    for key in ["price_change", "percent_change"] {
        if let Some(value) = optional_number(body, key)? {
            scores.insert(key.to_string(), value);
        }
    }

    let forecast = PriceForecast {
        symbol,
        company_name: optional_string(body, "company_name")?,
        current_price,
        predicted_price,
        prediction_date: optional_string(body, "prediction_date")?,
    };

    Ok(result(Domain::Stock, Label::Price(forecast), confidence, scores))
}
