//! Numeric Entry - form fields to feature vector
//!
//! Each field is checked, and every bad field is reported, so a form can
//! mark all of them at once.

use super::layout::FeatureLayout;
use super::vector::FeatureVector;
use crate::error::ExtractionError;

/// Parse one string per feature into a vector for `layout`
pub fn parse_fields<S: AsRef<str>>(
    layout: FeatureLayout,
    fields: &[S],
) -> Result<FeatureVector, Vec<ExtractionError>> {
    let mut errors = Vec::new();

    if fields.len() != layout.len() {
        errors.push(ExtractionError::WrongArity {
            expected: layout.len(),
            actual: fields.len(),
        });
    }

    let mut values = Vec::with_capacity(fields.len());
    for (index, raw) in fields.iter().enumerate() {
        match parse_field(index, raw.as_ref()) {
            Ok(value) => values.push(value),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    FeatureVector::new(layout, values).map_err(|e| vec![e])
}

fn parse_field(index: usize, raw: &str) -> Result<f64, ExtractionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::missing_index(index));
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ExtractionError::NotANumber {
            index,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_fields() {
        let input = fields(&["1", "-2.5", " 3 ", "0", "1e2", "0.01", "7", "8", "9", "-3"]);
        let vector = parse_fields(FeatureLayout::FRAUD, &input).unwrap();
        assert_eq!(vector.len(), 10);
        assert_eq!(vector.as_slice()[1], -2.5);
        assert_eq!(vector.as_slice()[2], 3.0);
        assert_eq!(vector.as_slice()[4], 100.0);
        assert!(vector.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_reports_every_bad_field() {
        let input = fields(&["1", "", "x", "4", "   ", "6", "NaN", "8", "inf", "10"]);
        let errors = parse_fields(FeatureLayout::FRAUD, &input).unwrap_err();

        assert_eq!(
            errors,
            vec![
                ExtractionError::missing_index(1),
                ExtractionError::NotANumber { index: 2, value: "x".into() },
                ExtractionError::missing_index(4),
                ExtractionError::NotANumber { index: 6, value: "NaN".into() },
                ExtractionError::NotANumber { index: 8, value: "inf".into() },
            ]
        );
    }

    #[test]
    fn test_wrong_arity_is_reported_with_field_errors() {
        let input = fields(&["1", "", "3"]);
        let errors = parse_fields(FeatureLayout::FRAUD, &input).unwrap_err();
        assert_eq!(errors[0], ExtractionError::WrongArity { expected: 10, actual: 3 });
        assert_eq!(errors[1], ExtractionError::missing_index(1));
        assert_eq!(errors.len(), 2);
    }
}
