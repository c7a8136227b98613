//! URL Features - Phishing heuristics
//!
//! Ten scores derived from a URL string, in `PHISHING_LAYOUT` order.
//! The host dot count is scored twice (index 3 at x15, index 7 at x25);
//! the phishing backend was trained on both.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

use super::layout::FeatureLayout;
use super::vector::{round2, FeatureVector};
use crate::error::ExtractionError;

/// IPv4-shaped run anywhere in the host
static IPV4_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,3}\.){3}[0-9]{1,3}").expect("valid IPv4 pattern"));

/// Denylisted top-level domains
static SUSPICIOUS_TLD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(tk|ml|ga|cf|ru|xyz|top)$").expect("valid TLD pattern"));

/// URLs longer than this get the flat "long URL" score
const LONG_URL_THRESHOLD: usize = 75;

const SPECIAL_CHARS: [char; 4] = ['%', '@', '!', '&'];

/// Extract the phishing feature vector from a URL
pub fn extract_url_features(input: &str) -> Result<FeatureVector, ExtractionError> {
    let url = Url::parse(input).map_err(|e| ExtractionError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h.trim_start_matches('[').trim_end_matches(']'),
        _ => {
            return Err(ExtractionError::InvalidUrl {
                input: input.to_string(),
                reason: "URL has no host".to_string(),
            })
        }
    };

    // Length is measured on the text as typed, in UTF-16 units like a browser would
    let length = input.encode_utf16().count();
    let host_dots = host.matches('.').count() as f64;
    let host_hyphens = host.matches('-').count() as f64;
    let special_chars = input.chars().filter(|c| SPECIAL_CHARS.contains(c)).count() as f64;

    let scores = vec![
        flag(IPV4_PATTERN.is_match(host), 95.0, 5.0),
        flag(input.contains('@'), 90.0, 10.0),
        length_score(length),
        (host_dots * 15.0).min(100.0),
        (host_hyphens * 20.0).min(100.0),
        flag(url.scheme() != "https", 85.0, 15.0),
        flag(SUSPICIOUS_TLD_PATTERN.is_match(host), 90.0, 10.0),
        (host_dots * 25.0).min(100.0),
        (special_chars * 15.0).min(100.0),
        flag(host.chars().any(|c| c.is_ascii_digit()), 70.0, 20.0),
    ];

    FeatureVector::new(FeatureLayout::PHISHING, scores.into_iter().map(round2).collect())
}

fn flag(condition: bool, hit: f64, miss: f64) -> f64 {
    if condition {
        hit
    } else {
        miss
    }
}

fn length_score(length: usize) -> f64 {
    let score = if length > LONG_URL_THRESHOLD {
        85.0
    } else {
        length as f64 / 1.2
    };
    score.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(url: &str) -> Vec<f64> {
        extract_url_features(url).unwrap().into_values()
    }

    #[test]
    fn test_ip_literal_with_at_symbol() {
        let f = features("http://192.168.0.1/a@b");
        assert_eq!(f[0], 95.0); // IP literal
        assert_eq!(f[1], 90.0); // '@'
        assert_eq!(f[2], 18.33); // 22 / 1.2
        assert_eq!(f[3], 45.0);
        assert_eq!(f[4], 0.0);
        assert_eq!(f[5], 85.0); // not https
        assert_eq!(f[6], 10.0);
        assert_eq!(f[7], 75.0);
        assert_eq!(f[8], 15.0);
        assert_eq!(f[9], 70.0);
    }

    #[test]
    fn test_clean_https_url() {
        let f = features("https://example.com");
        assert_eq!(f, vec![5.0, 10.0, 15.83, 15.0, 0.0, 15.0, 10.0, 25.0, 0.0, 20.0]);
    }

    #[test]
    fn test_suspicious_host() {
        let f = features("https://secure-login.paypal.com.verify-account.tk/signin?x=1&y=2");
        assert_eq!(f[0], 5.0);
        assert_eq!(f[3], 60.0); // 4 dots
        assert_eq!(f[4], 40.0); // 2 hyphens
        assert_eq!(f[5], 15.0);
        assert_eq!(f[6], 90.0); // .tk
        assert_eq!(f[7], 100.0); // capped
        assert_eq!(f[8], 15.0); // '&'
        assert_eq!(f[9], 20.0);
    }

    #[test]
    fn test_long_url_gets_flat_score() {
        let url = format!("https://example.com/{}", "a".repeat(80));
        assert_eq!(features(&url)[2], 85.0);
    }

    #[test]
    fn test_tld_must_follow_a_dot() {
        // "xyz" as a label suffix is not the TLD
        assert_eq!(features("https://shopxyz.com")[6], 10.0);
        assert_eq!(features("https://shop.xyz")[6], 90.0);
        assert_eq!(features("https://SHOP.RU")[6], 90.0);
    }

    #[test]
    fn test_special_chars_are_capped() {
        let f = features("http://a.com/%%%%%%%%!!!");
        assert_eq!(f[8], 100.0);
    }

    #[test]
    fn test_invalid_urls() {
        for input in ["", "example.com", "not a url", "mailto:someone@example.com"] {
            let err = extract_url_features(input).unwrap_err();
            assert!(matches!(err, ExtractionError::InvalidUrl { .. }), "{input:?} -> {err:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        let url = "http://login-verify.account.xyz:8080/path?token=1%20&a=b";
        let first = extract_url_features(url).unwrap();
        for _ in 0..10 {
            assert_eq!(extract_url_features(url).unwrap(), first);
        }
    }
}
