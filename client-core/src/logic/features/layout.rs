//! Feature Layout - Centralized Feature Definition
//!
//! ## Rules:
//! 1. Add feature → increment LAYOUT_VERSION
//! 2. Change order → increment LAYOUT_VERSION
//! 3. Remove feature → increment LAYOUT_VERSION
//!
//! The backends were trained on these exact orderings. A vector built
//! against a different layout must never reach `/predict`.

use crc32fast::Hasher;
use thiserror::Error;

use crate::logic::domain::Domain;

// ============================================================================
// LAYOUT VERSION
// ============================================================================

/// Current feature layout version
pub const LAYOUT_VERSION: u8 = 1;

/// Length of every vector-based layout
pub const FEATURE_COUNT: usize = 10;

// ============================================================================
// LAYOUTS (Authoritative source)
// ============================================================================

/// Phishing URL heuristics, in backend order
pub const PHISHING_LAYOUT: &[&str] = &[
    "ip_literal_host",       // 0: host carries an IPv4 literal
    "at_symbol",             // 1: '@' anywhere in the URL
    "url_length",            // 2: length score
    "host_dot_count",        // 3: dots in host x15
    "host_hyphen_count",     // 4: hyphens in host x20
    "non_https",             // 5: scheme other than https
    "suspicious_tld",        // 6: host ends in a denylisted TLD
    "subdomain_depth",       // 7: dots in host x25
    "special_char_count",    // 8: '%@!&' in URL x15
    "host_has_digit",        // 9: any digit in host
];

/// Fraud / intrusion features are anonymous, normalized inputs
pub const FRAUD_LAYOUT: &[&str] = &[
    "feature_1", "feature_2", "feature_3", "feature_4", "feature_5",
    "feature_6", "feature_7", "feature_8", "feature_9", "feature_10",
];

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Named, ordered layout for one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLayout {
    pub domain: Domain,
    pub names: &'static [&'static str],
}

impl FeatureLayout {
    pub const PHISHING: FeatureLayout = FeatureLayout {
        domain: Domain::Phishing,
        names: PHISHING_LAYOUT,
    };

    pub const FRAUD: FeatureLayout = FeatureLayout {
        domain: Domain::Fraud,
        names: FRAUD_LAYOUT,
    };

    /// Layout for a vector-based domain, `None` for payload domains
    pub fn for_domain(domain: Domain) -> Option<Self> {
        match domain {
            Domain::Phishing => Some(Self::PHISHING),
            Domain::Fraud => Some(Self::FRAUD),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// CRC32 over version, domain and names in order
    pub fn hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&[LAYOUT_VERSION]);
        hasher.update(self.domain.as_str().as_bytes());
        hasher.update(&[0]);

        for name in self.names {
            hasher.update(name.as_bytes());
            hasher.update(&[0]); // Separator
        }

        hasher.finalize()
    }

    /// Get feature name by index
    pub fn feature_name(&self, index: usize) -> Option<&'static str> {
        self.names.get(index).copied()
    }

    /// Check that a vector stamped with `version`/`hash` belongs to this layout
    pub fn validate(&self, version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
        let expected_hash = self.hash();

        if version != LAYOUT_VERSION || hash != expected_hash {
            return Err(LayoutMismatchError {
                domain: self.domain,
                expected_version: LAYOUT_VERSION,
                expected_hash,
                actual_version: version,
                actual_hash: hash,
            });
        }

        Ok(())
    }
}

/// Vector stamped with a different layout than the one it is checked against
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Feature layout mismatch for {domain}: expected v{expected_version} (hash: {expected_hash:08x}), got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub domain: Domain,
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}
