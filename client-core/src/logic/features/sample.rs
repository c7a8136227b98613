//! Sample Inputs - ready-made input for trying a backend
//!
//! Vector domains get random values in the range their model expects; the
//! payload domains get fixed presets the demo backends know about.

use rand::seq::SliceRandom;
use rand::Rng;

use super::extractor::RawInput;
use super::layout::FeatureLayout;
use super::vector::{round2, FeatureVector};
use crate::logic::domain::Domain;

pub const SPAM_EXAMPLES: &[&str] = &[
    "FREE! Win $1000 cash prize now! Click here!",
    "Congratulations! You've won a free iPhone. Claim now!",
    "Buy cheap pills online. Best prices guaranteed!",
    "URGENT: Your account will be closed. Verify now!",
    "Make money from home. No experience needed!",
];

pub const HAM_EXAMPLES: &[&str] = &[
    "Hi, how are you? Let's meet for coffee tomorrow.",
    "The project deadline is next Friday. Please review the document.",
    "Thanks for your help with the presentation yesterday.",
    "Reminder: Team meeting at 3pm in conference room.",
    "Can you send me the latest report when you have time?",
];

/// Users the recommender has ratings for
pub const SAMPLE_USERS: &[&str] = &["alice", "bob", "charlie", "diana", "eve"];

pub const DEFAULT_SYMBOL: &str = "AAPL";

const SAMPLE_SYMBOLS: &[&str] = &[DEFAULT_SYMBOL];

/// Named preset groups for a payload domain, empty for vector domains
pub fn presets(domain: Domain) -> Vec<(&'static str, &'static [&'static str])> {
    match domain {
        Domain::Spam => vec![("spam", SPAM_EXAMPLES), ("ham", HAM_EXAMPLES)],
        Domain::Recommendation => vec![("user", SAMPLE_USERS)],
        Domain::Stock => vec![("symbol", SAMPLE_SYMBOLS)],
        Domain::Phishing | Domain::Fraud => Vec::new(),
    }
}

/// Input any domain's extractor accepts as-is
pub fn sample_input(domain: Domain) -> RawInput {
    sample_input_with(domain, &mut rand::thread_rng())
}

pub fn sample_input_with<R: Rng + ?Sized>(domain: Domain, rng: &mut R) -> RawInput {
    match domain {
        Domain::Phishing | Domain::Fraud => {
            let fields = sample_features_with(domain, rng)
                .map(|vector| vector.as_slice().iter().map(f64::to_string).collect())
                .unwrap_or_default();
            RawInput::Fields(fields)
        }
        Domain::Spam => {
            let pool = if rng.gen_bool(0.5) { SPAM_EXAMPLES } else { HAM_EXAMPLES };
            RawInput::Text(pick(pool, rng))
        }
        Domain::Recommendation => RawInput::User(pick(SAMPLE_USERS, rng)),
        Domain::Stock => RawInput::Symbol(DEFAULT_SYMBOL.to_string()),
    }
}

fn pick<R: Rng + ?Sized>(pool: &[&str], rng: &mut R) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

/// Value range the domain's backend expects
pub fn sample_range(domain: Domain) -> Option<(f64, f64)> {
    match domain {
        // Heuristic scores
        Domain::Phishing => Some((0.0, 100.0)),
        // Standardized inputs
        Domain::Fraud => Some((-3.0, 3.0)),
        _ => None,
    }
}

/// Random vector for a vector-based domain, `None` for payload domains
pub fn sample_features(domain: Domain) -> Option<FeatureVector> {
    sample_features_with(domain, &mut rand::thread_rng())
}

pub fn sample_features_with<R: Rng + ?Sized>(domain: Domain, rng: &mut R) -> Option<FeatureVector> {
    let layout = FeatureLayout::for_domain(domain)?;
    let (low, high) = sample_range(domain)?;

    let values = (0..layout.len())
        .map(|_| round2(rng.gen_range(low..=high)))
        .collect();

    FeatureVector::new(layout, values).ok()
}
