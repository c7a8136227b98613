//! Features Module - Feature Extraction Engine
//!
//! Turns raw form input into the payload a backend expects.
//! Adding a domain means adding a layout and a strategy, nothing else.

pub mod layout;
pub mod vector;
pub mod url;
pub mod numeric;
pub mod extractor;
pub mod sample;


// Re-export common types
pub use extractor::{extractor_for, normalize_symbol, FeatureExtractor, PredictPayload, RawInput};
pub use layout::{FeatureLayout, FEATURE_COUNT};
pub use vector::FeatureVector;
