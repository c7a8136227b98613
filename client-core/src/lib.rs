//! Prediction Client
//!
//! Client-side pipeline for remote classifiers: extract features from user
//! input, watch backend health, run one prediction at a time and normalize
//! whatever the backend answers into a single result shape.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{BackendError, ConfigError, ExtractionError, NormalizationError, PredictionError};
pub use logic::backend::{Backend, ClientConfig, HttpBackend};
pub use logic::domain::Domain;
pub use logic::features::{extractor_for, FeatureExtractor, FeatureVector, PredictPayload, RawInput};
pub use logic::health::{HealthMonitor, HealthState, HealthStatus};
pub use logic::market::{fetch_history, fetch_popular, PopularStock, PriceHistory, PricePoint};
pub use logic::normalize::{normalize, Label, PredictionResult};
pub use logic::orchestrator::{Orchestrator, RequestState};
