//! Logic Module - Prediction client engines
//!
//! - `features/` - Raw input → request payload
//! - `backend/` - HTTP transport to the inference service
//! - `health/` - Background liveness polling
//! - `orchestrator/` - One request at a time, observable state
//! - `normalize/` - Backend body → `PredictionResult`
//! - `market/` - Stock price history and ticker suggestions

pub mod domain;

pub mod features;
pub mod backend;
pub mod health;
pub mod orchestrator;
pub mod normalize;
pub mod market;
