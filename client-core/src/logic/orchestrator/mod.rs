//! Orchestrator Module - Request lifecycle
//!
//! One `Orchestrator` per domain. Each owns its own state; nothing is global.

pub mod request;
pub mod state;

pub use request::Orchestrator;
pub use state::RequestState;
