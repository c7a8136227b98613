//! API Module
//!
//! Command implementations behind the `prediction-client` binary.
//! Each returns a serializable report; `main` decides how to print it.

pub mod commands;

pub use commands::*;
