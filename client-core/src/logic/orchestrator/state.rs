//! Request lifecycle states

use crate::error::PredictionError;
use crate::logic::normalize::PredictionResult;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    /// Nothing submitted, or cleared
    #[default]
    Idle,
    /// Preconditions running
    Validating,
    /// One prediction request in flight
    Pending,
    Succeeded(PredictionResult),
    Failed(PredictionError),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Validating => "validating",
            RequestState::Pending => "pending",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed(_) => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            RequestState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(RequestState::default(), RequestState::Idle);
        assert!(RequestState::Pending.is_pending());

        let failed = RequestState::Failed(PredictionError::Busy);
        assert_eq!(failed.error(), Some(&PredictionError::Busy));
        assert!(failed.result().is_none());
        assert_eq!(failed.to_string(), "failed");
    }
}
