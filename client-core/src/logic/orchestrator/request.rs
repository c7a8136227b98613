//! Request Orchestrator
//!
//! Runs one prediction at a time for one domain:
//! preconditions → exactly one backend call → interpret → publish.
//! Every submit takes a generation token; a response whose token is no
//! longer current is dropped without touching the state.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

use super::state::RequestState;
use crate::error::{BackendError, PredictionError};
use crate::logic::backend::{reported_error, Backend};
use crate::logic::domain::Domain;
use crate::logic::features::{FeatureExtractor, PredictPayload, RawInput};
use crate::logic::health::HealthState;
use crate::logic::normalize::{normalize, PredictionResult};

/// Cheap to clone; clones share the same state
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    extractor: Box<dyn FeatureExtractor>,
    backend: Arc<dyn Backend>,
    health: watch::Receiver<HealthState>,
    /// Held only for synchronous bookkeeping, never across an await
    tracker: Mutex<Tracker>,
    state_tx: watch::Sender<RequestState>,
}

#[derive(Debug, Default)]
struct Tracker {
    generation: u64,
    shut_down: bool,
}

impl Orchestrator {
    pub fn new(
        extractor: Box<dyn FeatureExtractor>,
        backend: Arc<dyn Backend>,
        health: watch::Receiver<HealthState>,
    ) -> Self {
        let (state_tx, _) = watch::channel(RequestState::Idle);
        Self {
            inner: Arc::new(Inner {
                extractor,
                backend,
                health,
                tracker: Mutex::new(Tracker::default()),
                state_tx,
            }),
        }
    }

    pub fn domain(&self) -> Domain {
        self.inner.extractor.domain()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> RequestState {
        self.inner.state_tx.borrow().clone()
    }

    /// Receiver that sees every transition
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.inner.state_tx.subscribe()
    }

    /// Last successful result, if the state holds one
    pub fn result(&self) -> Option<PredictionResult> {
        self.inner.state_tx.borrow().result().cloned()
    }

    /// Last failure, if the state holds one
    pub fn error(&self) -> Option<PredictionError> {
        self.inner.state_tx.borrow().error().cloned()
    }

    /// Run one prediction.
    ///
    /// The outcome is both returned and published. A response that arrives
    /// after `clear()` is returned to this caller only; after `shutdown()`
    /// the caller gets `ShutDown`. Dropping the future while the request is
    /// in flight puts the state back to Idle.
    pub async fn submit(&self, input: &RawInput) -> Result<PredictionResult, PredictionError> {
        let (generation, payload) = self.begin(input)?;

        let mut in_flight = InFlight { orchestrator: self, generation, settled: false };
        let response = self.inner.backend.predict(&payload).await;
        in_flight.settled = true;

        let outcome = self.interpret(response);
        self.complete(generation, outcome)
    }

    /// Back to Idle, dropping any result or error. Always permitted.
    pub fn clear(&self) {
        let mut tracker = self.inner.tracker.lock();
        // Orphans whatever is in flight
        tracker.generation += 1;
        self.publish(RequestState::Idle);
    }

    /// Tear down: later submits fail with `ShutDown` and in-flight
    /// responses are ignored.
    pub fn shutdown(&self) {
        let mut tracker = self.inner.tracker.lock();
        if !tracker.shut_down {
            tracker.shut_down = true;
            tracker.generation += 1;
            log::info!("{} orchestrator shut down", self.domain());
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.tracker.lock().shut_down
    }

    /// Synchronous precondition block. Runs entirely under the tracker lock
    /// so two submits can never both pass the Pending gate.
    fn begin(&self, input: &RawInput) -> Result<(u64, PredictPayload), PredictionError> {
        let mut tracker = self.inner.tracker.lock();

        if tracker.shut_down {
            return Err(PredictionError::ShutDown);
        }
        if self.inner.state_tx.borrow().is_pending() {
            log::debug!("{} submit rejected: request already pending", self.domain());
            return Err(PredictionError::Busy);
        }

        tracker.generation += 1;
        let generation = tracker.generation;
        self.publish(RequestState::Validating);

        let health = *self.inner.health.borrow();
        if !health.is_online() {
            return Err(self.fail(PredictionError::BackendUnavailable));
        }

        match self.inner.extractor.extract(input) {
            Ok(payload) => {
                self.publish(RequestState::Pending);
                Ok((generation, payload))
            }
            Err(errors) => Err(self.fail(PredictionError::ValidationFailed(errors))),
        }
    }

    /// Map a backend response to the request outcome
    fn interpret(
        &self,
        response: Result<Value, BackendError>,
    ) -> Result<PredictionResult, PredictionError> {
        let body = response?;
        if let Some(message) = reported_error(&body) {
            return Err(PredictionError::BackendReportedError(message));
        }
        Ok(normalize(self.domain(), &body)?)
    }

    /// Apply the outcome if `generation` is still current
    fn complete(
        &self,
        generation: u64,
        outcome: Result<PredictionResult, PredictionError>,
    ) -> Result<PredictionResult, PredictionError> {
        let tracker = self.inner.tracker.lock();

        if tracker.shut_down {
            log::debug!("{} response ignored: shut down", self.domain());
            return Err(PredictionError::ShutDown);
        }
        if tracker.generation != generation {
            log::debug!(
                "{} response discarded (generation {} superseded by {})",
                self.domain(),
                generation,
                tracker.generation
            );
            return outcome;
        }

        match &outcome {
            Ok(result) => {
                log::info!(
                    "{} prediction: {} ({})",
                    self.domain(),
                    result.headline(),
                    result.confidence_percent()
                );
                self.publish(RequestState::Succeeded(result.clone()));
            }
            Err(e) => {
                log::warn!("{} prediction failed: {}", self.domain(), e);
                self.publish(RequestState::Failed(e.clone()));
            }
        }
        outcome
    }

    /// The submit for `generation` went away before its response
    fn abandon(&self, generation: u64) {
        let mut tracker = self.inner.tracker.lock();
        if tracker.shut_down || tracker.generation != generation {
            return;
        }
        tracker.generation += 1;
        log::debug!("{} request abandoned by its caller", self.domain());
        self.publish(RequestState::Idle);
    }

    fn fail(&self, error: PredictionError) -> PredictionError {
        log::debug!("{} submit failed before sending: {}", self.domain(), error);
        self.publish(RequestState::Failed(error.clone()));
        error
    }

    fn publish(&self, next: RequestState) {
        let previous = self.inner.state_tx.send_replace(next);
        log::debug!(
            "{} request: {} -> {}",
            self.domain(),
            previous,
            self.inner.state_tx.borrow().name()
        );
    }
}

/// Settles a submit whose future is dropped mid-request
struct InFlight<'a> {
    orchestrator: &'a Orchestrator,
    generation: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.orchestrator.abandon(self.generation);
        }
    }
}
