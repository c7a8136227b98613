//! Health Monitor
//!
//! Background task probing the backend on a fixed interval.
//! The handle owns the task: `stop()` or dropping it ends the polling.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{classify_probe, HealthState};
use crate::logic::backend::Backend;

/// Shortest accepted probe period
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Probe bookkeeping for status displays
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthStatus {
    pub state: HealthState,
    pub last_probe: Option<DateTime<Utc>>,
    pub probe_count: u64,
    pub last_error: Option<String>,
}

/// Running health poller
pub struct HealthMonitor {
    state_rx: watch::Receiver<HealthState>,
    status: Arc<RwLock<HealthStatus>>,
    task: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    /// Probe now, then every `poll_interval`, until stopped.
    ///
    /// Must be called from inside a tokio runtime.
    /// Intervals under `MIN_POLL_INTERVAL`, zero included, are raised to it.
    pub fn start(backend: Arc<dyn Backend>, poll_interval: Duration) -> Self {
        let poll_interval = if poll_interval < MIN_POLL_INTERVAL {
            log::warn!(
                "Poll interval {}ms is too short, using {}ms",
                poll_interval.as_millis(),
                MIN_POLL_INTERVAL.as_millis()
            );
            MIN_POLL_INTERVAL
        } else {
            poll_interval
        };

        let (state_tx, state_rx) = watch::channel(HealthState::Unknown);
        let status = Arc::new(RwLock::new(HealthStatus::default()));

        log::info!("Starting health monitor (every {}ms)", poll_interval.as_millis());
        let task = tokio::spawn(poll_loop(backend, poll_interval, state_tx, status.clone()));

        Self {
            state_rx,
            status,
            task: Some(task),
        }
    }

    /// Current state, by value
    pub fn current(&self) -> HealthState {
        *self.state_rx.borrow()
    }

    /// Receiver that sees every state change
    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.state_rx.clone()
    }

    pub fn status(&self) -> HealthStatus {
        self.status.read().clone()
    }

    /// When the last probe resolved
    pub fn last_probe(&self) -> Option<DateTime<Utc>> {
        self.status.read().last_probe
    }

    /// Wait until the first probe has resolved
    pub async fn first_probe(&self) -> HealthState {
        let mut rx = self.state_rx.clone();
        let state = match rx.wait_for(|state| *state != HealthState::Unknown).await {
            Ok(state) => *state,
            // Task gone before probing
            Err(_) => self.current(),
        };
        state
    }

    /// Cancel polling. Once this returns no further probe runs.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            log::info!("Health monitor stopped");
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll_loop(
    backend: Arc<dyn Backend>,
    poll_interval: Duration,
    state_tx: watch::Sender<HealthState>,
    status: Arc<RwLock<HealthStatus>>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately
        ticker.tick().await;

        let result = backend.health().await;
        let next = classify_probe(&result);

        {
            let mut status = status.write();
            status.state = next;
            status.last_probe = Some(Utc::now());
            status.probe_count += 1;
            status.last_error = result.as_ref().err().map(|e| e.to_string());
        }

        // Repeated results are not changes for subscribers
        let mut previous = next;
        let changed = state_tx.send_if_modified(|state| {
            previous = *state;
            if *state == next {
                return false;
            }
            *state = next;
            true
        });

        if changed {
            match &result {
                Err(e) => log::warn!("Backend {} -> {}: {}", previous, next, e),
                Ok(_) => log::info!("Backend {} -> {}", previous, next),
            }
        }
    }
}
