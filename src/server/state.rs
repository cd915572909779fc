//! Shared server state

use crate::service::PredictionService;
use std::sync::Arc;
use std::time::Instant;

/// State handed to every handler; cloning shares the same service.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Fitted preprocessor and model
    pub service: Arc<PredictionService>,
    started: Instant,
}

impl AppState {
    /// Wrap a prediction service
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self { service, started: Instant::now() }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
