//! REST/HTTP prediction server
//!
//! Thin axum boundary around [`PredictionService`](crate::service::PredictionService).
//! Request bodies carry a `features` field with one record or a list of
//! records; the response carries the predicted label of the first record.
//!
//! # Example
//!
//! ```ignore
//! use cvd_risk::server::{PredictionServer, ServerConfig};
//! use std::sync::Arc;
//!
//! let server = PredictionServer::new(ServerConfig::default(), Arc::new(service));
//! server.run().await?;
//! ```

mod handlers;
mod request;
mod state;

pub use handlers::*;
pub use request::{parse_features, ApiError, MISSING_FEATURES};
pub use state::AppState;

use crate::service::PredictionService;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bind error on {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server address
    pub address: SocketAddr,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

impl ServerConfig {
    /// Create config with custom address
    pub fn with_address(mut self, addr: SocketAddr) -> Self {
        self.address = addr;
        self
    }

    fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if self.cors_origins.iter().any(|o| o == "*") {
            return layer.allow_origin(Any);
        }
        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Label of the first record
    pub prediction: i64,
    /// Labels of every record, present only for multi-record requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<i64>>,
}

impl PredictionResponse {
    /// Build the response for a non-empty list of labels
    pub fn from_labels(labels: Vec<i64>) -> Option<Self> {
        let prediction = *labels.first()?;
        let predictions = (labels.len() > 1).then_some(labels);
        Some(Self { prediction, predictions })
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server status
    pub status: String,
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Number of features the model expects
    pub input_width: usize,
}

/// Build the application router.
///
/// `/` and `/predict` run the same preprocess-then-predict pipeline.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/", post(predict))
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TraceLayer::new_for_http());

    if config.cors_enabled {
        app = app.layer(config.cors_layer());
    }

    app.with_state(state)
}

/// HTTP server owning the shared prediction service
pub struct PredictionServer {
    config: ServerConfig,
    state: AppState,
}

impl PredictionServer {
    /// Create a server for `service`
    pub fn new(config: ServerConfig, service: Arc<PredictionService>) -> Self {
        Self { config, state: AppState::new(service) }
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let address = self.config.address;
        let listener = tokio::net::TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;

        info!(%address, "prediction server listening");
        let app = router(self.state, &self.config);
        axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
        info!("prediction server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Property Tests
// =============================================================================
