//! `SpeakwellServer`: Axum router and listener.

use std::net::SocketAddr;
use std::time::Instant;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::errors::ApiError;
use crate::health::{self, HealthResponse};
use crate::metrics;
use crate::pipeline::{TranscribePipeline, Upload};
use crate::response::TranscriptionResponse;
use crate::shutdown::ShutdownCoordinator;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload processing.
    pub pipeline: TranscribePipeline,
    /// Prometheus handle; `/metrics` is empty without one.
    pub metrics: Option<PrometheusHandle>,
    /// When the server started.
    pub start_time: Instant,
}

/// The speech feedback server.
pub struct SpeakwellServer {
    state: AppState,
    shutdown: ShutdownCoordinator,
}

impl SpeakwellServer {
    /// Create a server around `pipeline`.
    pub fn new(pipeline: TranscribePipeline, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            state: AppState {
                pipeline,
                metrics,
                start_time: Instant::now(),
            },
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let body_limit = self.state.pipeline.config().max_upload_bytes;

        Router::new()
            .route("/transcribe", post(transcribe_handler))
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Serve on `listener` until the shutdown coordinator fires.
    ///
    /// In-flight requests are allowed to finish.
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        info!(%addr, "listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(self.shutdown.token().cancelled_owned())
            .await?;

        info!("server stopped");
        Ok(())
    }
}

/// POST /transcribe
#[instrument(skip_all)]
async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let upload = Upload::from_multipart(&mut multipart).await?;
    state.pipeline.process(upload).await.map(Json)
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(state.start_time))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.as_ref().map(metrics::render).unwrap_or_default();
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
