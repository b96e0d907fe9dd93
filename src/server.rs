//! HTTP API.
//!
//! `POST /api/summarize` runs the pipeline for one URL; `GET /health` reports
//! liveness. Errors are returned as `{ "error": message }`.

use crate::auth::bearer_token;
use crate::pipeline::{Pipeline, PipelineError};
use crate::summary::SummaryResult;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const INTERNAL_ERROR: &str = "Internal server error. Please try again later.";

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

/// Build the router around a pipeline
pub fn create_app(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/summarize", post(summarize_handler))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pipeline })
}

/// Bind and serve until ctrl-c
pub async fn serve(pipeline: Pipeline, bind: &str) -> std::io::Result<()> {
    let app = create_app(Arc::new(pipeline));
    let listener = tokio::net::TcpListener::bind(bind).await?;

    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn summarize_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SummaryResult>, ApiErrorResponse> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    state
        .pipeline
        .handle(token, &body)
        .await
        .map(Json)
        .map_err(ApiErrorResponse)
}

// Error response wrapper
struct ApiErrorResponse(PipelineError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if let PipelineError::Internal(detail) = &self.0 {
            error!(detail = %detail, "summarize request failed");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!(detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR })),
    )
        .into_response()
}
