use crate::coordinator::{StructuredResponse, TriageCoordinator};
use crate::error::TriageError;
use crate::feedback::{FeedbackRecord, FeedbackStoreError, FeedbackStoreRef};
use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use symptom_core::Message;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    coordinator: Arc<TriageCoordinator>,
    feedback: FeedbackStoreRef,
    expose_trace: bool,
}

impl AppState {
    pub fn new(coordinator: TriageCoordinator, feedback: FeedbackStoreRef, expose_trace: bool) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            feedback,
            expose_trace,
        }
    }
}

/// Request model for `/check`
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub messages: Vec<Message>,
}

/// Error body returned by `/check` in place of a response
#[derive(Debug, Serialize)]
pub struct CheckError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

/// Outcome of `/check`. Both variants are sent with status 200.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CheckOutcome {
    Success(StructuredResponse),
    Failure(CheckError),
}

impl CheckOutcome {
    pub fn from_result(result: Result<StructuredResponse, TriageError>, expose_trace: bool) -> Self {
        match result {
            Ok(response) => CheckOutcome::Success(response),
            Err(e) => {
                let error = e.to_string();
                let trace = expose_trace.then(|| format!("{:?}", anyhow::Error::new(e)));
                CheckOutcome::Failure(CheckError { error, trace })
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackAck {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FeedbackList {
    pub feedback: Vec<FeedbackRecord>,
}

/// Error type for HTTP server
#[derive(Debug)]
pub enum ApiError {
    Storage(FeedbackStoreError),
}

impl From<FeedbackStoreError> for ApiError {
    fn from(e: FeedbackStoreError) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Storage(e) => {
                error!(error = %e, "Feedback store failure");
                let body = Json(CheckError {
                    error: format!("Internal server error: {}", e),
                    trace: None,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// CORS policy allowing any method and header from a single origin
pub fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = allowed_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin: {}", allowed_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Build the router
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/check", post(check))
        .route("/feedback", post(submit_feedback).get(list_feedback))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(state: AppState, allowed_origin: &str, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(state, cors_layer(allowed_origin)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;
    info!("Starting HTTP server on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "Symptom relay is running"
}

/// Handler for symptom checks
async fn check(State(state): State<AppState>, Json(payload): Json<CheckRequest>) -> Json<CheckOutcome> {
    let result = state.coordinator.process_conversation(&payload.messages).await;
    if let Err(e) = &result {
        error!(error = %e, "Failed to process check");
    }
    Json(CheckOutcome::from_result(result, state.expose_trace))
}

async fn submit_feedback(
    State(state): State<AppState>,
    Json(record): Json<FeedbackRecord>,
) -> Result<Json<FeedbackAck>, ApiError> {
    state.feedback.append(record).await?;
    match state.feedback.len().await {
        Ok(total) => info!(total, "Feedback received"),
        Err(e) => warn!(error = %e, "Feedback stored but count unavailable"),
    }
    Ok(Json(FeedbackAck {
        message: "Feedback received!",
    }))
}

async fn list_feedback(State(state): State<AppState>) -> Result<Json<FeedbackList>, ApiError> {
    let feedback = state.feedback.list_all().await?;
    Ok(Json(FeedbackList { feedback }))
}
