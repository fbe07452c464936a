//! HTTP routes: batched and streaming provisioning, plus health.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use runway_core::api::{DeliveryMode, ProvisionRequest, ProvisionResponse, ResponseStatus};
use runway_core::application::services::{NoopReporter, http_status, render_batch, run_session};
use runway_core::domain::{ProvisionError, credential};
use runway_core::infra::stream::{SessionStream, stream_session};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

// ===================================================================
// Router
// ===================================================================

/// Compose the router:
///   - `POST /api`        → provisioning, mode from body or default
///   - `POST /api/stream` → provisioning, always streamed
///   - `GET  /health`     → health-check probe
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", post(provision))
        .route("/api/stream", post(provision_stream))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Minimal health-check handler for load-balancer probes.
async fn health() -> StatusCode {
    StatusCode::OK
}

// ===================================================================
// Errors
// ===================================================================

/// Request refused before a session starts.
#[derive(Debug)]
pub enum ApiError {
    /// Body is not a JSON provisioning request.
    InvalidBody(String),
    /// Credential gate rejected the request.
    Rejected(ProvisionError),
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_REQUEST)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::InvalidBody(detail) => {
                let message = format!("invalid request body: {detail}");
                ProvisionResponse {
                    status: ResponseStatus::Error,
                    repo: String::new(),
                    url: None,
                    error: Some(message.clone()),
                    logs: vec![message],
                }
            }
            Self::Rejected(err) => ProvisionResponse::rejected(err),
        };
        (status, Json(body)).into_response()
    }
}

// ===================================================================
// Handlers
// ===================================================================

async fn provision(
    State(state): State<AppState>,
    payload: Result<Json<ProvisionRequest>, JsonRejection>,
) -> Response {
    match admit(payload) {
        Ok(request) => {
            let mode = request.mode.unwrap_or(state.default_mode);
            dispatch(state, request, mode).await
        }
        Err(err) => err.into_response(),
    }
}

async fn provision_stream(
    State(state): State<AppState>,
    payload: Result<Json<ProvisionRequest>, JsonRejection>,
) -> Response {
    match admit(payload) {
        Ok(request) => dispatch(state, request, DeliveryMode::Stream).await,
        Err(err) => err.into_response(),
    }
}

/// Parse the body and apply the credential gate, so a rejected request is
/// answered with 400 in both delivery modes before any stream opens.
fn admit(
    payload: Result<Json<ProvisionRequest>, JsonRejection>,
) -> Result<ProvisionRequest, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    credential::validate(&request).map_err(|err| {
        tracing::warn!(code = err.code(), "request rejected");
        ApiError::Rejected(err)
    })?;
    Ok(request)
}

async fn dispatch(state: AppState, request: ProvisionRequest, mode: DeliveryMode) -> Response {
    match mode {
        DeliveryMode::Batch => batch(&state, &request).await,
        DeliveryMode::Stream => stream(&state, request),
    }
}

async fn batch(state: &AppState, request: &ProvisionRequest) -> Response {
    let session = run_session(
        state.connector.as_ref(),
        request,
        &state.settings,
        &NoopReporter,
    )
    .await;
    let status =
        StatusCode::from_u16(http_status(&session)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(render_batch(&session))).into_response()
}

/// One SSE frame per event, closed once the session is terminal.
///
/// The session runs on its own task, so a client disconnect only stops
/// delivery.
fn stream(state: &AppState, request: ProvisionRequest) -> Response {
    let SessionStream {
        mut events,
        session,
    } = stream_session(
        Arc::clone(&state.connector),
        request,
        Arc::clone(&state.settings),
    );

    let frames = async_stream::stream! {
        let mut seq: u64 = 0;
        while let Some(event) = events.recv().await {
            seq += 1;
            let frame = Event::default()
                .id(seq.to_string())
                .data(frame_data(&event.message));
            yield Ok::<_, Infallible>(frame);
        }
        match session.await {
            Ok(session) => tracing::debug!(state = ?session.state(), frames = seq, "stream closed"),
            Err(err) => tracing::error!(error = %err, "session task failed"),
        }
    };

    Sse::new(frames)
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Fold `\r\n` and lone `\r` into `\n` so every line break becomes its own
/// `data:` line. Messages may carry platform-controlled text.
fn frame_data(message: &str) -> String {
    message.replace("\r\n", "\n").replace('\r', "\n")
}
