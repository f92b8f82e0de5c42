//! REST API handlers
//!
//! Classroom polling endpoints used by the browser front-end

use axum::{
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};

use crate::error::{PollServerError, ValidationError};
use crate::session_manager::SessionManager;
use crate::traits::DeviceAdapter;
use shared::{
    ConfigureRosterRequest, ErrorReply, ResultsReply, SessionStatusReply, Source, StartPollRequest, StatusReply,
    source_info, source_warn,
};

impl IntoResponse for PollServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            source_warn!(Source::Http, "⚠️ Request failed ({}): {}", status, self);
        }

        let body = ErrorReply {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn malformed(rejection: JsonRejection) -> ValidationError {
    ValidationError::MalformedRequest {
        details: rejection.body_text(),
    }
}

/// `POST /class/setup`
pub async fn setup_class<D>(
    State(manager): State<SessionManager<D>>,
    payload: Result<Json<ConfigureRosterRequest>, JsonRejection>,
) -> Result<Json<StatusReply>, PollServerError>
where
    D: DeviceAdapter + 'static,
{
    let Json(request) = payload.map_err(malformed)?;
    let status = manager.configure_roster(&request).await?;
    Ok(Json(StatusReply { status }))
}

/// `POST /poll/start`
///
/// A body that fails to decode is not rejected up front: a start while a
/// poll runs, or before a roster exists, answers the same with or without one.
pub async fn start_poll<D>(
    State(manager): State<SessionManager<D>>,
    payload: Result<Json<StartPollRequest>, JsonRejection>,
) -> Result<Json<StatusReply>, PollServerError>
where
    D: DeviceAdapter + 'static,
{
    let request = payload.map(|Json(request)| request).map_err(malformed);
    let status = manager.try_start_poll(request.as_ref().map_err(Clone::clone)).await?;
    Ok(Json(StatusReply { status }))
}

/// `POST /poll/stop`
pub async fn stop_poll<D>(State(manager): State<SessionManager<D>>) -> Result<Json<StatusReply>, PollServerError>
where
    D: DeviceAdapter + 'static,
{
    let status = manager.stop_poll().await?;
    Ok(Json(StatusReply { status }))
}

/// `GET /poll/results`
pub async fn get_results<D>(State(manager): State<SessionManager<D>>) -> Json<ResultsReply>
where
    D: DeviceAdapter + 'static,
{
    let results = manager.read_results().await;
    Json(ResultsReply { results })
}

/// `GET /status`
pub async fn get_status<D>(State(manager): State<SessionManager<D>>) -> Json<SessionStatusReply>
where
    D: DeviceAdapter + 'static,
{
    Json(manager.status().await)
}

/// `GET /health`
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    source_info!(Source::Http, "Request for unknown route");
    let body = ErrorReply {
        error: "Not found".to_string(),
        kind: "not_found".to_string(),
    };
    (axum::http::StatusCode::NOT_FOUND, Json(body)).into_response()
}
