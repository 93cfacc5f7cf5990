//! HTTP handlers for the task and rewards APIs.
//!
//! Responsibilities:
//! - Task CRUD, with the completion state machine running inside PUT
//! - Rewards view (ledger plus pool)
//! - Bearer-token identity extraction and error-to-status mapping

use std::sync::MutexGuard;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde_json::json;

use questlog_core::error::CoreError;
use questlog_core::task::{TaskDraft, TaskPatch};
use questlog_core::{Database, QuestService, RewardsView, Task};

use crate::SharedService;

/// Errors a handler can surface, mapped onto HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed Authorization header.
    Unauthorized,
    /// Malformed request input (bad date, bad JSON field).
    BadRequest(String),
    /// Server-side failure outside the core taxonomy.
    Internal(&'static str),
    /// Core error carrying its own taxonomy.
    Core(CoreError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "missing bearer credential".to_string(),
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => {
                tracing::error!(message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            ApiError::Core(err) => {
                let status = match &err {
                    CoreError::TaskNotFound { .. } => StatusCode::NOT_FOUND,
                    CoreError::InvalidState(_) | CoreError::TimerBusy { .. } => {
                        StatusCode::CONFLICT
                    }
                    CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(error = %err, "request failed");
                }
                (status, err.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// The caller's opaque user id from `Authorization: Bearer <credential>`.
///
/// Credential issuance and validation live in the external identity
/// provider; here the token is only a correlator for store accesses.
fn bearer_user(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    let token = value.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;
    if token.trim().is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(token.trim().to_string())
}

fn lock(service: &SharedService) -> Result<MutexGuard<'_, QuestService<Database>>, ApiError> {
    service
        .lock()
        .map_err(|_| ApiError::Internal("service state poisoned"))
}

// -----------------------------
// GET /api/tasks
// -----------------------------
pub async fn list_tasks(
    State(service): State<SharedService>,
    headers: HeaderMap,
) -> Result<Json<Vec<Task>>, ApiError> {
    let user = bearer_user(&headers)?;
    let svc = lock(&service)?;
    Ok(Json(svc.list_tasks(&user)?))
}

// -----------------------------
// GET /api/tasks/:date
// -----------------------------
pub async fn list_tasks_by_date(
    State(service): State<SharedService>,
    Path(date): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<Task>>, ApiError> {
    let user = bearer_user(&headers)?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date '{date}'")))?;
    let svc = lock(&service)?;
    Ok(Json(svc.list_tasks_by_date(&user, date)?))
}

// -----------------------------
// POST /api/tasks
// -----------------------------
pub async fn create_task(
    State(service): State<SharedService>,
    headers: HeaderMap,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let user = bearer_user(&headers)?;
    let mut svc = lock(&service)?;
    let task = svc.create_task(&user, draft)?;
    Ok((StatusCode::CREATED, Json(task)))
}

// -----------------------------
// PUT /api/tasks/:id
// -----------------------------
pub async fn update_task(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let user = bearer_user(&headers)?;
    let mut svc = lock(&service)?;
    Ok(Json(svc.update_task(&user, &id, &patch)?))
}

// -----------------------------
// DELETE /api/tasks/:id
// -----------------------------
pub async fn delete_task(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = bearer_user(&headers)?;
    let mut svc = lock(&service)?;
    svc.delete_task(&user, &id)?;
    Ok(Json(json!({ "success": true })))
}

// -----------------------------
// GET /api/rewards
// -----------------------------
pub async fn rewards(
    State(service): State<SharedService>,
    headers: HeaderMap,
) -> Result<Json<RewardsView>, ApiError> {
    let user = bearer_user(&headers)?;
    let svc = lock(&service)?;
    Ok(Json(svc.rewards(&user)?))
}
