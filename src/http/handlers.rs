//! Route handlers.
//!
//! Each handler runs the request through sample unwrapping (create only) and
//! validation before calling the task service; failures become [`ApiError`]
//! responses.

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use super::dto::{ApiIndex, DataEnvelope, HealthResponse, PageEnvelope, TaskResponse};
use super::error::ApiError;
use super::guard::JsonBody;
use super::sanitize::unwrap_sample_payload;
use super::state::AppState;
use super::validation::{validate_create, validate_list, validate_task_id, validate_update};

/// `POST /tasks`
///
/// # Errors
///
/// Returns [`ApiError`] when validation or persistence fails.
pub async fn create_task(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<DataEnvelope<TaskResponse>>), ApiError> {
    let request = validate_create(&unwrap_sample_payload(body))?;
    let task = state.tasks().create(request).await?;
    info!(task_id = %task.id(), "task created");
    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::new(TaskResponse::from(&task))),
    ))
}

/// `GET /tasks?page=&limit=`
///
/// # Errors
///
/// Returns [`ApiError`] when the query is invalid or the lookup fails.
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<PageEnvelope>, ApiError> {
    let Query(params) = query?;
    let request = validate_list(&params)?;
    let page = state.tasks().list(request).await?;
    Ok(Json(PageEnvelope::from(page)))
}

/// `GET /tasks/{id}`
///
/// # Errors
///
/// Returns [`ApiError`] when the identifier is invalid or unknown.
pub async fn get_task(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DataEnvelope<TaskResponse>>, ApiError> {
    let Path(raw_id) = id?;
    let id = validate_task_id(&raw_id)?;
    let task = state.tasks().get(id).await?;
    Ok(Json(DataEnvelope::new(TaskResponse::from(&task))))
}

/// `PATCH /tasks/{id}`
///
/// # Errors
///
/// Returns [`ApiError`] when validation fails, the task is unknown, or
/// persistence fails.
pub async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    JsonBody(body): JsonBody,
) -> Result<Json<DataEnvelope<TaskResponse>>, ApiError> {
    let Path(raw_id) = id?;
    let request = validate_update(&raw_id, &body)?;
    let task = state.tasks().update(request).await?;
    info!(task_id = %task.id(), "task updated");
    Ok(Json(DataEnvelope::new(TaskResponse::from(&task))))
}

/// `DELETE /tasks/{id}`
///
/// # Errors
///
/// Returns [`ApiError`] when the identifier is invalid or unknown.
pub async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(raw_id) = id?;
    let id = validate_task_id(&raw_id)?;
    state.tasks().delete(id).await?;
    info!(task_id = %id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    match state.tasks().check_store().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy(state.now()))).into_response(),
        Err(err) => {
            warn!(error = %err, "store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unavailable(
                    state.now(),
                    "Database connection failed",
                )),
            )
                .into_response()
        }
    }
}

/// `GET /`
pub async fn index() -> Json<ApiIndex> {
    Json(ApiIndex::default())
}

/// Fallback for unknown paths.
pub async fn route_not_found() -> ApiError {
    ApiError::other(StatusCode::NOT_FOUND, "Route not found")
}

/// Fallback for known paths called with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::other(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
