//! Shared helpers for router tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use eyre::{WrapErr, eyre};
use http_body_util::BodyExt;
use rstest::fixture;
use serde_json::Value;
use taskhub::http::{AppState, router};
use tower::ServiceExt;

/// Provides a router over a fresh in-memory store.
#[fixture]
pub fn app() -> Router {
    router(AppState::in_memory())
}

/// Response status plus parsed JSON body (`Value::Null` when empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Sends a request through a clone of `app`.
pub async fn send(app: &Router, request: Request<Body>) -> eyre::Result<TestResponse> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .wrap_err("collect response body")?
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).wrap_err("parse response body as JSON")?
    };
    Ok(TestResponse { status, body })
}

/// Builds a request with a JSON body and content type.
pub fn json_request(method: Method, uri: &str, body: &Value) -> eyre::Result<Request<Body>> {
    raw_request(method, uri, Some("application/json"), body.to_string())
}

/// Builds a request with an arbitrary content type and body.
pub fn raw_request(
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> eyre::Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    Ok(builder.body(body.into())?)
}

/// Builds a body-less request.
pub fn empty_request(method: Method, uri: &str) -> eyre::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())?)
}

/// Creates a task and returns its `data` object.
pub async fn create_task(app: &Router, body: &Value) -> eyre::Result<Value> {
    let response = send(app, json_request(Method::POST, "/tasks", body)?).await?;
    if response.status != StatusCode::CREATED {
        return Err(eyre!(
            "expected 201 when creating task, got {}: {}",
            response.status,
            response.body
        ));
    }
    Ok(response.body["data"].clone())
}

/// Returns the `id` string of a task object.
pub fn task_id(task: &Value) -> eyre::Result<String> {
    task["id"]
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| eyre!("task has no string id: {task}"))
}

/// Returns the `field` names reported in a validation envelope.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error["field"].as_str().map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
