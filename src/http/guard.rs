//! JSON request guards.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use super::error::ApiError;

/// Rejects body-bearing requests that do not declare a JSON content type.
///
/// `GET`, `DELETE`, and other methods without a body pass through.
pub async fn require_json(request: Request, next: Next) -> Response {
    let carries_body = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::PATCH
    );
    if carries_body && !declares_json(&request) {
        return ApiError::UnsupportedMediaType.into_response();
    }
    next.run(request).await
}

fn declares_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Request body parsed as arbitrary JSON.
///
/// Empty bodies, malformed JSON, and a literal `null` are rejected with
/// [`ApiError::InvalidBody`]; field-level checks happen later.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|_| ApiError::InvalidBody)?;
        parse_body(&bytes).map(Self)
    }
}

fn parse_body(bytes: &[u8]) -> Result<Value, ApiError> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Null) | Err(_) => Err(ApiError::InvalidBody),
        Ok(value) => Ok(value),
    }
}
