//! Content-type guard, body parsing, and service routes.

use super::helpers::{app, empty_request, raw_request, send};
use axum::Router;
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

const INVALID_BODY: &str =
    "Invalid JSON body. Use Content-Type: application/json and a valid JSON payload.";

#[rstest]
#[case(None)]
#[case(Some("text/plain"))]
#[case(Some("application/x-www-form-urlencoded"))]
#[tokio::test(flavor = "multi_thread")]
async fn non_json_bodies_are_unsupported(
    app: Router,
    #[case] content_type: Option<&str>,
) -> eyre::Result<()> {
    let response = send(
        &app,
        raw_request(Method::POST, "/tasks", content_type, r#"{"title":"x"}"#)?,
    )
    .await?;

    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        response.body,
        json!({
            "success": false,
            "message": "Send JSON with header: Content-Type: application/json"
        })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn patch_requires_json_content_type(app: Router) -> eyre::Result<()> {
    let uri = format!("/tasks/{}", Uuid::new_v4());
    let response = send(&app, raw_request(Method::PATCH, &uri, None, "{}")?).await?;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn charset_parameter_is_accepted(app: Router) -> eyre::Result<()> {
    let response = send(
        &app,
        raw_request(
            Method::POST,
            "/tasks",
            Some("application/json; charset=utf-8"),
            r#"{"title":"x"}"#,
        )?,
    )
    .await?;
    assert_eq!(response.status, StatusCode::CREATED);
    Ok(())
}

#[rstest]
#[case("")]
#[case("{")]
#[case("null")]
#[case("{\"title\": }")]
#[tokio::test(flavor = "multi_thread")]
async fn unreadable_bodies_are_rejected(app: Router, #[case] body: &'static str) -> eyre::Result<()> {
    let response = send(
        &app,
        raw_request(Method::POST, "/tasks", Some("application/json"), body)?,
    )
    .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"success": false, "message": INVALID_BODY})
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_connected_store(app: Router) -> eyre::Result<()> {
    let response = send(&app, empty_request(Method::GET, "/health")?).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "OK");
    assert_eq!(response.body["database"], "connected");
    assert!(response.body["timestamp"].is_string());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn index_lists_endpoints(app: Router) -> eyre::Result<()> {
    let response = send(&app, empty_request(Method::GET, "/")?).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Task Management System API");
    assert_eq!(response.body["endpoints"]["createTask"], "POST /tasks");
    Ok(())
}

#[rstest]
#[case(Method::GET, "/nope")]
#[case(Method::GET, "/tasks/a/b")]
#[case(Method::POST, "/api/tasks")]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_routes_are_not_found(
    app: Router,
    #[case] method: Method,
    #[case] uri: &str,
) -> eyre::Result<()> {
    let response = send(&app, empty_request(method, uri)?).await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({"success": false, "message": "Route not found"})
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unsupported_method_is_rejected(app: Router) -> eyre::Result<()> {
    let response = send(&app, empty_request(Method::PUT, "/health")?).await?;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.body["message"], "Method not allowed");
    Ok(())
}
