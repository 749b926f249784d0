//! Shared world state for task API BDD scenarios.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use rstest::fixture;
use serde_json::Value;
use taskhub::http::{AppState, router};
use tower::ServiceExt;

/// Status and parsed body of the most recent response.
pub struct LastResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Scenario world for task API behaviour tests.
pub struct TaskApiWorld {
    pub app: Router,
    pub task_id: Option<String>,
    pub last_response: Option<LastResponse>,
}

impl TaskApiWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            app: router(AppState::in_memory()),
            task_id: None,
            last_response: None,
        }
    }

    /// Sends a request and records the response.
    pub fn dispatch(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
    ) -> Result<&LastResponse, eyre::Report> {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                builder.body(Body::from(json.to_string()))?
            }
            None => builder.body(Body::empty())?,
        };

        let app = self.app.clone();
        let (status, bytes) = run_async(async move {
            let response = app.oneshot(request).await?;
            let status = response.status();
            let bytes = response.into_body().collect().await?.to_bytes();
            Ok::<_, eyre::Report>((status, bytes))
        })?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(self.last_response.insert(LastResponse { status, body }))
    }

    /// Creates a task and remembers its identifier.
    pub fn create(&mut self, body: &Value) -> Result<(), eyre::Report> {
        let response = self.dispatch(Method::POST, "/tasks", Some(body))?;
        let id = response.body["data"]["id"].as_str().map(ToOwned::to_owned);
        if id.is_some() {
            self.task_id = id;
        }
        Ok(())
    }

    /// URI of the remembered task.
    pub fn task_uri(&self) -> Result<String, eyre::Report> {
        self.task_id
            .as_ref()
            .map(|id| format!("/tasks/{id}"))
            .ok_or_else(|| eyre::eyre!("no task has been created in this scenario"))
    }

    /// Most recent response.
    pub fn response(&self) -> Result<&LastResponse, eyre::Report> {
        self.last_response
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no request has been sent in this scenario"))
    }
}

impl Default for TaskApiWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskApiWorld {
    TaskApiWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
