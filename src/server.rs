//! HTTP surface.
//!
//! | route | |
//! |---|---|
//! | `GET /` | static page |
//! | `POST /optimize` | `{prompt, category?}` -> `{original, optimized, category}` |
//! | `GET /categories` | categories with example prompts |
//! | `GET /healthz` | liveness |
//!
//! Failures are answered with `{"error": <kind>, "message": <text>}`.

use std::future::Future;
use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::Serialize;
use tokio::net::TcpListener;
use crate::catalog::Category;
use crate::optimizer::{OptimizationRequest, OptimizationResult, OptimizeError, PromptOptimizer};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub const SERVICE_NAME: &str = "prompt-optimizer";

#[derive(Clone)]
pub struct AppState {
    pub optimizer: Arc<PromptOptimizer>,
}

impl AppState {
    pub fn new(optimizer: PromptOptimizer) -> Self {
        Self { optimizer: Arc::new(optimizer) }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub ok: bool,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub category: Category,
    pub examples: Vec<String>,
}

/// Error body returned for every non-2xx answer.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    fn status_and_body(status: StatusCode, error: &'static str, message: impl Into<String>) -> Response {
        (status, Json(ApiError { error, message: message.into() })).into_response()
    }
}

impl IntoResponse for OptimizeError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            OptimizeError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            OptimizeError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "upstream_timeout"),
            OptimizeError::Fill(_) | OptimizeError::Complete(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        ApiError::status_and_body(status, kind, self.to_string())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/optimize", post(optimize))
        .route("/categories", get(categories))
        .route("/healthz", get(health))
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve(listener: TcpListener, router: Router, shutdown: impl Future<Output = ()> + Send + 'static) -> std::io::Result<()> {
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Health> {
    Json(Health { ok: true, service: SERVICE_NAME })
}

pub async fn categories(State(state): State<AppState>) -> Json<Vec<CategoryInfo>> {
    let categories = state.optimizer
        .catalog()
        .entries()
        .map(|entry| CategoryInfo {
            category: entry.category,
            examples: entry.examples.clone(),
        })
        .collect();
    Json(categories)
}

pub async fn optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return ApiError::status_and_body(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text());
        }
    };
    match state.optimizer.optimize(request).await {
        Ok(result) => Json::<OptimizationResult>(result).into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod test_server {
    use std::sync::Arc;
    use axum::body::{to_bytes, Body};
    use axum::extract::FromRequest;
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use crate::catalog::TemplateCatalog;
    use crate::optimizer::test_support::MockGenerator;
    use crate::optimizer::GenerationSettings;
    use super::*;

    fn state_with(generator: MockGenerator) -> AppState {
        let catalog = Arc::new(TemplateCatalog::builtin().unwrap());
        AppState::new(PromptOptimizer::new(catalog, Arc::new(generator), GenerationSettings::default()))
    }

    async fn json_payload(body: &str) -> Result<Json<OptimizationRequest>, JsonRejection> {
        let request = Request::builder()
            .method("POST")
            .uri("/optimize")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        Json::<OptimizationRequest>::from_request(request, &()).await
    }

    async fn read_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_optimize_ok() {
        let state = state_with(MockGenerator::echo());
        let payload = json_payload(r#"{"prompt": "hello", "category": "unknown_category"}"#).await;
        let (status, body) = read_json(optimize(State(state), payload).await).await;

        assert_eq!(StatusCode::OK, status);
        assert_eq!("hello", body["original"]);
        assert_eq!("unknown_category", body["category"]);
        assert!(body["optimized"].as_str().unwrap().starts_with("optimized: Optimize this prompt for better AI responses:"));
    }

    #[tokio::test]
    async fn test_optimize_missing_prompt_is_client_error() {
        let generator = MockGenerator::echo();
        let state = state_with(generator.clone());
        let payload = json_payload(r#"{"category": "coding"}"#).await;
        let (status, body) = read_json(optimize(State(state), payload).await).await;

        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("invalid_request", body["error"]);
        assert!(generator.last_request().is_none());
    }

    #[tokio::test]
    async fn test_optimize_malformed_json_is_client_error() {
        let state = state_with(MockGenerator::echo());
        let payload = json_payload("{not json").await;
        let (status, body) = read_json(optimize(State(state), payload).await).await;

        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("invalid_request", body["error"]);
    }

    #[tokio::test]
    async fn test_optimize_upstream_failure() {
        let state = state_with(MockGenerator::failing("rate limited"));
        let payload = json_payload(r#"{"prompt": "hi"}"#).await;
        let (status, body) = read_json(optimize(State(state), payload).await).await;

        assert_eq!(StatusCode::BAD_GATEWAY, status);
        assert_eq!("upstream_error", body["error"]);
        assert!(body["message"].as_str().unwrap().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_gateway_timeout() {
        let response = OptimizeError::Timeout(std::time::Duration::from_secs(1)).into_response();
        let (status, body) = read_json(response).await;
        assert_eq!(StatusCode::GATEWAY_TIMEOUT, status);
        assert_eq!("upstream_timeout", body["error"]);
    }

    #[tokio::test]
    async fn test_categories_and_health() {
        let state = state_with(MockGenerator::echo());
        let Json(categories) = categories(State(state)).await;
        let value = serde_json::to_value(&categories).unwrap();
        assert_eq!(json!(["general", "coding", "creative", "business"]),
                   Value::Array(value.as_array().unwrap().iter().map(|c| c["category"].clone()).collect()));
        assert_eq!(json!(["Write a blog post about AI", "Explain quantum computing"]), value[0]["examples"]);

        let Json(health) = health().await;
        assert!(health.ok);
        assert_eq!(SERVICE_NAME, health.service);
    }

    #[tokio::test]
    async fn test_index_page() {
        let Html(page) = index().await;
        assert!(page.contains("/optimize"));
    }
}
