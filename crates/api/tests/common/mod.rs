#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use mito_api::config::ServerConfig;
use mito_api::router::build_app_router_with;
use mito_api::routes;
use mito_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the built-in pagination settings.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        ..ServerConfig::default()
    }
}

/// Build the full application router with all middleware layers.
///
/// This goes through the same builder as `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config(), Router::new())
}

/// Like [`build_test_app`], with `config` and extra routes merged into
/// `/api/v1`.
pub fn build_test_app_with(config: ServerConfig, extra: Router<AppState>) -> Router {
    let pipeline = config.build_pipeline().unwrap();
    let state = AppState::new(config, pipeline);
    build_app_router_with(state, routes::api_routes().merge(extra))
}

/// Send a GET request to `uri`.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request to `uri` with a `Host` header, so pagination links are
/// absolute.
pub async fn get_with_host(app: Router, uri: &str, host: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("host", host)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
