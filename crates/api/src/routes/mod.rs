pub mod error_codes;
pub mod health;
pub mod openapi;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use mito_core::Failure;

use crate::response::render;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /error-codes                                     list (paginated)
/// /openapi.json                                    OpenAPI document (not enveloped)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(error_codes::router())
        .merge(openapi::router())
}

/// Fallback for unmatched routes: 404 with the `not_found` envelope.
pub async fn not_found(State(state): State<AppState>) -> Response {
    render(&state.pipeline, StatusCode::NOT_FOUND, Failure::not_found().into())
}
