use axum::response::Response;
use axum::{routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::openapi::EnvelopeDoc;
use crate::response::Responder;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status.
    #[schema(value_type = String, example = "ok")]
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    #[schema(value_type = String)]
    pub version: &'static str,
}

/// GET /health -- returns service status, enveloped like every other route.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up", body = EnvelopeDoc<HealthResponse>),
    )
)]
pub async fn health_check(responder: Responder) -> Response {
    responder.ok(&HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
