//! Serves the OpenAPI document as plain JSON, outside the envelope.

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::openapi::api_doc;
use crate::state::AppState;

/// GET /openapi.json
async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(api_doc(state.pipeline.pagination()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}
