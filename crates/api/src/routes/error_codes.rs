//! Catalogue of the wire-level error codes, for frontends that switch on
//! `code`.

use axum::extract::State;
use axum::response::Response;
use axum::{routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::openapi::{EnvelopeDoc, ErrorEnvelopeDoc, PageDoc, PageParams};
use crate::response::Responder;
use crate::state::AppState;

/// One row of the error code catalogue.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorCodeEntry {
    pub category: String,
    pub code: i64,
    pub message: String,
}

/// GET /error-codes -- the active error mapping, paginated, ordered by code.
#[utoipa::path(
    get,
    path = "/api/v1/error-codes",
    tag = "meta",
    params(PageParams),
    responses(
        (status = 200, description = "One page of error codes", body = EnvelopeDoc<PageDoc<ErrorCodeEntry>>),
        (status = 400, description = "Invalid page parameters", body = ErrorEnvelopeDoc),
        (status = 404, description = "Page past the end of the catalogue", body = ErrorEnvelopeDoc),
    )
)]
pub async fn list_error_codes(State(state): State<AppState>, responder: Responder) -> Response {
    let entries = state.pipeline.error_mapping().entries();
    let total = i64::try_from(entries.len()).unwrap_or(i64::MAX);

    let window = responder.page().resolve(total);
    let items: Vec<ErrorCodeEntry> = entries
        .into_iter()
        .skip(usize::try_from(window.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(window.limit()).unwrap_or(usize::MAX))
        .map(|(category, entry)| ErrorCodeEntry {
            category: category.to_string(),
            code: entry.code,
            message: entry.message.clone(),
        })
        .collect();

    responder.paginated(&items, total)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/error-codes", get(list_error_codes))
}
