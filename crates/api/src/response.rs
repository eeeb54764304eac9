//! Handler-side entry point to the response pipeline.
//!
//! Handlers take a [`Responder`] and hand it their outcome; the responder
//! runs the pipeline and produces the HTTP response. There is no
//! response-rewriting middleware: a handler that does not go through a
//! responder is not enveloped.
//!
//! ```ignore
//! async fn list_tags(responder: Responder) -> Response {
//!     let total = count_tags();
//!     let window = responder.page().resolve(total);
//!     let tags = load_tags(window.offset(), window.limit());
//!     responder.paginated(&tags, total)
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequestParts, OriginalUri, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mito_core::{Envelope, EnvelopeError, Outcome, PaginationInput, Payload, Pipeline};
use serde::Serialize;

use crate::error::{status_for_category, AppError, AppResult};
use crate::query::PageRequest;
use crate::state::AppState;

/// Run `outcome` through `pipeline` and send it with `status`.
pub fn render(pipeline: &Pipeline, status: StatusCode, outcome: Outcome) -> Response {
    let rendered = pipeline.render(status.as_u16(), outcome);
    (status, Json(rendered.body)).into_response()
}

/// Render an [`AppError`] with its own status.
pub fn render_error(pipeline: &Pipeline, err: AppError) -> Response {
    let (status, failure) = err.into_failure();
    render(pipeline, status, failure.into())
}

/// Per-request handle on the response pipeline.
///
/// Extracting it parses the page parameters (a malformed `page` is answered
/// with the validation envelope before the handler runs) and captures the
/// request URL used for pagination links.
#[derive(Clone)]
pub struct Responder {
    pipeline: Arc<Pipeline>,
    base_url: String,
    page: PageRequest,
}

impl FromRequestParts<AppState> for Responder {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|rejection| {
                render_error(&state.pipeline, AppError::BadRequest(rejection.body_text()))
            })?;

        let page = PageRequest::from_params(&params, state.pipeline.pagination())
            .map_err(|err| render_error(&state.pipeline, err.into()))?;

        let base_url = request_url(parts, state.config.public_base_url.as_deref());

        Ok(Self {
            pipeline: Arc::clone(&state.pipeline),
            base_url,
            page,
        })
    }
}

impl Responder {
    pub fn new(pipeline: Arc<Pipeline>, base_url: impl Into<String>, page: PageRequest) -> Self {
        Self {
            pipeline,
            base_url: base_url.into(),
            page,
        }
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run any outcome through the pipeline with an explicit status.
    pub fn outcome(&self, status: StatusCode, outcome: Outcome) -> Response {
        render(&self.pipeline, status, outcome)
    }

    /// 200 with `value` as `data`.
    pub fn ok<T: Serialize>(&self, value: &T) -> Response {
        self.outcome(StatusCode::OK, Outcome::from_serialize(value))
    }

    /// 201 with `value` as `data`.
    pub fn created<T: Serialize>(&self, value: &T) -> Response {
        self.outcome(StatusCode::CREATED, Outcome::from_serialize(value))
    }

    /// 200 with `value` as `data` and a non-empty success message.
    pub fn ok_with_message<T: Serialize>(&self, value: &T, message: &str) -> Response {
        let outcome = match Payload::plain(value) {
            Ok(Payload::Plain(data)) if self.pipeline.envelope_enabled() => {
                let envelope = Envelope::success_with_message(data, message);
                Outcome::from_serialize(&envelope)
            }
            result => Outcome::from(result),
        };
        self.outcome(StatusCode::OK, outcome)
    }

    /// One page of a collection, using the request's page parameters and
    /// URL.
    ///
    /// 200 with the pagination block, or the status of the failure category
    /// when the page cannot be resolved: 400 for bad numbers, 404 for a page
    /// past the end.
    pub fn paginated<T: Serialize>(&self, items: &[T], total: i64) -> Response {
        let window = self.page.resolve(total);
        let resolved = PaginationInput::from_items(
            items,
            total,
            window.page,
            window.page_size,
            self.base_url.clone(),
        )
        .map_err(EnvelopeError::into_failure)
        .and_then(|input| self.pipeline.resolve(Outcome::paginated(input)));

        match resolved {
            Ok(block) => self.outcome(StatusCode::OK, Outcome::plain(block)),
            Err(failure) => self.outcome(status_for_category(&failure.category), failure.into()),
        }
    }

    pub fn error(&self, err: AppError) -> Response {
        render_error(&self.pipeline, err)
    }

    /// `ok` or `error`, depending on `result`.
    pub fn respond<T: Serialize>(&self, result: AppResult<T>) -> Response {
        match result {
            Ok(value) => self.ok(&value),
            Err(err) => self.error(err),
        }
    }

    /// `paginated` or `error`, for data sources returning `(items, total)`.
    pub fn respond_page<T: Serialize>(&self, result: AppResult<(Vec<T>, i64)>) -> Response {
        match result {
            Ok((items, total)) => self.paginated(&items, total),
            Err(err) => self.error(err),
        }
    }
}

/// The URL pagination links are derived from.
///
/// Uses the pre-nesting URI so links keep their full path. The origin is
/// `public_base_url` when configured, else the URI's own authority
/// (absolute-form and HTTP/2 requests), else the `Host` header (with
/// `X-Forwarded-Proto` or `http`), else none and links stay path-only.
fn request_url(parts: &Parts, public_base_url: Option<&str>) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0);
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);

    if let Some(base) = public_base_url {
        return format!("{base}{path_and_query}");
    }
    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{scheme}://{authority}{path_and_query}");
    }

    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    match header("host") {
        Some(host) => {
            let scheme = header("x-forwarded-proto").unwrap_or("http");
            format!("{scheme}://{host}{path_and_query}")
        }
        None => path_and_query,
    }
}
