//! OpenAPI document for the enveloped API.
//!
//! Handlers return `Response`, so their bodies are described with the
//! schema-only types below: [`EnvelopeDoc`] around a payload,
//! [`PageDoc`] for a pagination block, [`ErrorEnvelopeDoc`] for failures and
//! [`PageParams`] for the page query parameters.
//!
//! ```ignore
//! #[utoipa::path(
//!     get,
//!     path = "/api/v1/tags",
//!     params(PageParams),
//!     responses((status = 200, body = EnvelopeDoc<PageDoc<Tag>>)),
//! )]
//! ```

use mito_core::PaginationConfig;
use serde::Serialize;
use utoipa::openapi::path::Operation;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::routes;

/// Success envelope around `T`.
#[derive(Serialize, ToSchema)]
pub struct EnvelopeDoc<T> {
    pub data: T,
    /// Always `0` on success.
    pub code: i64,
    /// Empty unless the handler supplies a message.
    pub message: String,
}

/// Failure envelope.
#[derive(Serialize, ToSchema)]
pub struct ErrorEnvelopeDoc {
    /// Always `null` on failure.
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    /// Non-zero code from the error mapping, see `/api/v1/error-codes`.
    pub code: i64,
    /// Human-readable message from the error mapping.
    pub message: String,
}

/// One page of a collection of `T`.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageDoc<T> {
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page number, starting from 1.
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// URL of the next page, `null` on the last page.
    pub next: Option<String>,
    /// URL of the previous page, `null` on the first page.
    pub previous: Option<String>,
    /// Items of the current page.
    pub results: Vec<T>,
}

/// Page query parameters, documented under their default names.
///
/// [`api_doc`] renames them and fills in the limits from the running
/// configuration.
#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number, starting from 1.
    #[param(example = "1")]
    pub page: Option<String>,
    /// Number of items per page.
    #[param(example = 10)]
    pub page_size: Option<i64>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mito API",
        description = "Every response is wrapped as `{ data, code, message }`; `code` is 0 on success."
    ),
    paths(
        routes::health::health_check,
        routes::error_codes::list_error_codes,
    ),
    components(schemas(ErrorEnvelopeDoc)),
    tags(
        (name = "system", description = "Service status"),
        (name = "meta", description = "API conventions"),
    )
)]
pub struct ApiDoc;

/// The OpenAPI document with page parameters matching `config`.
pub fn api_doc(config: &PaginationConfig) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    for item in doc.paths.paths.values_mut() {
        let operations = [
            item.get.as_mut(),
            item.post.as_mut(),
            item.put.as_mut(),
            item.patch.as_mut(),
            item.delete.as_mut(),
        ];
        for operation in operations.into_iter().flatten() {
            describe_page_params(operation, config);
        }
    }

    doc
}

fn describe_page_params(operation: &mut Operation, config: &PaginationConfig) {
    let Some(parameters) = operation.parameters.as_mut() else {
        return;
    };

    for parameter in parameters {
        match parameter.name.as_str() {
            "page" => {
                parameter.name = config.page_query_param.clone();
                parameter.description = Some(format!(
                    "Page number, starting from 1, or one of: {}",
                    config.last_page_strings.join(", ")
                ));
            }
            "page_size" => {
                parameter.name = config.page_size_query_param.clone();
                parameter.description = Some(format!(
                    "Number of items per page (default {}, max {})",
                    config.default_page_size, config.max_page_size
                ));
            }
            _ => {}
        }
    }
}
