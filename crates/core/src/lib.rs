//! Response envelope and pagination normalization.
//!
//! Every API response goes through two pure, request-scoped stages:
//!
//! 1. [`pagination::resolve_payload`] turns a payload marked
//!    [`Payload::Paginated`] into a [`PaginationBlock`] and passes plain
//!    payloads through.
//! 2. [`envelope::normalize_envelope`] wraps the result as
//!    `{ "data", "code", "message" }`, mapping failures through the
//!    [`ErrorMapping`].
//!
//! [`Pipeline`] composes the two. This crate has no HTTP dependency; the
//! transport status is carried alongside the body and never changed.

pub mod envelope;
pub mod error;
pub mod error_mapping;
pub mod links;
pub mod outcome;
pub mod pagination;
pub mod pipeline;

pub use envelope::{normalize_envelope, Envelope, SUCCESS_CODE};
pub use error::{EnvelopeError, ErrorCategory, Failure};
pub use error_mapping::{ErrorMapping, MappingEntry, MappingError};
pub use outcome::{Outcome, Payload};
pub use pagination::{
    last_page, resolve_pagination, resolve_payload, PaginationBlock, PaginationConfig,
    PaginationInput, PaginationWarning, ResolvedPage,
};
pub use pipeline::{Body, Pipeline, PipelineBuilder, Rendered};
