//! Failure taxonomy shared by the pagination and envelope stages.
//!
//! A downstream view reports failures as a [`Failure`]: a category plus an
//! optional human-readable detail. The stages themselves raise
//! [`EnvelopeError`], which always collapses back into a [`Failure`] before
//! it reaches the wire.

use std::fmt;

/// Category used to look up the wire-level code and message in the
/// [`ErrorMapping`](crate::error_mapping::ErrorMapping).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    Validation,
    BadRequest,
    Unauthorized,
    Forbidden,
    Conflict,
    Serialization,
    Internal,
    /// Application-defined category supplied by a downstream view.
    Custom(String),
}

impl ErrorCategory {
    /// The key under which this category is stored in the mapping table.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Validation => "validation",
            ErrorCategory::BadRequest => "bad_request",
            ErrorCategory::Unauthorized => "unauthorized",
            ErrorCategory::Forbidden => "forbidden",
            ErrorCategory::Conflict => "conflict",
            ErrorCategory::Serialization => "serialization",
            ErrorCategory::Internal => "internal",
            ErrorCategory::Custom(name) => name,
        }
    }
}

impl From<&str> for ErrorCategory {
    fn from(key: &str) -> Self {
        match key {
            "not_found" => ErrorCategory::NotFound,
            "validation" => ErrorCategory::Validation,
            "bad_request" => ErrorCategory::BadRequest,
            "unauthorized" => ErrorCategory::Unauthorized,
            "forbidden" => ErrorCategory::Forbidden,
            "conflict" => ErrorCategory::Conflict,
            "serialization" => ErrorCategory::Serialization,
            "internal" => ErrorCategory::Internal,
            other => ErrorCategory::Custom(other.to_string()),
        }
    }
}

impl From<String> for ErrorCategory {
    fn from(key: String) -> Self {
        ErrorCategory::from(key.as_str())
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure signal: what went wrong, and optionally a detail message that
/// the mapped template may interpolate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub category: ErrorCategory,
    pub detail: Option<String>,
}

impl Failure {
    pub fn new(category: impl Into<ErrorCategory>) -> Self {
        Self {
            category: category.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCategory::NotFound)
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation).with_detail(detail)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCategory::Internal)
    }
}

/// Errors raised inside the response pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// Bad pagination parameters or a malformed payload.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A payload could not be converted to JSON.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested page starts past the last item of a non-empty
    /// collection, or past page 1 of an empty one.
    #[error("Invalid page {page}: the last page is {last_page}")]
    PageOutOfRange { page: u64, last_page: u64 },

    /// The failure category has no entry in the mapping table.
    #[error("Unmapped failure category: {0}")]
    Unmapped(ErrorCategory),

    /// A failure reported by the downstream view, passed through as-is.
    #[error("Downstream failure: {}", .0.category)]
    Downstream(Failure),
}

impl EnvelopeError {
    /// Collapse into the [`Failure`] that the envelope stage renders.
    ///
    /// Serialization errors lose their detail: serde messages name internal
    /// types and must not reach the client.
    pub fn into_failure(self) -> Failure {
        match self {
            EnvelopeError::Validation(msg) => Failure::validation(msg),
            EnvelopeError::Serialization(err) => {
                tracing::error!(error = %err, "Payload serialization failed");
                Failure::new(ErrorCategory::Serialization)
            }
            EnvelopeError::PageOutOfRange { page, last_page } => Failure::not_found()
                .with_detail(format!("page {page} is past the last page {last_page}")),
            EnvelopeError::Unmapped(_) => Failure::internal(),
            EnvelopeError::Downstream(failure) => failure,
        }
    }
}

impl From<Failure> for EnvelopeError {
    fn from(failure: Failure) -> Self {
        EnvelopeError::Downstream(failure)
    }
}
