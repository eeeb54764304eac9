use axum::http::StatusCode;
use mito_core::{EnvelopeError, ErrorCategory, Failure};

/// Application-level error type for HTTP handlers.
///
/// Each variant resolves to an HTTP status and a [`Failure`]; the response
/// pipeline turns the failure into the error envelope. Status selection
/// lives here, never in the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error raised by the response pipeline itself.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// An internal error. The message is logged, never sent.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Any other category from the error mapping, with an explicit status.
    #[error("{} ({status})", .failure.category)]
    Custom { status: StatusCode, failure: Failure },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Envelope(err) => match err {
                EnvelopeError::Validation(_) => StatusCode::BAD_REQUEST,
                EnvelopeError::PageOutOfRange { .. } => StatusCode::NOT_FOUND,
                EnvelopeError::Downstream(failure) => status_for_category(&failure.category),
                EnvelopeError::Serialization(_) | EnvelopeError::Unmapped(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Custom { status, .. } => *status,
        }
    }

    /// Split into the transport status and the failure to render.
    pub fn into_failure(self) -> (StatusCode, Failure) {
        let status = self.status();
        let failure = match self {
            AppError::Envelope(err) => err.into_failure(),
            AppError::NotFound(msg) => Failure::not_found().with_detail(msg),
            AppError::Validation(msg) => Failure::validation(msg),
            AppError::BadRequest(msg) => Failure::new(ErrorCategory::BadRequest).with_detail(msg),
            AppError::Unauthorized(msg) => {
                Failure::new(ErrorCategory::Unauthorized).with_detail(msg)
            }
            AppError::Forbidden(msg) => Failure::new(ErrorCategory::Forbidden).with_detail(msg),
            AppError::Conflict(msg) => Failure::new(ErrorCategory::Conflict).with_detail(msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Failure::internal()
            }
            AppError::Custom { failure, .. } => failure,
        };
        (status, failure)
    }
}

impl From<Failure> for AppError {
    fn from(failure: Failure) -> Self {
        AppError::Envelope(EnvelopeError::Downstream(failure))
    }
}

/// Default transport status for a failure category.
pub fn status_for_category(category: &ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Validation | ErrorCategory::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::Serialization | ErrorCategory::Internal | ErrorCategory::Custom(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
