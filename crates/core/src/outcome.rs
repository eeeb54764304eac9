//! What a downstream view hands to the pipeline.

use serde::Serialize;
use serde_json::Value;

use crate::error::{EnvelopeError, ErrorCategory, Failure};
use crate::pagination::PaginationInput;

/// A successful payload, explicitly tagged as paginated or not.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Plain(Value),
    Paginated(PaginationInput),
}

impl Payload {
    /// Serialize a typed value into a plain payload.
    pub fn plain<T: Serialize>(value: &T) -> Result<Self, EnvelopeError> {
        Ok(Payload::Plain(serde_json::to_value(value)?))
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self, Payload::Paginated(_))
    }
}

/// The raw result of a downstream view.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Payload),
    Failure(Failure),
}

impl Outcome {
    pub fn plain(value: Value) -> Self {
        Outcome::Success(Payload::Plain(value))
    }

    pub fn paginated(input: PaginationInput) -> Self {
        Outcome::Success(Payload::Paginated(input))
    }

    /// Serialize a typed value. A value that cannot be represented as JSON
    /// becomes a `serialization` failure instead of a success.
    pub fn from_serialize<T: Serialize>(value: &T) -> Self {
        match Payload::plain(value) {
            Ok(payload) => Outcome::Success(payload),
            Err(err) => Outcome::Failure(err.into_failure()),
        }
    }

    pub fn failure(category: impl Into<ErrorCategory>, detail: Option<String>) -> Self {
        Outcome::Failure(Failure {
            category: category.into(),
            detail,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

impl From<Failure> for Outcome {
    fn from(failure: Failure) -> Self {
        Outcome::Failure(failure)
    }
}

impl From<Result<Payload, EnvelopeError>> for Outcome {
    fn from(result: Result<Payload, EnvelopeError>) -> Self {
        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(err) => Outcome::Failure(err.into_failure()),
        }
    }
}
