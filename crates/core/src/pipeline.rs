//! Explicit composition of the two response stages.
//!
//! A [`Pipeline`] is built once at startup and shared behind an `Arc`. Each
//! request runs [`resolve_payload`] and then, unless the pipeline was built
//! [`without_envelope`](PipelineBuilder::without_envelope),
//! [`normalize_envelope`]. Nothing here touches the HTTP status.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::envelope::{normalize_envelope, Envelope};
use crate::error::{EnvelopeError, Failure};
use crate::error_mapping::ErrorMapping;
use crate::outcome::Outcome;
use crate::pagination::{resolve_payload, PaginationConfig};

/// Response body leaving the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    Envelope(Envelope),
    /// Un-enveloped body: the payload itself, or `{ "detail": .. }` on
    /// failure.
    Raw(Value),
}

impl Body {
    pub fn into_value(self) -> Value {
        match self {
            Body::Envelope(envelope) => serde_json::json!({
                "data": envelope.data,
                "code": envelope.code,
                "message": envelope.message,
            }),
            Body::Raw(value) => value,
        }
    }
}

/// Transport status (passed through untouched) and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub status: u16,
    pub body: Body,
}

/// The configured two-stage response pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    mapping: Arc<ErrorMapping>,
    pagination: PaginationConfig,
    envelope: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            mapping: Arc::new(ErrorMapping::builtin()),
            pagination: PaginationConfig::default(),
            envelope: true,
        }
    }
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn error_mapping(&self) -> &ErrorMapping {
        &self.mapping
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    pub fn envelope_enabled(&self) -> bool {
        self.envelope
    }

    /// Run the pagination stage only.
    pub fn resolve(&self, outcome: Outcome) -> Result<Value, Failure> {
        match outcome {
            Outcome::Success(payload) => {
                resolve_payload(payload, &self.pagination).map_err(EnvelopeError::into_failure)
            }
            Outcome::Failure(failure) => Err(failure),
        }
    }

    /// Run both stages regardless of how the pipeline was built.
    pub fn envelope(&self, outcome: Outcome) -> Envelope {
        normalize_envelope(self.resolve(outcome), &self.mapping)
    }

    /// Run the configured stages and pair the body with `status`.
    pub fn render(&self, status: u16, outcome: Outcome) -> Rendered {
        let body = if self.envelope {
            Body::Envelope(self.envelope(outcome))
        } else {
            match self.resolve(outcome) {
                Ok(value) => Body::Raw(value),
                Err(failure) => {
                    let (_, message) = self.mapping.resolve_or_fallback(&failure);
                    Body::Raw(serde_json::json!({ "detail": message }))
                }
            }
        };

        Rendered { status, body }
    }
}

/// Builder for [`Pipeline`]; the envelope stage is on unless removed.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    mapping: ErrorMapping,
    pagination: PaginationConfig,
    envelope: bool,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            mapping: ErrorMapping::builtin(),
            pagination: PaginationConfig::default(),
            envelope: true,
        }
    }
}

impl PipelineBuilder {
    pub fn error_mapping(mut self, mapping: ErrorMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn pagination(mut self, config: PaginationConfig) -> Self {
        self.pagination = config;
        self
    }

    /// Omit the envelope stage. Bodies go out as the bare payload.
    pub fn without_envelope(mut self) -> Self {
        self.envelope = false;
        self
    }

    pub fn build(self) -> Result<Pipeline, EnvelopeError> {
        self.pagination.validate()?;
        if !self.envelope {
            tracing::warn!("Response envelope stage disabled for this pipeline");
        }
        Ok(Pipeline {
            mapping: Arc::new(self.mapping),
            pagination: self.pagination,
            envelope: self.envelope,
        })
    }
}
