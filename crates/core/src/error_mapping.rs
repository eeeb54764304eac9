//! Static table translating failure categories into wire-level codes and
//! messages.
//!
//! The table is built once at startup (built-in entries, optionally
//! overlaid with a JSON file) and shared read-only afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCategory, EnvelopeError, Failure};

/// Placeholder replaced by the failure detail when a template contains it.
pub const DETAIL_PLACEHOLDER: &str = "{detail}";

/// Code used when a category is unmapped and the table has no `internal`
/// entry either.
pub const GENERIC_INTERNAL_CODE: i64 = 50000;

/// Message paired with [`GENERIC_INTERNAL_CODE`].
pub const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One row of the table: the code sent on the wire and its message template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub code: i64,
    pub message: String,
}

impl MappingEntry {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Render the message, interpolating `detail` into `{detail}`.
    ///
    /// Without a detail the placeholder and any separator left dangling in
    /// front of it are removed, so `"Validation failed: {detail}"` renders as
    /// `"Validation failed"`. Templates without the placeholder ignore the
    /// detail entirely.
    pub fn render(&self, detail: Option<&str>) -> String {
        if !self.message.contains(DETAIL_PLACEHOLDER) {
            return self.message.clone();
        }

        match detail.map(str::trim).filter(|d| !d.is_empty()) {
            Some(detail) => self.message.replace(DETAIL_PLACEHOLDER, detail),
            None => self
                .message
                .replace(DETAIL_PLACEHOLDER, "")
                .trim_end_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
                .to_string(),
        }
    }
}

/// Errors raised while loading a mapping table from configuration.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Failed to read error mapping file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse error mapping: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid error mapping entry '{category}': {reason}")]
    InvalidEntry { category: String, reason: String },
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Category -> `(code, message template)` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMapping {
    entries: HashMap<String, MappingEntry>,
}

impl Default for ErrorMapping {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ErrorMapping {
    /// A table with no entries. Every lookup falls back to the generic code.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The built-in table. Codes are `<http status><two-digit sequence>`.
    pub fn builtin() -> Self {
        Self::empty()
            .with_entry(ErrorCategory::BadRequest, MappingEntry::new(40002, "Bad request: {detail}"))
            .with_entry(ErrorCategory::Validation, MappingEntry::new(40001, "Validation failed: {detail}"))
            .with_entry(ErrorCategory::Unauthorized, MappingEntry::new(40101, "Authentication required"))
            .with_entry(ErrorCategory::Forbidden, MappingEntry::new(40301, "Permission denied"))
            .with_entry(ErrorCategory::NotFound, MappingEntry::new(40401, "Resource not found"))
            .with_entry(ErrorCategory::Conflict, MappingEntry::new(40901, "Conflict: {detail}"))
            .with_entry(ErrorCategory::Internal, MappingEntry::new(50001, GENERIC_INTERNAL_MESSAGE))
            .with_entry(ErrorCategory::Serialization, MappingEntry::new(50002, "Serialization error"))
    }

    /// Add or replace the entry for `category`.
    pub fn with_entry(mut self, category: impl Into<ErrorCategory>, entry: MappingEntry) -> Self {
        self.entries.insert(category.into().as_str().to_string(), entry);
        self
    }

    /// Parse a JSON object of `{ "<category>": { "code": .., "message": .. } }`
    /// and overlay it on the built-in table.
    pub fn from_json_str(json: &str) -> Result<Self, MappingError> {
        let overrides: HashMap<String, MappingEntry> = serde_json::from_str(json)?;
        let mut mapping = Self::builtin();

        for (category, entry) in overrides {
            validate_entry(&category, &entry)?;
            mapping = mapping.with_entry(category, entry);
        }

        Ok(mapping)
    }

    /// Read [`from_json_str`](Self::from_json_str) input from a file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let json = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mapping = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), entries = mapping.len(), "Loaded error mapping");
        Ok(mapping)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ordered by code, then category name.
    pub fn entries(&self) -> Vec<(&str, &MappingEntry)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(category, entry)| (category.as_str(), entry))
            .collect();
        entries.sort_by(|a, b| a.1.code.cmp(&b.1.code).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn lookup(&self, category: &ErrorCategory) -> Option<&MappingEntry> {
        self.entries.get(category.as_str())
    }

    /// Map a failure to its wire code and rendered message.
    ///
    /// Fails with [`EnvelopeError::Unmapped`] when the category has no entry.
    pub fn resolve(&self, failure: &Failure) -> Result<(i64, String), EnvelopeError> {
        let entry = self
            .lookup(&failure.category)
            .ok_or_else(|| EnvelopeError::Unmapped(failure.category.clone()))?;
        Ok((entry.code, entry.render(failure.detail.as_deref())))
    }

    /// Like [`resolve`](Self::resolve), but degrades unmapped categories to
    /// the generic internal error. The detail of an unmapped failure is
    /// logged and never rendered.
    pub fn resolve_or_fallback(&self, failure: &Failure) -> (i64, String) {
        match self.resolve(failure) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    detail = failure.detail.as_deref().unwrap_or_default(),
                    "Falling back to generic internal error"
                );
                self.fallback()
            }
        }
    }

    /// The generic internal error: the table's `internal` entry rendered
    /// without detail, or the hard-coded generic pair.
    pub fn fallback(&self) -> (i64, String) {
        match self.lookup(&ErrorCategory::Internal) {
            Some(entry) => (entry.code, entry.render(None)),
            None => (GENERIC_INTERNAL_CODE, GENERIC_INTERNAL_MESSAGE.to_string()),
        }
    }
}

fn validate_entry(category: &str, entry: &MappingEntry) -> Result<(), MappingError> {
    let invalid = |reason: &str| MappingError::InvalidEntry {
        category: category.to_string(),
        reason: reason.to_string(),
    };

    if category.trim().is_empty() {
        return Err(invalid("category name must not be empty"));
    }
    if entry.code == crate::envelope::SUCCESS_CODE {
        return Err(invalid("code 0 is reserved for success"));
    }
    if entry.message.trim().is_empty() {
        return Err(invalid("message must not be empty"));
    }
    Ok(())
}
