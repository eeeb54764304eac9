//! Page request parsing for list endpoints.
//!
//! Parameter names and defaults come from the pipeline's
//! [`PaginationConfig`], so `?page=2&page_size=20` can be renamed without
//! touching handlers.

use std::collections::HashMap;

use mito_core::{last_page, EnvelopeError, PaginationConfig};

/// The page a client asked for: a number, or one of the configured
/// last-page strings (`?page=last`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(i64),
    Last,
}

/// The page a client asked for.
///
/// Values are kept as sent (after defaulting) so the pagination resolver can
/// clamp them and record the warning. A data source first pins the request to
/// its collection size with [`resolve`](Self::resolve), then slices with the
/// resulting [`PageWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: PageNumber,
    pub page_size: i64,
}

impl PageRequest {
    /// Parse the page parameters out of a decoded query string.
    ///
    /// - Missing `page` means 1; a last-page string means the final page; any
    ///   other non-integer `page` is a validation error.
    /// - Missing or non-integer `page_size` means the configured default.
    pub fn from_params(
        params: &HashMap<String, String>,
        config: &PaginationConfig,
    ) -> Result<Self, EnvelopeError> {
        let page = match params.get(&config.page_query_param).map(|v| v.trim()) {
            None | Some("") => PageNumber::Number(1),
            Some(raw) if config.is_last_page_string(raw) => PageNumber::Last,
            Some(raw) => raw.parse::<i64>().map(PageNumber::Number).map_err(|_| {
                EnvelopeError::Validation(format!(
                    "{} must be an integer, got '{raw}'",
                    config.page_query_param
                ))
            })?,
        };

        let default_size = i64::try_from(config.default_page_size).unwrap_or(i64::MAX);
        let page_size = match params.get(&config.page_size_query_param).map(|v| v.trim()) {
            None | Some("") => default_size,
            Some(raw) => raw.parse::<i64>().unwrap_or_else(|_| {
                tracing::warn!(
                    param = %config.page_size_query_param,
                    value = raw,
                    "Ignoring non-integer page size"
                );
                default_size
            }),
        };

        Ok(Self { page, page_size })
    }

    /// Pin the request to a collection of `total` items.
    pub fn resolve(&self, total: i64) -> PageWindow {
        let page = match self.page {
            PageNumber::Number(page) => page,
            PageNumber::Last => {
                let last = last_page(
                    total.max(0).unsigned_abs(),
                    self.page_size.max(1).unsigned_abs(),
                );
                i64::try_from(last).unwrap_or(i64::MAX)
            }
        };
        PageWindow {
            page,
            page_size: self.page_size,
        }
    }
}

/// A page request with a concrete page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
}

impl PageWindow {
    /// Number of items to skip.
    pub fn offset(&self) -> u64 {
        (self.page.max(1).unsigned_abs() - 1).saturating_mul(self.limit())
    }

    /// Number of items to take.
    pub fn limit(&self) -> u64 {
        self.page_size.max(1).unsigned_abs()
    }
}
