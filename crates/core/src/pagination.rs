//! Pagination resolution.
//!
//! Turns the raw slice reported by a data source (items, total count,
//! requested page and page size, base URL) into a [`PaginationBlock`]. The
//! resolver never looks at how the slice was computed; it only validates the
//! numbers and derives the links.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EnvelopeError;
use crate::links::PageLinks;
use crate::outcome::Payload;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query parameter carrying the page number.
pub const PAGE_QUERY_PARAM: &str = "page";

/// Query parameter carrying the page size.
pub const PAGE_SIZE_QUERY_PARAM: &str = "page_size";

/// Page values that select the final page instead of a number.
pub const LAST_PAGE_STRINGS: &[&str] = &["last"];

/// Pagination limits and query parameter names, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub page_query_param: String,
    pub page_size_query_param: String,
    /// Values of the page parameter meaning "the last page", e.g. `?page=last`.
    pub last_page_strings: Vec<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            page_query_param: PAGE_QUERY_PARAM.to_string(),
            page_size_query_param: PAGE_SIZE_QUERY_PARAM.to_string(),
            last_page_strings: LAST_PAGE_STRINGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        if self.default_page_size < 1 {
            return Err(EnvelopeError::Validation(
                "default page size must be at least 1".into(),
            ));
        }
        if self.max_page_size < self.default_page_size {
            return Err(EnvelopeError::Validation(format!(
                "max page size {} is smaller than the default page size {}",
                self.max_page_size, self.default_page_size
            )));
        }
        if self.page_query_param.is_empty()
            || self.page_size_query_param.is_empty()
            || self.page_query_param == self.page_size_query_param
        {
            return Err(EnvelopeError::Validation(
                "page and page size query parameters must be distinct and non-empty".into(),
            ));
        }
        if self
            .last_page_strings
            .iter()
            .any(|s| s.trim().is_empty() || s.parse::<i64>().is_ok())
        {
            return Err(EnvelopeError::Validation(
                "last page strings must be non-empty and not numbers".into(),
            ));
        }
        Ok(())
    }

    /// Whether `raw` names the last page.
    pub fn is_last_page_string(&self, raw: &str) -> bool {
        self.last_page_strings.iter().any(|s| s == raw)
    }
}

/// Number of the final page of `total` items, at least 1.
pub fn last_page(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size.max(1)).max(1)
}

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

/// Raw pagination facts reported by the data source.
///
/// Numbers are signed so that bad client or data-source input can be
/// represented and rejected here rather than wrapping silently upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationInput {
    pub items: Vec<Value>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub base_url: String,
}

impl PaginationInput {
    pub fn new(
        items: Vec<Value>,
        total: i64,
        page: i64,
        page_size: i64,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            base_url: base_url.into(),
        }
    }

    /// Serialize typed items up front.
    pub fn from_items<T: Serialize>(
        items: &[T],
        total: i64,
        page: i64,
        page_size: i64,
        base_url: impl Into<String>,
    ) -> Result<Self, EnvelopeError> {
        let items = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(items, total, page, page_size, base_url))
    }
}

/// The `data` of a paginated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBlock {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Value>,
}

/// Non-fatal problems found while resolving a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationWarning {
    /// `page < 1` was clamped to 1.
    PageClamped { requested: i64 },
    /// `page_size < 1` was clamped to 1.
    PageSizeClamped { requested: i64 },
}

impl fmt::Display for PaginationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationWarning::PageClamped { requested } => {
                write!(f, "page {requested} is below 1, using 1")
            }
            PaginationWarning::PageSizeClamped { requested } => {
                write!(f, "page size {requested} is below 1, using 1")
            }
        }
    }
}

/// A resolved page together with the warnings raised while resolving it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    pub block: PaginationBlock,
    pub warnings: Vec<PaginationWarning>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Validate the input and compute the pagination block.
///
/// - `total < 0` and `page_size > max_page_size` fail with
///   [`EnvelopeError::Validation`], as does an unparseable base URL.
/// - A page past the last one fails with [`EnvelopeError::PageOutOfRange`],
///   so `(page - 1) * page_size < total` holds whenever `total > 0`. An empty
///   collection only has page 1.
/// - `page < 1` and `page_size < 1` are clamped to 1 with a warning.
/// - `next` is present iff `page * page_size < total`; `previous` iff
///   `page > 1`.
pub fn resolve_pagination(
    input: PaginationInput,
    config: &PaginationConfig,
) -> Result<ResolvedPage, EnvelopeError> {
    let PaginationInput {
        items,
        total,
        page,
        page_size,
        base_url,
    } = input;

    if total < 0 {
        return Err(EnvelopeError::Validation(format!(
            "total must not be negative, got {total}"
        )));
    }

    let mut warnings = Vec::new();

    let page = if page < 1 {
        warnings.push(PaginationWarning::PageClamped { requested: page });
        1
    } else {
        page.unsigned_abs()
    };

    let page_size = if page_size < 1 {
        warnings.push(PaginationWarning::PageSizeClamped {
            requested: page_size,
        });
        1
    } else {
        page_size.unsigned_abs()
    };

    if page_size > config.max_page_size {
        return Err(EnvelopeError::Validation(format!(
            "page size {page_size} exceeds the maximum of {}",
            config.max_page_size
        )));
    }

    let total = total.unsigned_abs();
    let last_page = last_page(total, page_size);
    if page > last_page {
        return Err(EnvelopeError::PageOutOfRange { page, last_page });
    }

    let links = PageLinks::parse(&base_url)?;

    for warning in &warnings {
        tracing::warn!(%warning, base_url = %base_url, "Pagination input adjusted");
    }

    let next = (page.saturating_mul(page_size) < total).then(|| {
        links.for_page(
            &config.page_query_param,
            page + 1,
            &config.page_size_query_param,
            page_size,
        )
    });
    let previous = (page > 1).then(|| {
        links.for_page(
            &config.page_query_param,
            page - 1,
            &config.page_size_query_param,
            page_size,
        )
    });

    Ok(ResolvedPage {
        block: PaginationBlock {
            total,
            page,
            page_size,
            next,
            previous,
            results: items,
        },
        warnings,
    })
}

/// First pipeline stage: paginated payloads become their pagination block,
/// plain payloads pass through untouched.
pub fn resolve_payload(payload: Payload, config: &PaginationConfig) -> Result<Value, EnvelopeError> {
    match payload {
        Payload::Plain(value) => Ok(value),
        Payload::Paginated(input) => {
            let resolved = resolve_pagination(input, config)?;
            Ok(serde_json::to_value(resolved.block)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    const BASE: &str = "https://host/path";

    fn resolve(total: i64, page: i64, page_size: i64) -> ResolvedPage {
        resolve_pagination(
            PaginationInput::new(vec![], total, page, page_size, BASE),
            &PaginationConfig::default(),
        )
        .unwrap()
    }

    // -- links ---------------------------------------------------------------

    #[test]
    fn first_page_has_only_next() {
        let block = resolve(25, 1, 10).block;
        assert_eq!(block.previous, None);
        assert_eq!(block.next.as_deref(), Some("https://host/path?page=2&page_size=10"));
    }

    #[test]
    fn last_page_has_only_previous() {
        let block = resolve(25, 3, 10).block;
        assert_eq!(block.next, None);
        assert_eq!(block.previous.as_deref(), Some("https://host/path?page=2&page_size=10"));
    }

    #[test]
    fn middle_page_has_both_links() {
        let block = resolve(42, 2, 10).block;
        assert_eq!(block.next.as_deref(), Some("https://host/path?page=3&page_size=10"));
        assert_eq!(block.previous.as_deref(), Some("https://host/path?page=1&page_size=10"));
    }

    #[test]
    fn exact_multiple_has_no_next() {
        let block = resolve(20, 2, 10).block;
        assert_eq!(block.next, None);
    }

    #[test]
    fn empty_collection_has_no_links() {
        let resolved = resolve(0, 1, 10);
        assert_eq!(resolved.block.next, None);
        assert_eq!(resolved.block.previous, None);
        assert!(resolved.warnings.is_empty());
    }

    // -- clamping ------------------------------------------------------------

    #[test]
    fn zero_page_size_is_clamped_with_warning() {
        let resolved = resolve(25, 1, 0);
        assert_eq!(resolved.block.page_size, 1);
        assert_eq!(
            resolved.warnings,
            vec![PaginationWarning::PageSizeClamped { requested: 0 }]
        );
        assert_eq!(resolved.block.next.as_deref(), Some("https://host/path?page=2&page_size=1"));
    }

    #[test]
    fn negative_page_is_clamped_with_warning() {
        let resolved = resolve(25, -3, 10);
        assert_eq!(resolved.block.page, 1);
        assert_eq!(resolved.block.previous, None);
        assert_eq!(
            resolved.warnings,
            vec![PaginationWarning::PageClamped { requested: -3 }]
        );
    }

    // -- range ---------------------------------------------------------------

    #[test]
    fn page_past_the_end_fails() {
        let err = resolve_pagination(
            PaginationInput::new(vec![], 25, 7, 10, BASE),
            &PaginationConfig::default(),
        )
        .unwrap_err();
        assert_matches!(err, EnvelopeError::PageOutOfRange { page: 7, last_page: 3 });
    }

    #[test]
    fn first_page_after_the_end_fails() {
        let err = resolve_pagination(
            PaginationInput::new(vec![], 30, 4, 10, BASE),
            &PaginationConfig::default(),
        )
        .unwrap_err();
        assert_matches!(err, EnvelopeError::PageOutOfRange { page: 4, last_page: 3 });
    }

    #[test]
    fn empty_collection_only_has_page_one() {
        let err = resolve_pagination(
            PaginationInput::new(vec![], 0, 2, 10, BASE),
            &PaginationConfig::default(),
        )
        .unwrap_err();
        assert_matches!(err, EnvelopeError::PageOutOfRange { page: 2, last_page: 1 });
    }

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(last_page(25, 10), 3);
        assert_eq!(last_page(30, 10), 3);
        assert_eq!(last_page(0, 10), 1);
        assert_eq!(last_page(5, 0), 5);
    }

    // -- validation ----------------------------------------------------------

    #[test]
    fn negative_total_fails() {
        let err = resolve_pagination(
            PaginationInput::new(vec![], -1, 1, 10, BASE),
            &PaginationConfig::default(),
        )
        .unwrap_err();
        assert_matches!(err, EnvelopeError::Validation(_));
    }

    #[test]
    fn oversized_page_fails() {
        let err = resolve_pagination(
            PaginationInput::new(vec![], 500, 1, 101, BASE),
            &PaginationConfig::default(),
        )
        .unwrap_err();
        assert_matches!(err, EnvelopeError::Validation(msg) if msg.contains("101"));
    }

    #[test]
    fn config_rejects_max_below_default() {
        let config = PaginationConfig {
            max_page_size: 5,
            ..PaginationConfig::default()
        };
        assert_matches!(config.validate(), Err(EnvelopeError::Validation(_)));
    }

    #[test]
    fn config_rejects_numeric_last_page_string() {
        let config = PaginationConfig {
            last_page_strings: vec!["9".into()],
            ..PaginationConfig::default()
        };
        assert_matches!(config.validate(), Err(EnvelopeError::Validation(_)));
    }

    #[test]
    fn last_page_string_matches_exactly() {
        let config = PaginationConfig::default();
        assert!(config.is_last_page_string("last"));
        assert!(!config.is_last_page_string("LAST"));
        assert!(!config.is_last_page_string("3"));
    }

    #[test]
    fn config_rejects_clashing_param_names() {
        let config = PaginationConfig {
            page_size_query_param: "page".into(),
            ..PaginationConfig::default()
        };
        assert_matches!(config.validate(), Err(EnvelopeError::Validation(_)));
    }

    // -- resolve_payload -----------------------------------------------------

    #[test]
    fn plain_payload_passes_through() {
        let value = json!({"total": 3, "page": 1});
        let resolved = resolve_payload(Payload::Plain(value.clone()), &PaginationConfig::default());
        assert_eq!(resolved.unwrap(), value);
    }

    #[test]
    fn paginated_payload_serializes_camel_case_block() {
        let input = PaginationInput::new(vec![json!({"id": 11}), json!({"id": 12})], 42, 2, 10, BASE);
        let value = resolve_payload(Payload::Paginated(input), &PaginationConfig::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "total": 42,
                "page": 2,
                "pageSize": 10,
                "next": "https://host/path?page=3&page_size=10",
                "previous": "https://host/path?page=1&page_size=10",
                "results": [{"id": 11}, {"id": 12}]
            })
        );
    }

    #[test]
    fn from_items_serializes_typed_rows() {
        #[derive(Serialize)]
        struct Row {
            id: u32,
        }

        let input = PaginationInput::from_items(&[Row { id: 1 }, Row { id: 2 }], 2, 1, 10, BASE).unwrap();
        assert_eq!(input.items, vec![json!({"id": 1}), json!({"id": 2})]);
    }
}
