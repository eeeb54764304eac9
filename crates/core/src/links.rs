//! `next` / `previous` link construction.
//!
//! Links are the caller's base URL with the page and page-size query
//! parameters rewritten; every other parameter keeps its value and position.

use url::Url;

use crate::error::EnvelopeError;

/// Origin used to parse path-only base URLs. Never appears in output.
const RELATIVE_ORIGIN: &str = "http://relative.invalid";

/// A parsed base URL that page links are derived from.
#[derive(Debug, Clone)]
pub struct PageLinks {
    url: Url,
    relative: bool,
}

impl PageLinks {
    /// Parse an absolute URL (`https://host/path?..`) or a path-only one
    /// (`/path?..`). Path-only bases produce path-only links.
    pub fn parse(base_url: &str) -> Result<Self, EnvelopeError> {
        let invalid = |err: url::ParseError| {
            EnvelopeError::Validation(format!("invalid base URL '{base_url}': {err}"))
        };

        match Url::parse(base_url) {
            Ok(url) => Ok(Self {
                url,
                relative: false,
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let url = Url::parse(RELATIVE_ORIGIN)
                    .and_then(|origin| origin.join(base_url))
                    .map_err(invalid)?;
                Ok(Self {
                    url,
                    relative: true,
                })
            }
            Err(err) => Err(invalid(err)),
        }
    }

    /// Build the link for `page`, setting both pagination parameters.
    ///
    /// Existing occurrences are replaced in place (duplicates dropped);
    /// missing ones are appended, page first.
    pub fn for_page(&self, page_param: &str, page: u64, size_param: &str, page_size: u64) -> String {
        let mut seen_page = false;
        let mut seen_size = false;
        let mut pairs: Vec<(String, String)> = Vec::new();

        for (key, value) in self.url.query_pairs() {
            if key == page_param {
                if !seen_page {
                    pairs.push((key.into_owned(), page.to_string()));
                    seen_page = true;
                }
            } else if key == size_param {
                if !seen_size {
                    pairs.push((key.into_owned(), page_size.to_string()));
                    seen_size = true;
                }
            } else {
                pairs.push((key.into_owned(), value.into_owned()));
            }
        }
        if !seen_page {
            pairs.push((page_param.to_string(), page.to_string()));
        }
        if !seen_size {
            pairs.push((size_param.to_string(), page_size.to_string()));
        }

        let mut url = self.url.clone();
        url.set_fragment(None);
        url.query_pairs_mut().clear().extend_pairs(&pairs);

        if self.relative {
            match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_string(),
            }
        } else {
            url.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn link(base: &str, page: u64, page_size: u64) -> String {
        PageLinks::parse(base)
            .unwrap()
            .for_page("page", page, "page_size", page_size)
    }

    #[test]
    fn appends_missing_parameters() {
        assert_eq!(link("https://host/path", 3, 10), "https://host/path?page=3&page_size=10");
    }

    #[test]
    fn replaces_existing_parameters_in_place() {
        assert_eq!(
            link("https://host/posts?ordering=-created_at&page=2&page_size=10&q=rust", 3, 10),
            "https://host/posts?ordering=-created_at&page=3&page_size=10&q=rust"
        );
    }

    #[test]
    fn drops_duplicate_page_parameters() {
        assert_eq!(
            link("https://host/posts?page=1&page=9", 2, 5),
            "https://host/posts?page=2&page_size=5"
        );
    }

    #[test]
    fn rewrites_clamped_page_size() {
        assert_eq!(
            link("https://host/posts?page_size=0", 2, 1),
            "https://host/posts?page_size=1&page=2"
        );
    }

    #[test]
    fn strips_fragment() {
        assert_eq!(link("https://host/p?page=1#top", 2, 10), "https://host/p?page=2&page_size=10");
    }

    #[test]
    fn relative_base_yields_relative_link() {
        assert_eq!(
            link("/api/v1/posts?page=2&ordering=title", 1, 10),
            "/api/v1/posts?page=1&ordering=title&page_size=10"
        );
    }

    #[test]
    fn custom_parameter_names() {
        let links = PageLinks::parse("https://host/items?p=4").unwrap();
        assert_eq!(links.for_page("p", 5, "size", 20), "https://host/items?p=5&size=20");
    }

    #[test]
    fn rejects_unparseable_base() {
        assert_matches!(PageLinks::parse("http://[::1"), Err(EnvelopeError::Validation(_)));
    }
}
