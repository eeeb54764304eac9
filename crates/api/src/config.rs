use std::path::PathBuf;

use mito_core::{EnvelopeError, ErrorMapping, MappingError, PaginationConfig, Pipeline};

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    ErrorMapping(#[from] MappingError),

    #[error("Invalid pagination settings: {0}")]
    Pagination(#[from] EnvelopeError),
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Page size defaults, limits and query parameter names.
    pub pagination: PaginationConfig,
    /// Optional JSON file overlaid on the built-in error mapping.
    pub error_mapping_path: Option<PathBuf>,
    /// Whether responses are wrapped in the `{data, code, message}` envelope.
    pub envelope_enabled: bool,
    /// Origin used for absolute pagination links, e.g. `https://api.example.com`.
    /// When unset, links are built from the request's `Host` header.
    pub public_base_url: Option<String>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 30,
            pagination: PaginationConfig::default(),
            error_mapping_path: None,
            envelope_enabled: true,
            public_base_url: None,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `DEFAULT_PAGE_SIZE`     | `10`                       |
    /// | `MAX_PAGE_SIZE`         | `100`                      |
    /// | `PAGE_QUERY_PARAM`      | `page`                     |
    /// | `PAGE_SIZE_QUERY_PARAM` | `page_size`                |
    /// | `LAST_PAGE_STRINGS`     | `last`                     |
    /// | `ERROR_MAPPING_PATH`    | unset                      |
    /// | `RESPONSE_ENVELOPE`     | `on`                       |
    /// | `PUBLIC_BASE_URL`       | unset                      |
    /// | `LOG_FORMAT`            | `text`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or(defaults.host);
        let port = parse_or(var("PORT"), "PORT", "a valid u16", defaults.port)?;

        let cors_origins = match var("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let request_timeout_secs = parse_or(
            var("REQUEST_TIMEOUT_SECS"),
            "REQUEST_TIMEOUT_SECS",
            "a valid u64",
            defaults.request_timeout_secs,
        )?;

        let pagination = PaginationConfig {
            default_page_size: parse_or(
                var("DEFAULT_PAGE_SIZE"),
                "DEFAULT_PAGE_SIZE",
                "a positive integer",
                defaults.pagination.default_page_size,
            )?,
            max_page_size: parse_or(
                var("MAX_PAGE_SIZE"),
                "MAX_PAGE_SIZE",
                "a positive integer",
                defaults.pagination.max_page_size,
            )?,
            page_query_param: var("PAGE_QUERY_PARAM")
                .unwrap_or(defaults.pagination.page_query_param),
            page_size_query_param: var("PAGE_SIZE_QUERY_PARAM")
                .unwrap_or(defaults.pagination.page_size_query_param),
            last_page_strings: match var("LAST_PAGE_STRINGS") {
                Some(raw) => raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                None => defaults.pagination.last_page_strings,
            },
        };
        pagination.validate()?;

        let envelope_enabled = match var("RESPONSE_ENVELOPE").as_deref() {
            None => defaults.envelope_enabled,
            Some(raw) => parse_switch(raw).ok_or_else(|| ConfigError::Invalid {
                name: "RESPONSE_ENVELOPE",
                value: raw.to_string(),
                expected: "one of on/off/true/false",
            })?,
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            None => defaults.log_format,
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(raw) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: raw.to_string(),
                    expected: "text or json",
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            pagination,
            error_mapping_path: var("ERROR_MAPPING_PATH").map(PathBuf::from),
            envelope_enabled,
            public_base_url: var("PUBLIC_BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            log_format,
        })
    }

    /// Build the response pipeline described by this configuration.
    ///
    /// The error mapping file, if any, is read here and only here.
    pub fn build_pipeline(&self) -> Result<Pipeline, ConfigError> {
        let mapping = match &self.error_mapping_path {
            Some(path) => ErrorMapping::load(path)?,
            None => ErrorMapping::builtin(),
        };

        let mut builder = Pipeline::builder()
            .error_mapping(mapping)
            .pagination(self.pagination.clone());
        if !self.envelope_enabled {
            builder = builder.without_envelope();
        }

        Ok(builder.build()?)
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
            expected,
        }),
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
