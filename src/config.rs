//! Service endpoint configuration.

/// Base URL used when the environment provides none.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

/// Environment variable overriding the service base URL.
pub const API_BASE_ENV: &str = "PIPEWEAVE_API_BASE_URL";

/// Where the definition and pipeline services live.
///
/// Resolution order: explicit [`new`](Self::new), then the
/// `PIPEWEAVE_API_BASE_URL` environment variable (a `.env` file is honored
/// via dotenvy), then [`DEFAULT_API_BASE`].
///
/// # Examples
///
/// ```rust
/// use pipeweave::config::ApiConfig;
///
/// let config = ApiConfig::new("http://localhost:9001/api/v1/");
/// assert_eq!(config.base_url, "http://localhost:9001/api/v1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Configure an explicit base URL. A trailing slash is trimmed so path
    /// joins stay predictable.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the base URL from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(API_BASE_ENV) {
            Ok(value) if !value.is_empty() => Self::new(value),
            _ => Self::new(DEFAULT_API_BASE),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
