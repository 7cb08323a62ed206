//! Terminal configuration.
//!
//! The only configurable value is the backend base URL, read from the
//! `KASIR_API_URL` environment variable at startup.

/// Environment variable naming the backend base URL.
pub const API_URL_ENV: &str = "KASIR_API_URL";

/// Fallback when no backend URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
}

impl Config {
    /// Build a config from an explicit backend URL.
    pub fn new(api_url: &str) -> Self {
        Self {
            api_base_url: normalize_base_url(api_url),
        }
    }

    /// Read the backend URL from the environment, falling back to the
    /// local default.
    pub fn from_env() -> Self {
        let url = std::env::var(API_URL_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(&url)
    }
}

/// Normalise the backend base URL. Pasted URLs come in with or without a
/// scheme, with trailing slashes, and sometimes with the `/api` prefix the
/// endpoint paths re-add; all of that is tolerated here.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        format!("http://{trimmed}")
    } else {
        format!("https://{trimmed}")
    };

    let mut base = with_scheme.trim_end_matches('/');
    if let Some(stripped) = base.strip_suffix("/api") {
        base = stripped.trim_end_matches('/');
    }
    base.to_string()
}
