//! Typed settings read from the environment after [`crate::load_and_apply`].

use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_SERVE_ADDR: &str = "127.0.0.1:8090";
pub const DEFAULT_MAX_TEMPLATE_BYTES: usize = 256 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REMOTE_URL: &str = "http://127.0.0.1:8090";

/// Server and client settings.
///
/// - `PROMPT_SERVE_ADDR` (default `127.0.0.1:8090`)
/// - `PROMPT_BASE_PATH` (default empty: routes at the root)
/// - `PROMPT_MAX_TEMPLATE_BYTES` (default 262144)
/// - `PROMPT_REQUEST_TIMEOUT_SECS` (default 10)
/// - `PROMPT_REMOTE_URL` (default `http://127.0.0.1:8090`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub serve_addr: SocketAddr,
    /// Normalized: empty, or `/segment[/segment...]` without trailing slash.
    pub base_path: String,
    pub max_template_bytes: usize,
    pub request_timeout: Duration,
    pub remote_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            serve_addr: SocketAddr::from(([127, 0, 0, 1], 8090)),
            base_path: String::new(),
            max_template_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment, falling back to [`Default`] for unset or
    /// invalid values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an explicit lookup (tests, embedding).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            serve_addr: parsed(&lookup, "PROMPT_SERVE_ADDR").unwrap_or(default.serve_addr),
            base_path: lookup("PROMPT_BASE_PATH")
                .map(|p| normalize_base_path(&p))
                .unwrap_or(default.base_path),
            max_template_bytes: parsed(&lookup, "PROMPT_MAX_TEMPLATE_BYTES")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.max_template_bytes),
            request_timeout: parsed(&lookup, "PROMPT_REQUEST_TIMEOUT_SECS")
                .filter(|n: &u64| *n > 0)
                .map(Duration::from_secs)
                .unwrap_or(default.request_timeout),
            remote_url: lookup("PROMPT_REMOTE_URL")
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or(default.remote_url),
        }
    }

    /// `base_path` joined with `route` (which starts with `/`).
    pub fn route(&self, route: &str) -> String {
        format!("{}{}", self.base_path, route)
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "invalid setting, using default");
            None
        }
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
