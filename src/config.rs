//! Provider configuration.
//!
//! A [`GeminiConfig`] is built once at startup and handed to
//! [`ReplyGeneratorBuilder`](crate::ReplyGeneratorBuilder); it is read-only afterwards.
//!
//! Environment variables read by [`GeminiConfig::from_env`]:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `GEMINI_API_URL` | required | Full generateContent endpoint URL |
//! | `GEMINI_API_KEY` | required | API key (falls back to the OS keyring) |
//! | `GEMINI_HTTP_TIMEOUT_SECS` | 30 | Whole-request timeout |
//! | `GEMINI_HTTP_POOL_MAX_IDLE_PER_HOST` | 32 | Idle connections kept per host |
//! | `GEMINI_HTTP_POOL_IDLE_TIMEOUT_SECS` | 90 | Idle connection lifetime |
//! | `GEMINI_PROXY_URL` | unset | Proxy for all outbound traffic |

use crate::{Error, ErrorContext, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const ENV_API_URL: &str = "GEMINI_API_URL";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "GEMINI_HTTP_TIMEOUT_SECS";
pub const ENV_POOL_MAX_IDLE_PER_HOST: &str = "GEMINI_HTTP_POOL_MAX_IDLE_PER_HOST";
pub const ENV_POOL_IDLE_TIMEOUT_SECS: &str = "GEMINI_HTTP_POOL_IDLE_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "GEMINI_PROXY_URL";

/// Keyring service name used when the API key is not in the environment.
pub const KEYRING_SERVICE: &str = "ai-email-writer";
pub const KEYRING_USER: &str = "gemini";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 32;
const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Shortest request timeout accepted; smaller values are raised to this.
pub const MIN_TIMEOUT: Duration = Duration::from_millis(100);

/// Endpoint, credentials and HTTP knobs for the generative-language API.
#[derive(Clone)]
pub struct GeminiConfig {
    api_url: Url,
    api_key: String,
    timeout: Duration,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Duration,
    proxy_url: Option<String>,
}

impl GeminiConfig {
    /// Create a config from an endpoint URL and API key.
    ///
    /// The key is trimmed of surrounding whitespace; an empty key or an
    /// unparseable URL is rejected.
    pub fn new(api_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            api_key: normalize_api_key(api_key)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS),
            proxy_url: None,
        })
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(ENV_API_URL).ok_or_else(|| missing(ENV_API_URL))?;
        let api_key = match lookup(ENV_API_KEY) {
            Some(key) => key,
            None => keyring_api_key().ok_or_else(|| missing(ENV_API_KEY))?,
        };

        let mut config = Self::new(&api_url, &api_key)?;

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(n) = parse_var::<usize>(&lookup, ENV_POOL_MAX_IDLE_PER_HOST)? {
            config.pool_max_idle_per_host = n;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_POOL_IDLE_TIMEOUT_SECS)? {
            config.pool_idle_timeout = Duration::from_secs(secs);
        }
        if let Some(proxy) = lookup(ENV_PROXY_URL).filter(|p| !p.trim().is_empty()) {
            config = config.with_proxy(&proxy)?;
        }

        Ok(config)
    }

    /// Override the whole-request timeout. Values below [`MIN_TIMEOUT`] are
    /// raised to it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(MIN_TIMEOUT);
        self
    }

    /// Route outbound traffic through a proxy.
    ///
    /// Accepts `http`, `https`, `socks5` and `socks5h` URLs.
    pub fn with_proxy(mut self, proxy_url: &str) -> Result<Self> {
        parse_proxy_url(proxy_url)?;
        self.proxy_url = Some(proxy_url.trim().to_string());
        Ok(self)
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn pool_max_idle_per_host(&self) -> usize {
        self.pool_max_idle_per_host
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        self.pool_idle_timeout
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        Error::configuration_with_context(
            "Invalid API URL",
            ErrorContext::new()
                .with_field_path(ENV_API_URL)
                .with_details(e.to_string())
                .with_source("config"),
        )
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::configuration_with_context(
            "API URL must use http or https",
            ErrorContext::new()
                .with_field_path(ENV_API_URL)
                .with_details(format!("scheme: {}", other))
                .with_source("config"),
        )),
    }
}

fn parse_proxy_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        Error::configuration_with_context(
            "Invalid proxy URL",
            ErrorContext::new()
                .with_field_path(ENV_PROXY_URL)
                .with_details(e.to_string())
                .with_source("config"),
        )
    })?;

    match url.scheme() {
        "http" | "https" | "socks5" | "socks5h" => Ok(url),
        other => Err(Error::configuration_with_context(
            "Unsupported proxy scheme",
            ErrorContext::new()
                .with_field_path(ENV_PROXY_URL)
                .with_details(format!("scheme: {}", other))
                .with_source("config"),
        )),
    }
}

fn normalize_api_key(raw: &str) -> Result<String> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(Error::configuration_with_context(
            "API key is empty",
            ErrorContext::new()
                .with_field_path(ENV_API_KEY)
                .with_source("config"),
        ));
    }
    Ok(key.to_string())
}

fn missing(name: &str) -> Error {
    Error::configuration_with_context(
        "Required setting is not set",
        ErrorContext::new()
            .with_field_path(name)
            .with_source("config"),
    )
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            Error::configuration_with_context(
                "Invalid numeric setting",
                ErrorContext::new()
                    .with_field_path(name)
                    .with_details(e.to_string())
                    .with_source("config"),
            )
        }),
    }
}

#[cfg(feature = "keyring")]
fn keyring_api_key() -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
    entry.get_password().ok()
}

#[cfg(not(feature = "keyring"))]
fn keyring_api_key() -> Option<String> {
    None
}
