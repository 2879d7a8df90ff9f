//! Client and per-call configuration.
//!
//! `ClientConfig` is fixed for the lifetime of an `ApiClient` and carries the
//! backend origin. `RequestConfig` describes a single call: method, extra
//! headers and an optional body.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;
use crate::http::HttpMethod;

/// Origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

pub const BASE_URL_ENV: &str = "SPYCAT_API_URL";
pub const TIMEOUT_ENV: &str = "SPYCAT_API_TIMEOUT_SECS";

/// Settings injected into an `ApiClient` at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Upper bound on a whole call. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load from `SPYCAT_API_URL` and `SPYCAT_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, RequestError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RequestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(BASE_URL_ENV) {
            Some(url) => Self::new(url.trim()),
            None => Self::default(),
        };
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                RequestError::configuration(format!("{TIMEOUT_ENV} must be whole seconds, got {raw:?}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.base_url.is_empty() {
            return Err(RequestError::configuration("base URL must not be empty"));
        }
        Ok(())
    }
}

/// Payload of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Already-serialized text, sent unchanged.
    Text(String),
    /// A structured value, serialized to JSON text before sending.
    Json(Value),
}

impl Body {
    pub fn into_text(self) -> Result<String, RequestError> {
        match self {
            Body::Text(text) => Ok(text),
            Body::Json(value) => serde_json::to_string(&value)
                .map_err(|e| RequestError::configuration(format!("body is not serializable: {e}"))),
        }
    }
}

/// Per-call method, headers and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Body>,
}

impl RequestConfig {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    /// Set a header, replacing any earlier value whose name differs only in case.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// Attach any serializable record as a JSON body.
    pub fn json_from<T: Serialize>(self, body: &T) -> Result<Self, RequestError> {
        let value = serde_json::to_value(body)
            .map_err(|e| RequestError::configuration(format!("body is not serializable: {e}")))?;
        Ok(self.json(value))
    }
}
