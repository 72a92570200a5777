use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_UPSTREAM_URL: &str = "http://20.244.56.144/test";

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Invalid upstream base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Cache capacity cannot be 0")]
    InvalidCacheCapacity,

    #[error("Cache TTL cannot be 0")]
    InvalidCacheTtl,

    #[error("API prefix must start with '/' and name a path: {0}")]
    InvalidApiPrefix(String),
}

/// Network listener configuration
#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct UpstreamConfig {
    /// Base URL the `/companies/...` paths are appended to.
    pub base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            base_url: DEFAULT_UPSTREAM_URL.into(),
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of cached products.
    pub capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: 100,
            ttl_secs: 60,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Path the product routes are nested under, e.g. `/api`.
    #[serde(default)]
    pub api_prefix: Option<String>,
    /// Include the error source chain in error responses. Keep off in production.
    #[serde(default)]
    pub expose_error_details: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.listener.port == 0 {
            return Err(ValidationError::InvalidPort);
        }

        Url::parse(&self.upstream.base_url).map_err(|e| ValidationError::InvalidBaseUrl {
            url: self.upstream.base_url.clone(),
            reason: e.to_string(),
        })?;

        if self.cache.capacity == 0 {
            return Err(ValidationError::InvalidCacheCapacity);
        }
        if self.cache.ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }

        if let Some(prefix) = &self.api_prefix
            && (!prefix.starts_with('/') || prefix == "/")
        {
            return Err(ValidationError::InvalidApiPrefix(prefix.clone()));
        }

        Ok(())
    }

    /// Applies a listening port taken from the environment (`PORT`).
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<Self, std::num::ParseIntError> {
        if let Some(port) = port {
            self.listener.port = port.trim().parse()?;
        }
        Ok(self)
    }
}
