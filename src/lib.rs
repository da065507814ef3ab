//! Sumi-Fetch: a reusable fetch primitive for crawlers
//!
//! This crate issues GET requests with a configurable user agent, rotates
//! through upstream proxies in round-robin order and keeps per-domain cookies
//! that can be seeded from a directory tree.

pub mod client;
pub mod config;
pub mod cookies;
pub mod proxy;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sumi-Fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Proxy list errors
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Failed to read proxy file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid proxy URL '{entry}': {source}")]
    InvalidUrl {
        entry: String,
        source: ::url::ParseError,
    },

    #[error("Unsupported proxy '{entry}': {source}")]
    Unsupported {
        entry: String,
        source: reqwest::Error,
    },
}

/// Cookie directory errors
#[derive(Debug, Error)]
pub enum CookieError {
    #[error("Failed to read cookies from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} format error at line {line}", path.display())]
    Format { path: PathBuf, line: usize },
}

/// Result type alias for Sumi-Fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{FetchClient, DEFAULT_USER_AGENT};
pub use config::{Options, TransportOptions};
pub use cookies::{Cookie, CookieStore};
pub use proxy::ProxyRotator;
pub use self::url::{domain_of, extract_domain};
