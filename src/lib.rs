//! Cache-Warmer: sitemap-driven cache warming
//!
//! This crate resolves XML sitemaps (and any sitemap indexes they reference)
//! into a flat set of URLs, orders them with a crawling strategy and requests
//! each one with bounded concurrency so downstream caches get populated.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod state;
pub mod strategy;
pub mod url;

use thiserror::Error;

/// Main error type for Cache-Warmer operations
#[derive(Debug, Error)]
pub enum WarmupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::WarmerState,
        to: state::WarmerState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid exclude pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown crawling strategy: {0}")]
    UnknownStrategy(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Errors raised while fetching or parsing a single sitemap
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to fetch sitemap {uri}: {message}")]
    FetchFailed { uri: String, message: String },

    #[error("Malformed sitemap {uri}: {message}")]
    Malformed { uri: String, message: String },

    #[error("Invalid entry in sitemap {uri}: {message}")]
    EntryInvalid { uri: String, message: String },
}

impl SitemapError {
    /// The URI of the sitemap this error belongs to
    pub fn uri(&self) -> &str {
        match self {
            Self::FetchFailed { uri, .. }
            | Self::Malformed { uri, .. }
            | Self::EntryInvalid { uri, .. } => uri,
        }
    }
}

/// Result type alias for Cache-Warmer operations
pub type Result<T> = std::result::Result<T, WarmupError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CacheWarmupResult, Coordinator, CrawlingResult};
pub use sitemap::{ChangeFrequency, Sitemap, UrlEntry};
pub use state::{CrawlState, WarmerState};
pub use strategy::CrawlingStrategy;
pub use url::{normalize_url, ExcludePattern};
