//! HTTP fetcher implementation
//!
//! This module handles the warmup requests themselves:
//! - Building the HTTP client with user agent, timeout and redirect policy
//! - Sending one request per URL with the configured method and headers
//! - Classifying transport errors
//!
//! Whether a response counts as a success is decided by a separate
//! [`SuccessPredicate`], not by the fetcher.

use crate::config::CrawlerConfig;
use crate::sitemap::UrlEntry;
use crate::ConfigError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect::Policy, Client, Method};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Response to a single warmup request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlResponse {
    /// HTTP status code
    pub status: u16,

    /// Final URL after redirects
    pub final_url: String,

    /// Time until the response headers (and body, if kept) arrived
    pub elapsed_ms: u64,

    /// Response body, only kept when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl CrawlResponse {
    pub fn new(status: u16, final_url: impl Into<String>) -> Self {
        Self {
            status,
            final_url: final_url.into(),
            elapsed_ms: 0,
            body: None,
        }
    }
}

/// Category of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Redirect,
    Body,
    Request,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connection failed",
            Self::Redirect => "redirect error",
            Self::Body => "body error",
            Self::Request => "request error",
        };
        f.write_str(name)
    }
}

/// A request that produced no HTTP response
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if e.is_connect() {
            TransportErrorKind::Connect
        } else if e.is_redirect() {
            TransportErrorKind::Redirect
        } else if e.is_body() || e.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, e.to_string())
    }
}

/// Sends the warmup request for one URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &UrlEntry) -> Result<CrawlResponse, TransportError>;
}

/// Decides whether a response counts as a successful warmup
pub type SuccessPredicate = Arc<dyn Fn(&CrawlResponse) -> bool + Send + Sync>;

/// Success predicate accepting statuses within `low..=high`
pub fn status_in_range(low: u16, high: u16) -> SuccessPredicate {
    Arc::new(move |response: &CrawlResponse| (low..=high).contains(&response.status))
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use cache_warmer::config::CrawlerConfig;
/// use cache_warmer::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(config.timeout.min(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    method: Method,
    headers: HeaderMap,
    keep_body: bool,
}

impl HttpFetcher {
    /// Creates a fetcher sending plain `HEAD` requests
    pub fn new(client: Client) -> Self {
        Self {
            client,
            method: Method::HEAD,
            headers: HeaderMap::new(),
            keep_body: false,
        }
    }

    /// Creates a fetcher from the crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Fetcher using the configured method and headers
    /// * `Err(ConfigError)` - The method or a header is not valid HTTP
    pub fn from_config(client: Client, config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let method = config
            .request_method
            .to_uppercase()
            .parse::<Method>()
            .map_err(|e| ConfigError::Validation(format!("invalid request-method: {}", e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfigError::Validation(format!("invalid header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ConfigError::Validation(format!("invalid value for header '{}': {}", name, e))
            })?;
            headers.insert(name, value);
        }

        Ok(Self {
            client,
            method,
            headers,
            keep_body: config.keep_response_body,
        })
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_keep_body(mut self, keep_body: bool) -> Self {
        self.keep_body = keep_body;
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &UrlEntry) -> Result<CrawlResponse, TransportError> {
        let started = Instant::now();

        let mut response = self
            .client
            .request(self.method.clone(), url.uri().clone())
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        // Reading the body forces the full response through intermediate caches
        let body = if self.keep_body {
            Some(response.text().await?)
        } else {
            while response.chunk().await?.is_some() {}
            None
        };

        Ok(CrawlResponse {
            status,
            final_url,
            elapsed_ms: started.elapsed().as_millis() as u64,
            body,
        })
    }
}
