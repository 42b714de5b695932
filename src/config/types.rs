use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main configuration structure for Cache-Warmer
///
/// Every field is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Seed sitemaps: `http(s)://` URLs, `file://` URLs or local paths
    pub sitemaps: Vec<String>,

    /// URLs warmed directly, without going through a sitemap
    pub urls: Vec<String>,

    /// Maximum number of accepted URLs, `0` = unbounded
    pub limit: usize,

    /// Exclude patterns, globs unless wrapped in `#...#`
    pub exclude: Vec<String>,

    /// Name of the crawling strategy, discovery order when missing
    pub strategy: Option<String>,

    /// Abort on the first sitemap error
    pub strict: bool,

    /// Stop submitting new requests after the first failed one
    #[serde(rename = "stop-on-failure")]
    pub stop_on_failure: bool,

    /// Format of the final report
    pub format: OutputFormat,

    pub crawler: CrawlerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sitemaps: Vec::new(),
            urls: Vec::new(),
            limit: 0,
            exclude: Vec::new(),
            strategy: None,
            strict: false,
            stop_on_failure: false,
            format: OutputFormat::Text,
            crawler: CrawlerConfig::default(),
        }
    }
}

/// Request execution configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of requests in flight
    pub concurrency: usize,

    /// HTTP method used to warm each URL
    #[serde(rename = "request-method")]
    pub request_method: String,

    /// Per-request timeout (seconds)
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Inclusive range of status codes counted as success
    #[serde(rename = "success-status")]
    pub success_status: [u16; 2],

    /// Keep response bodies in the crawl results
    #[serde(rename = "keep-response-body")]
    pub keep_response_body: bool,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            request_method: "HEAD".to_string(),
            timeout: 30,
            user_agent: format!("cache-warmer/{}", env!("CARGO_PKG_VERSION")),
            success_status: [200, 399],
            keep_response_body: false,
            headers: BTreeMap::new(),
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
