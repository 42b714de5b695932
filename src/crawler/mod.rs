//! Crawler module for warming accepted URLs
//!
//! This module contains the request-execution side of a warmup:
//! - HTTP fetching and transport error classification
//! - The bounded-concurrency crawl pool with stop-on-failure
//! - Outcome handlers and result aggregation
//! - Overall warmup coordination

mod coordinator;
mod fetcher;
mod handler;
mod pool;
mod result;

pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use fetcher::{
    build_http_client, status_in_range, CrawlResponse, Fetcher, HttpFetcher, SuccessPredicate,
    TransportError, TransportErrorKind,
};
pub use handler::{CrawlFailure, CrawlHandler, LogHandler};
pub use pool::{CrawlPool, PoolOutcome};
pub use result::{CacheWarmupResult, CrawlingResult, ResultAggregator};

use crate::config::Config;
use crate::WarmupError;

/// Runs a complete warmup from a configuration
///
/// This is the main entry point for warming caches. It will:
/// 1. Build the HTTP client, parser and fetcher
/// 2. Resolve the configured sitemaps
/// 3. Add the configured URLs
/// 4. Crawl the accepted URLs in strategy order
///
/// # Returns
///
/// * `Ok((Coordinator, CacheWarmupResult))` - The coordinator (for its
///   collected sitemaps and URLs) and the crawl result
/// * `Err(WarmupError)` - Setup failed, or a sitemap failed in strict mode
pub async fn warmup(config: &Config) -> Result<(Coordinator, CacheWarmupResult), WarmupError> {
    let mut coordinator = Coordinator::from_config(config)?;

    if !config.sitemaps.is_empty() {
        coordinator.add_sitemap_locations(&config.sitemaps).await?;
    }
    for url in &config.urls {
        coordinator.add_url_str(url)?;
    }

    coordinator.add_handler(Box::new(LogHandler::default()));
    let result = coordinator.run().await?;

    Ok((coordinator, result))
}
