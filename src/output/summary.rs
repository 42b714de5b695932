//! Counters describing a finished warmup

use crate::crawler::CacheWarmupResult;
use crate::sitemap::{Sitemap, UrlCollector};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A URL whose warmup request failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedUrl {
    pub url: String,
    pub error: String,
}

/// Summary statistics for a warmup run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WarmupSummary {
    // Run metadata
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,

    // Resolution
    pub sitemaps_accepted: usize,
    pub sitemaps_excluded: usize,
    pub sitemaps_failed: usize,
    pub urls_accepted: usize,
    pub urls_excluded: usize,

    // Crawl
    pub urls_successful: usize,
    pub urls_failed: usize,
    pub cancelled: bool,

    // Details
    pub failed_sitemaps: Vec<String>,
    pub failed_urls: Vec<FailedUrl>,
}

impl WarmupSummary {
    /// Builds a summary from the collected entries and the crawl result
    pub fn new(collector: &UrlCollector, result: &CacheWarmupResult) -> Self {
        let failed_urls = result
            .failed()
            .iter()
            .map(|failed| FailedUrl {
                url: failed.url().key().to_string(),
                error: failed
                    .data()
                    .get("error")
                    .and_then(|error| error.as_str())
                    .unwrap_or("unknown error")
                    .to_string(),
            })
            .collect();

        Self {
            sitemaps_accepted: collector.accepted_sitemaps().len(),
            sitemaps_excluded: collector.excluded_sitemaps().len(),
            sitemaps_failed: collector.failed_sitemaps().len(),
            urls_accepted: collector.accepted_urls().len(),
            urls_excluded: collector.excluded_urls().len(),
            urls_successful: result.successful().len(),
            urls_failed: result.failed().len(),
            cancelled: result.is_cancelled(),
            failed_sitemaps: collector
                .failed_sitemaps()
                .into_iter()
                .map(Sitemap::to_string)
                .collect(),
            failed_urls,
            ..Self::default()
        }
    }

    /// Records when the run started and finished
    pub fn with_timing(mut self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self.finished_at = Some(finished_at);
        self.duration_ms = Some((finished_at - started_at).num_milliseconds());
        self
    }

    pub fn with_config_hash(mut self, config_hash: Option<String>) -> Self {
        self.config_hash = config_hash;
        self
    }

    /// Number of URLs that were actually requested
    pub fn urls_crawled(&self) -> usize {
        self.urls_successful + self.urls_failed
    }

    /// Accepted URLs never requested because the run was cancelled
    pub fn urls_skipped(&self) -> usize {
        self.urls_accepted.saturating_sub(self.urls_crawled())
    }

    /// Calculates the success rate as a percentage of crawled URLs
    pub fn success_rate(&self) -> f64 {
        if self.urls_crawled() == 0 {
            return 0.0;
        }
        (self.urls_successful as f64 / self.urls_crawled() as f64) * 100.0
    }

    /// True if any sitemap or crawl failed, or the run was cancelled
    pub fn has_failures(&self) -> bool {
        self.sitemaps_failed > 0 || self.urls_failed > 0 || self.cancelled
    }
}
