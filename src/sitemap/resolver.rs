//! Recursive, cycle-safe sitemap resolution
//!
//! Sitemaps are processed one at a time from a FIFO work queue. Each one is
//! parsed, then its child sitemaps and its URLs are folded into the
//! [`UrlCollector`] in document order. A sitemap key is resolved at most
//! once: self references, cycles and duplicates are dropped silently.

use crate::sitemap::collector::UrlCollector;
use crate::sitemap::parser::SitemapParser;
use crate::sitemap::types::{ParserResult, Sitemap};
use crate::url::{matches_any, ExcludePattern};
use crate::SitemapError;
use std::collections::{HashSet, VecDeque};

/// Counters describing one resolver invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Sitemaps parsed successfully
    pub resolved: usize,

    /// Sitemaps that failed to fetch or parse (non-strict mode only)
    pub failed: usize,

    /// Sitemaps and URLs suppressed by exclude patterns
    pub excluded: usize,

    /// URLs accepted into the collector
    pub accepted_urls: usize,

    /// URLs dropped because the limit was reached
    pub dropped_urls: usize,
}

/// Walks sitemaps and the sitemap indexes they reference
pub struct SitemapResolver<'a> {
    parser: &'a dyn SitemapParser,
    exclude: &'a [ExcludePattern],
    strict: bool,
}

impl<'a> SitemapResolver<'a> {
    /// Creates a resolver
    ///
    /// # Arguments
    ///
    /// * `parser` - Fetches and parses one sitemap
    /// * `exclude` - Patterns suppressing sitemaps and URLs
    /// * `strict` - Abort on the first sitemap error instead of recording it
    pub fn new(parser: &'a dyn SitemapParser, exclude: &'a [ExcludePattern], strict: bool) -> Self {
        Self {
            parser,
            exclude,
            strict,
        }
    }

    /// Resolves the seed sitemaps into the collector
    ///
    /// # Returns
    ///
    /// * `Ok(ResolutionReport)` - All reachable sitemaps were processed
    /// * `Err(SitemapError)` - Strict mode only: the first sitemap error.
    ///   Anything collected before the failing sitemap stays in the
    ///   collector; the failing sitemap itself is not recorded.
    pub async fn resolve(
        &self,
        seeds: Vec<Sitemap>,
        collector: &mut UrlCollector,
    ) -> Result<ResolutionReport, SitemapError> {
        let mut report = ResolutionReport::default();
        // Keys that were queued or processed during this invocation
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<Sitemap> = VecDeque::new();

        for seed in seeds {
            self.enqueue(seed, &mut visited, &mut queue, collector, &mut report);
        }

        while let Some(sitemap) = queue.pop_front() {
            tracing::debug!("Resolving sitemap {}", sitemap);

            let result = match self.parser.parse(&sitemap).await {
                Ok(result) => result,
                Err(e) if self.strict => {
                    tracing::error!("Sitemap {} failed in strict mode: {}", sitemap, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("Skipping sitemap {}: {}", sitemap, e);
                    collector.add_failed_sitemap(sitemap);
                    report.failed += 1;
                    continue;
                }
            };

            collector.add_sitemap(sitemap.clone());
            report.resolved += 1;

            self.fold(&sitemap, result, &mut visited, &mut queue, collector, &mut report);
        }

        tracing::info!(
            "Resolved {} sitemaps ({} failed), accepted {} urls, excluded {}, dropped {} over limit",
            report.resolved,
            report.failed,
            report.accepted_urls,
            report.excluded,
            report.dropped_urls
        );

        Ok(report)
    }

    /// Folds one parser result into the queue and the collector
    fn fold(
        &self,
        parent: &Sitemap,
        result: ParserResult,
        visited: &mut HashSet<String>,
        queue: &mut VecDeque<Sitemap>,
        collector: &mut UrlCollector,
        report: &mut ResolutionReport,
    ) {
        for child in result.sitemaps {
            self.enqueue(child.with_origin(parent), visited, queue, collector, report);
        }

        for url in result.urls {
            let url = url.with_origin(parent);

            if matches_any(self.exclude, url.key()) {
                tracing::debug!("Excluding url {}", url);
                if collector.add_excluded_url(url) {
                    report.excluded += 1;
                }
            } else if collector.is_limit_reached() {
                tracing::trace!("Limit reached, dropping url {}", url);
                report.dropped_urls += 1;
            } else if collector.add_url(url) {
                report.accepted_urls += 1;
            }
        }
    }

    /// Queues a sitemap unless it is already known or excluded
    fn enqueue(
        &self,
        sitemap: Sitemap,
        visited: &mut HashSet<String>,
        queue: &mut VecDeque<Sitemap>,
        collector: &mut UrlCollector,
        report: &mut ResolutionReport,
    ) {
        let key = sitemap.key();

        if visited.contains(key) || collector.contains_sitemap(key) {
            tracing::trace!("Sitemap {} already resolved, skipping", key);
            return;
        }
        visited.insert(key.to_string());

        if matches_any(self.exclude, key) {
            tracing::debug!("Excluding sitemap {}", key);
            collector.add_excluded_sitemap(sitemap);
            report.excluded += 1;
            return;
        }

        queue.push_back(sitemap);
    }
}
