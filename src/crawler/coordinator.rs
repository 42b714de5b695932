//! Warmup coordinator - top-level orchestration
//!
//! The coordinator owns the URL collector and wires the pieces together:
//! - Resolving seed sitemaps into accepted URLs
//! - Accepting directly added URLs
//! - Ordering the accepted URLs with the configured strategy
//! - Running the crawl pool with a fresh result aggregator
//!
//! Its lifecycle is tracked by [`WarmerState`].

use crate::config::Config;
use crate::crawler::fetcher::{
    build_http_client, status_in_range, Fetcher, HttpFetcher, SuccessPredicate,
};
use crate::crawler::handler::CrawlHandler;
use crate::crawler::pool::CrawlPool;
use crate::crawler::result::{CacheWarmupResult, ResultAggregator};
use crate::sitemap::{
    ResolutionReport, Sitemap, SitemapParser, SitemapResolver, UrlCollector, UrlEntry,
    XmlSitemapParser,
};
use crate::state::WarmerState;
use crate::strategy::{CrawlingStrategy, StrategyRegistry};
use crate::url::{matches_any, ExcludePattern};
use crate::WarmupError;
use std::sync::Arc;

/// Orchestrates sitemap resolution, ordering and crawling
pub struct Coordinator {
    state: WarmerState,
    collector: UrlCollector,
    exclude: Vec<ExcludePattern>,
    strict: bool,
    strategy: CrawlingStrategy,
    parser: Arc<dyn SitemapParser>,
    pool: CrawlPool,
    handlers: Vec<Box<dyn CrawlHandler>>,
}

impl Coordinator {
    /// Starts building a coordinator around a parser and a fetcher
    pub fn builder(parser: Arc<dyn SitemapParser>, fetcher: Arc<dyn Fetcher>) -> CoordinatorBuilder {
        CoordinatorBuilder::new(parser, fetcher)
    }

    /// Creates a coordinator using HTTP collaborators built from the config
    ///
    /// Seeds listed in the config are not added; see
    /// [`add_sitemap_locations`](Self::add_sitemap_locations) and
    /// [`add_url_str`](Self::add_url_str).
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to accept seeds
    /// * `Err(WarmupError)` - Invalid patterns, strategy, headers or client setup
    pub fn from_config(config: &Config) -> Result<Self, WarmupError> {
        let client = build_http_client(&config.crawler)?;
        let parser = Arc::new(XmlSitemapParser::new(client.clone()));
        let fetcher = Arc::new(HttpFetcher::from_config(client, &config.crawler)?);
        let [low, high] = config.crawler.success_status;

        Ok(Self::builder(parser, fetcher)
            .limit(config.limit)
            .exclude(config.exclude_patterns()?)
            .strict(config.strict)
            .strategy(config.crawling_strategy(&StrategyRegistry::with_defaults())?)
            .concurrency(config.crawler.concurrency)
            .stop_on_failure(config.stop_on_failure)
            .success_predicate(status_in_range(low, high))
            .build())
    }

    /// Resolves seed sitemaps into the collector
    ///
    /// Sitemaps already resolved by an earlier call are skipped.
    ///
    /// # Returns
    ///
    /// * `Ok(ResolutionReport)` - Counters for this call
    /// * `Err(WarmupError)` - Strict mode only: the first sitemap error.
    ///   Entries collected before the failing sitemap are kept.
    pub async fn add_sitemaps(&mut self, seeds: Vec<Sitemap>) -> Result<ResolutionReport, WarmupError> {
        self.transition(WarmerState::Accumulating)?;

        let resolver = SitemapResolver::new(self.parser.as_ref(), &self.exclude, self.strict);
        let report = resolver.resolve(seeds, &mut self.collector).await?;
        Ok(report)
    }

    /// Parses sitemap locations (URLs or local paths) and resolves them
    pub async fn add_sitemap_locations<S: AsRef<str>>(
        &mut self,
        locations: &[S],
    ) -> Result<ResolutionReport, WarmupError> {
        let seeds = locations
            .iter()
            .map(|location| Sitemap::parse(location.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_sitemaps(seeds).await
    }

    /// Adds a URL directly, bypassing sitemap resolution
    ///
    /// Exclude patterns and the limit still apply.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The URL was accepted
    /// * `Ok(false)` - The URL was excluded, already known, or over the limit
    pub fn add_url(&mut self, url: UrlEntry) -> Result<bool, WarmupError> {
        self.transition(WarmerState::Accumulating)?;

        if matches_any(&self.exclude, url.key()) {
            tracing::debug!("Excluding url {}", url);
            self.collector.add_excluded_url(url);
            return Ok(false);
        }

        Ok(self.collector.add_url(url))
    }

    /// Parses and adds a URL directly
    pub fn add_url_str(&mut self, url: &str) -> Result<bool, WarmupError> {
        let url = UrlEntry::parse(url)?;
        self.add_url(url)
    }

    /// Registers an outcome handler, called after the result aggregator
    pub fn add_handler(&mut self, handler: Box<dyn CrawlHandler>) {
        self.handlers.push(handler);
    }

    /// Crawls the accepted URLs
    ///
    /// The strategy is applied to a snapshot of the accepted URLs, so running
    /// again without adding anything crawls the same set in the same order.
    /// Every call issues fresh requests and returns a fresh result.
    pub async fn run(&mut self) -> Result<CacheWarmupResult, WarmupError> {
        self.transition(WarmerState::Ready)?;

        let urls = self.strategy.apply(self.collector.accepted_urls().to_vec());
        tracing::info!(
            "Warming {} urls with strategy {}, concurrency {}",
            urls.len(),
            self.strategy,
            self.pool.concurrency()
        );

        let mut aggregator = ResultAggregator::new();
        let outcome = {
            let mut handlers: Vec<&mut dyn CrawlHandler> = Vec::with_capacity(self.handlers.len() + 1);
            handlers.push(&mut aggregator);
            handlers.extend(
                self.handlers
                    .iter_mut()
                    .map(|handler| handler.as_mut() as &mut dyn CrawlHandler),
            );
            self.pool.execute(&urls, &mut handlers).await
        };

        let result = aggregator.into_result(outcome.cancelled);
        self.transition(WarmerState::Executed)?;

        tracing::info!(
            "Warmup finished: {} successful, {} failed{}",
            result.successful().len(),
            result.failed().len(),
            if result.is_cancelled() { ", cancelled" } else { "" }
        );

        Ok(result)
    }

    fn transition(&mut self, next: WarmerState) -> Result<(), WarmupError> {
        if !self.state.can_transition_to(next) {
            return Err(WarmupError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        if self.state != next {
            tracing::trace!("Coordinator state {} -> {}", self.state, next);
        }
        self.state = next;
        Ok(())
    }

    pub fn state(&self) -> WarmerState {
        self.state
    }

    pub fn strategy(&self) -> &CrawlingStrategy {
        &self.strategy
    }

    pub fn collector(&self) -> &UrlCollector {
        &self.collector
    }

    pub fn accepted_urls(&self) -> &[UrlEntry] {
        self.collector.accepted_urls()
    }

    pub fn excluded_urls(&self) -> &[UrlEntry] {
        self.collector.excluded_urls()
    }

    pub fn accepted_sitemaps(&self) -> Vec<&Sitemap> {
        self.collector.accepted_sitemaps()
    }

    pub fn excluded_sitemaps(&self) -> Vec<&Sitemap> {
        self.collector.excluded_sitemaps()
    }

    pub fn failed_sitemaps(&self) -> Vec<&Sitemap> {
        self.collector.failed_sitemaps()
    }
}

/// Builder for [`Coordinator`]
pub struct CoordinatorBuilder {
    parser: Arc<dyn SitemapParser>,
    fetcher: Arc<dyn Fetcher>,
    limit: usize,
    exclude: Vec<ExcludePattern>,
    strict: bool,
    strategy: CrawlingStrategy,
    concurrency: usize,
    stop_on_failure: bool,
    is_success: SuccessPredicate,
}

impl CoordinatorBuilder {
    fn new(parser: Arc<dyn SitemapParser>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            parser,
            fetcher,
            limit: 0,
            exclude: Vec::new(),
            strict: false,
            strategy: CrawlingStrategy::None,
            concurrency: 5,
            stop_on_failure: false,
            is_success: status_in_range(200, 399),
        }
    }

    /// Maximum accepted URLs, `0` = unbounded
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn exclude(mut self, exclude: Vec<ExcludePattern>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn strategy(mut self, strategy: CrawlingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn stop_on_failure(mut self, stop_on_failure: bool) -> Self {
        self.stop_on_failure = stop_on_failure;
        self
    }

    pub fn success_predicate(mut self, is_success: SuccessPredicate) -> Self {
        self.is_success = is_success;
        self
    }

    pub fn build(self) -> Coordinator {
        Coordinator {
            state: WarmerState::Idle,
            collector: UrlCollector::new(self.limit),
            exclude: self.exclude,
            strict: self.strict,
            strategy: self.strategy,
            parser: self.parser,
            pool: CrawlPool::new(
                self.fetcher,
                self.is_success,
                self.concurrency,
                self.stop_on_failure,
            ),
            handlers: Vec::new(),
        }
    }
}
