//! Per-URL crawl results and their aggregation

use crate::crawler::fetcher::CrawlResponse;
use crate::crawler::handler::{CrawlFailure, CrawlHandler};
use crate::sitemap::UrlEntry;
use crate::state::CrawlState;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Outcome of warming a single URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlingResult {
    state: CrawlState,
    url: UrlEntry,
    data: HashMap<String, Value>,
}

impl CrawlingResult {
    pub fn new(state: CrawlState, url: UrlEntry, data: HashMap<String, Value>) -> Self {
        Self { state, url, data }
    }

    pub fn successful(url: UrlEntry, data: HashMap<String, Value>) -> Self {
        Self::new(CrawlState::Successful, url, data)
    }

    pub fn failed(url: UrlEntry, data: HashMap<String, Value>) -> Self {
        Self::new(CrawlState::Failed, url, data)
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn url(&self) -> &UrlEntry {
        &self.url
    }

    /// Auxiliary data attached by the handler that produced this result
    pub fn data(&self) -> &HashMap<String, Value> {
        &self.data
    }

    pub fn is_successful(&self) -> bool {
        self.state.is_success()
    }
}

/// Accumulated outcome of one crawl run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheWarmupResult {
    successful: Vec<CrawlingResult>,
    failed: Vec<CrawlingResult>,
    cancelled: bool,
}

impl CacheWarmupResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to the list matching its state
    pub fn add(&mut self, result: CrawlingResult) {
        match result.state() {
            CrawlState::Successful => self.successful.push(result),
            CrawlState::Failed => self.failed.push(result),
        }
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub fn successful(&self) -> &[CrawlingResult] {
        &self.successful
    }

    pub fn failed(&self) -> &[CrawlingResult] {
        &self.failed
    }

    /// True if the run stopped submitting requests after a failure
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// True if every submitted URL was warmed and nothing was cancelled
    pub fn is_successful(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    /// Number of URLs that produced a result
    pub fn len(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handler folding every outcome into a [`CacheWarmupResult`]
#[derive(Debug, Default)]
pub struct ResultAggregator {
    result: CacheWarmupResult,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finishes aggregation, copying the pool's cancelled flag onto the result
    pub fn into_result(mut self, cancelled: bool) -> CacheWarmupResult {
        self.result.set_cancelled(cancelled);
        self.result
    }
}

impl CrawlHandler for ResultAggregator {
    fn on_success(&mut self, response: &CrawlResponse, url: &UrlEntry) {
        let data = HashMap::from([("response".to_string(), json!(response))]);
        self.result
            .add(CrawlingResult::successful(url.clone(), data));
    }

    fn on_failure(&mut self, failure: &CrawlFailure, url: &UrlEntry) {
        let mut data = HashMap::from([("error".to_string(), json!(failure.to_string()))]);
        match failure {
            CrawlFailure::Transport(error) => {
                data.insert("transport".to_string(), json!(error));
            }
            CrawlFailure::UnexpectedStatus { response } => {
                data.insert("response".to_string(), json!(response));
            }
        }
        self.result.add(CrawlingResult::failed(url.clone(), data));
    }
}
