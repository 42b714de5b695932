//! Outcome handlers invoked by the crawl pool
//!
//! Every completed request is routed to each registered handler exactly
//! once, in registration order. Handlers run on the pool's control loop and
//! receive `&mut self`, so they need no locking of their own but must not
//! block.

use crate::crawler::fetcher::{CrawlResponse, TransportError};
use crate::sitemap::UrlEntry;
use thiserror::Error;

/// Why a warmup request counts as failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrawlFailure {
    /// No HTTP response was received
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// A response arrived but the success predicate rejected it
    #[error("unexpected HTTP status {}", .response.status)]
    UnexpectedStatus { response: CrawlResponse },
}

impl CrawlFailure {
    /// The rejected response, if one was received
    pub fn response(&self) -> Option<&CrawlResponse> {
        match self {
            Self::Transport(_) => None,
            Self::UnexpectedStatus { response } => Some(response),
        }
    }
}

/// Receives the outcome of every completed warmup request
pub trait CrawlHandler: Send {
    /// Called once before a batch of `total` URLs is submitted
    fn on_start(&mut self, _total: usize) {}

    fn on_success(&mut self, response: &CrawlResponse, url: &UrlEntry);

    fn on_failure(&mut self, failure: &CrawlFailure, url: &UrlEntry);
}

/// Handler logging each outcome with a running counter
#[derive(Debug, Clone, Default)]
pub struct LogHandler {
    total: usize,
    completed: usize,
}

impl LogHandler {
    /// Creates a handler for a batch of `total` URLs (`0` if unknown)
    ///
    /// The total and counter are reset at the start of every batch.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    fn progress(&mut self) -> String {
        self.completed += 1;
        if self.total > 0 {
            format!("[{}/{}]", self.completed, self.total)
        } else {
            format!("[{}]", self.completed)
        }
    }
}

impl CrawlHandler for LogHandler {
    fn on_start(&mut self, total: usize) {
        self.total = total;
        self.completed = 0;
    }

    fn on_success(&mut self, response: &CrawlResponse, url: &UrlEntry) {
        let progress = self.progress();
        tracing::info!(
            "{} Warmed {} ({}, {}ms)",
            progress,
            url,
            response.status,
            response.elapsed_ms
        );
    }

    fn on_failure(&mut self, failure: &CrawlFailure, url: &UrlEntry) {
        let progress = self.progress();
        tracing::warn!("{} Failed to warm {}: {}", progress, url, failure);
    }
}
