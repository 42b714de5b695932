//! Bounded-concurrency request execution
//!
//! The pool keeps a sliding window of at most `concurrency` requests in
//! flight. Requests are submitted strictly in list order; each completion
//! is classified, routed to every handler, and (unless the batch has been
//! cancelled) followed by the next submission.
//!
//! All futures are polled from the caller's task, so the window bookkeeping
//! and the handlers run on a single control loop.

use crate::crawler::fetcher::{CrawlResponse, Fetcher, SuccessPredicate, TransportError};
use crate::crawler::handler::{CrawlFailure, CrawlHandler};
use crate::sitemap::UrlEntry;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::Arc;

/// Counters describing one pool execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolOutcome {
    /// Requests started
    pub submitted: usize,

    /// Requests that completed and were routed to the handlers
    pub completed: usize,

    /// Requests classified as failures
    pub failed: usize,

    /// Set once a failure stopped further submissions
    pub cancelled: bool,
}

/// Executes warmup requests with bounded parallelism
pub struct CrawlPool {
    fetcher: Arc<dyn Fetcher>,
    is_success: SuccessPredicate,
    concurrency: usize,
    stop_on_failure: bool,
}

impl CrawlPool {
    /// Creates a pool
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Sends the request for one URL
    /// * `is_success` - Classifies received responses
    /// * `concurrency` - Maximum requests in flight, values below 1 act as 1
    /// * `stop_on_failure` - Stop submitting after the first failure
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        is_success: SuccessPredicate,
        concurrency: usize,
        stop_on_failure: bool,
    ) -> Self {
        Self {
            fetcher,
            is_success,
            concurrency: concurrency.max(1),
            stop_on_failure,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn stop_on_failure(&self) -> bool {
        self.stop_on_failure
    }

    /// Requests every URL in order and routes each outcome to the handlers
    ///
    /// Returns once nothing is in flight and either the list is exhausted or
    /// the batch was cancelled. Cancellation never aborts requests already in
    /// flight; they complete and reach the handlers like any other.
    pub async fn execute(
        &self,
        urls: &[UrlEntry],
        handlers: &mut [&mut dyn CrawlHandler],
    ) -> PoolOutcome {
        let mut outcome = PoolOutcome::default();
        let mut pending = urls.iter();
        let mut in_flight = FuturesUnordered::new();

        for handler in handlers.iter_mut() {
            handler.on_start(urls.len());
        }

        for url in pending.by_ref().take(self.concurrency) {
            in_flight.push(self.submit(url));
            outcome.submitted += 1;
        }

        while let Some((url, result)) = in_flight.next().await {
            outcome.completed += 1;

            match self.classify(result) {
                Ok(response) => {
                    for handler in handlers.iter_mut() {
                        handler.on_success(&response, url);
                    }
                }
                Err(failure) => {
                    outcome.failed += 1;
                    for handler in handlers.iter_mut() {
                        handler.on_failure(&failure, url);
                    }

                    if self.stop_on_failure && !outcome.cancelled {
                        outcome.cancelled = true;
                        tracing::warn!(
                            "Stopping after failure on {}, {} requests still in flight, {} not submitted",
                            url,
                            in_flight.len(),
                            pending.len()
                        );
                    }
                }
            }

            if !outcome.cancelled {
                if let Some(next) = pending.next() {
                    in_flight.push(self.submit(next));
                    outcome.submitted += 1;
                }
            }
        }

        tracing::debug!(
            "Pool finished: {} submitted, {} completed, {} failed{}",
            outcome.submitted,
            outcome.completed,
            outcome.failed,
            if outcome.cancelled { ", cancelled" } else { "" }
        );

        outcome
    }

    fn submit<'a>(
        &self,
        url: &'a UrlEntry,
    ) -> impl Future<Output = (&'a UrlEntry, Result<CrawlResponse, TransportError>)> + 'a {
        let fetcher = Arc::clone(&self.fetcher);
        tracing::trace!("Submitting {}", url);
        async move {
            let result = fetcher.fetch(url).await;
            (url, result)
        }
    }

    fn classify(
        &self,
        result: Result<CrawlResponse, TransportError>,
    ) -> Result<CrawlResponse, CrawlFailure> {
        let response = result?;
        if (self.is_success)(&response) {
            Ok(response)
        } else {
            Err(CrawlFailure::UnexpectedStatus { response })
        }
    }
}
