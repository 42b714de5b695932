//! Crawl outcome state for a single warmed URL

use serde::Serialize;
use std::fmt;

/// Represents the outcome of requesting one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    /// The request completed and the response was classified as success
    Successful,

    /// The request failed in transport or the response was classified as failure
    Failed,
}

impl CrawlState {
    /// Returns true if this represents a successful request
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Successful)
    }

    /// Returns true if this represents a failed request
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Successful => "successful",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
