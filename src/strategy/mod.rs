//! Crawling strategies
//!
//! A strategy turns the accepted URL list into the order in which URLs are
//! submitted to the crawl pool. Every strategy is a stable sort, so URLs that
//! compare equal keep their discovery order.

mod comparators;
mod registry;

pub use comparators::{
    by_change_frequency, by_last_modified, by_priority, ChangeFrequencyComparator,
    LastModifiedComparator, PriorityComparator, UrlComparator,
};
pub use registry::{StrategyConstructor, StrategyRegistry};

use crate::sitemap::UrlEntry;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Ordering applied to accepted URLs before crawling
#[derive(Clone, Default)]
pub enum CrawlingStrategy {
    /// Keep discovery order
    #[default]
    None,

    /// Highest priority first, missing priority counts as 0.5
    SortByPriority,

    /// Most recently modified first, missing dates last
    SortByLastModified,

    /// Most frequently changing first, missing frequency last
    SortByChangeFrequency,

    /// Externally supplied comparator
    Custom(Arc<dyn UrlComparator>),
}

impl CrawlingStrategy {
    /// Name under which the strategy is registered
    pub fn name(&self) -> &str {
        match self {
            Self::None => "none",
            Self::SortByPriority => "sort-by-priority",
            Self::SortByLastModified => "sort-by-lastmod",
            Self::SortByChangeFrequency => "sort-by-changefreq",
            Self::Custom(comparator) => comparator.name(),
        }
    }

    /// Compares two URLs under this strategy
    pub fn compare(&self, a: &UrlEntry, b: &UrlEntry) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::SortByPriority => by_priority(a, b),
            Self::SortByLastModified => by_last_modified(a, b),
            Self::SortByChangeFrequency => by_change_frequency(a, b),
            Self::Custom(comparator) => comparator.compare(a, b),
        }
    }

    /// Returns the URLs in crawl order
    ///
    /// The result is a permutation of the input. `sort_by` is stable, which
    /// gives ties their discovery order.
    pub fn apply(&self, mut urls: Vec<UrlEntry>) -> Vec<UrlEntry> {
        if !matches!(self, Self::None) {
            urls.sort_by(|a, b| self.compare(a, b));
        }
        urls
    }
}

impl fmt::Debug for CrawlingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(comparator) => f.debug_tuple("Custom").field(&comparator.name()).finish(),
            _ => f.write_str(self.name()),
        }
    }
}

impl fmt::Display for CrawlingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
