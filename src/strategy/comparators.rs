//! Comparators behind the built-in crawling strategies

use crate::sitemap::UrlEntry;
use std::cmp::Ordering;

/// A named ordering over URLs, the extension point for custom strategies
pub trait UrlComparator: Send + Sync {
    fn name(&self) -> &str;

    fn compare(&self, a: &UrlEntry, b: &UrlEntry) -> Ordering;
}

/// Higher effective priority first
pub fn by_priority(a: &UrlEntry, b: &UrlEntry) -> Ordering {
    b.effective_priority().total_cmp(&a.effective_priority())
}

/// Newer modification date first, undated URLs last
pub fn by_last_modified(a: &UrlEntry, b: &UrlEntry) -> Ordering {
    match (a.last_modified(), b.last_modified()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// More frequently changing first, URLs without a frequency last
pub fn by_change_frequency(a: &UrlEntry, b: &UrlEntry) -> Ordering {
    match (a.change_frequency(), b.change_frequency()) {
        (Some(a), Some(b)) => b.rank().cmp(&a.rank()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityComparator;

impl UrlComparator for PriorityComparator {
    fn name(&self) -> &str {
        "sort-by-priority"
    }

    fn compare(&self, a: &UrlEntry, b: &UrlEntry) -> Ordering {
        by_priority(a, b)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LastModifiedComparator;

impl UrlComparator for LastModifiedComparator {
    fn name(&self) -> &str {
        "sort-by-lastmod"
    }

    fn compare(&self, a: &UrlEntry, b: &UrlEntry) -> Ordering {
        by_last_modified(a, b)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeFrequencyComparator;

impl UrlComparator for ChangeFrequencyComparator {
    fn name(&self) -> &str {
        "sort-by-changefreq"
    }

    fn compare(&self, a: &UrlEntry, b: &UrlEntry) -> Ordering {
        by_change_frequency(a, b)
    }
}
