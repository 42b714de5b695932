//! Append-only accumulator for resolution results

use crate::sitemap::types::{Sitemap, UrlEntry};
use std::collections::{HashMap, HashSet};

/// Collects accepted, excluded and failed sitemaps and URLs
///
/// Every recorded sitemap is stored once in a registry keyed by its
/// normalized URI; the three sitemap lists hold keys into that registry.
/// URLs are deduplicated across the accepted and excluded lists, and the
/// accepted list never grows past the configured limit (`0` = unbounded).
#[derive(Debug, Clone, Default)]
pub struct UrlCollector {
    limit: usize,
    registry: HashMap<String, Sitemap>,
    accepted_sitemaps: Vec<String>,
    excluded_sitemaps: Vec<String>,
    failed_sitemaps: Vec<String>,
    accepted_urls: Vec<UrlEntry>,
    excluded_urls: Vec<UrlEntry>,
    known_urls: HashSet<String>,
}

impl UrlCollector {
    /// Creates a collector accepting at most `limit` URLs (`0` = unbounded)
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Accepts a URL
    ///
    /// This is a no-op returning `false` if the URL is already known or the
    /// limit has been reached.
    pub fn add_url(&mut self, url: UrlEntry) -> bool {
        if self.is_limit_reached() || self.known_urls.contains(url.key()) {
            return false;
        }

        self.known_urls.insert(url.key().to_string());
        self.accepted_urls.push(url);
        true
    }

    /// Records a URL suppressed by an exclude pattern
    pub fn add_excluded_url(&mut self, url: UrlEntry) -> bool {
        if self.known_urls.contains(url.key()) {
            return false;
        }

        self.known_urls.insert(url.key().to_string());
        self.excluded_urls.push(url);
        true
    }

    /// Records a successfully resolved sitemap
    pub fn add_sitemap(&mut self, sitemap: Sitemap) {
        let key = self.register(sitemap);
        self.accepted_sitemaps.push(key);
    }

    /// Records a sitemap suppressed by an exclude pattern
    pub fn add_excluded_sitemap(&mut self, sitemap: Sitemap) {
        let key = self.register(sitemap);
        self.excluded_sitemaps.push(key);
    }

    /// Records a sitemap that could not be fetched or parsed
    pub fn add_failed_sitemap(&mut self, sitemap: Sitemap) {
        let key = self.register(sitemap);
        self.failed_sitemaps.push(key);
    }

    fn register(&mut self, sitemap: Sitemap) -> String {
        let key = sitemap.key().to_string();
        self.registry.insert(key.clone(), sitemap);
        key
    }

    /// Returns true if a sitemap with this key has been recorded in any list
    pub fn contains_sitemap(&self, key: &str) -> bool {
        self.registry.contains_key(key)
    }

    /// Returns true if a URL with this key has been accepted or excluded
    pub fn contains_url(&self, key: &str) -> bool {
        self.known_urls.contains(key)
    }

    /// Looks up a recorded sitemap by key
    pub fn sitemap(&self, key: &str) -> Option<&Sitemap> {
        self.registry.get(key)
    }

    /// Follows origin links up to the root sitemap
    ///
    /// Stops at the last sitemap whose origin is still recorded.
    pub fn root_of<'a>(&'a self, sitemap: &'a Sitemap) -> &'a Sitemap {
        let mut current = sitemap;
        // Origins only point at sitemaps resolved earlier, the bound
        // guards against hand-built cyclic input
        for _ in 0..=self.registry.len() {
            match current.origin().and_then(|key| self.registry.get(key)) {
                Some(parent) if parent.key() != current.key() => current = parent,
                _ => break,
            }
        }
        current
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns true if no more URLs can be accepted
    pub fn is_limit_reached(&self) -> bool {
        self.limit > 0 && self.accepted_urls.len() >= self.limit
    }

    /// Number of URLs that can still be accepted, `None` if unbounded
    pub fn remaining_capacity(&self) -> Option<usize> {
        if self.limit == 0 {
            None
        } else {
            Some(self.limit.saturating_sub(self.accepted_urls.len()))
        }
    }

    pub fn accepted_urls(&self) -> &[UrlEntry] {
        &self.accepted_urls
    }

    pub fn excluded_urls(&self) -> &[UrlEntry] {
        &self.excluded_urls
    }

    pub fn accepted_sitemaps(&self) -> Vec<&Sitemap> {
        self.resolve_keys(&self.accepted_sitemaps)
    }

    pub fn excluded_sitemaps(&self) -> Vec<&Sitemap> {
        self.resolve_keys(&self.excluded_sitemaps)
    }

    pub fn failed_sitemaps(&self) -> Vec<&Sitemap> {
        self.resolve_keys(&self.failed_sitemaps)
    }

    fn resolve_keys(&self, keys: &[String]) -> Vec<&Sitemap> {
        keys.iter()
            .filter_map(|key| self.registry.get(key))
            .collect()
    }
}
