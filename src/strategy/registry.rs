//! Name to strategy lookup used by the configuration layer

use crate::strategy::CrawlingStrategy;
use crate::ConfigError;
use std::collections::BTreeMap;

/// Builds a strategy instance
pub type StrategyConstructor = fn() -> CrawlingStrategy;

/// Registry of crawling strategies selectable by name
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    constructors: BTreeMap<String, StrategyConstructor>,
}

impl StrategyRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Creates a registry with the built-in strategies
    ///
    /// Registered names: `none`, `sort-by-priority`, `sort-by-lastmod` and
    /// `sort-by-changefreq`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("none", || CrawlingStrategy::None);
        registry.register("sort-by-priority", || CrawlingStrategy::SortByPriority);
        registry.register("sort-by-lastmod", || CrawlingStrategy::SortByLastModified);
        registry.register("sort-by-changefreq", || CrawlingStrategy::SortByChangeFrequency);
        registry
    }

    /// Registers a strategy, replacing any previous one with the same name
    pub fn register(&mut self, name: &str, constructor: StrategyConstructor) {
        self.constructors.insert(name.to_lowercase(), constructor);
    }

    /// Creates the strategy registered under `name` (case-insensitive)
    pub fn create(&self, name: &str) -> Result<CrawlingStrategy, ConfigError> {
        self.constructors
            .get(&name.trim().to_lowercase())
            .map(|constructor| constructor())
            .ok_or_else(|| ConfigError::UnknownStrategy(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(&name.trim().to_lowercase())
    }

    /// Registered names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
