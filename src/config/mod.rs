//! Configuration module for Cache-Warmer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use cache_warmer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("warmer.toml")).unwrap();
//! println!("Warming with {} concurrent requests", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputFormat};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, read_config_with_hash,
};
pub use validation::validate;

use crate::strategy::{CrawlingStrategy, StrategyRegistry};
use crate::url::ExcludePattern;
use crate::ConfigError;

impl Config {
    /// Compiles the configured exclude patterns
    pub fn exclude_patterns(&self) -> Result<Vec<ExcludePattern>, ConfigError> {
        self.exclude.iter().map(|p| ExcludePattern::parse(p)).collect()
    }

    /// Builds the configured crawling strategy from the registry
    pub fn crawling_strategy(
        &self,
        registry: &StrategyRegistry,
    ) -> Result<CrawlingStrategy, ConfigError> {
        match &self.strategy {
            Some(name) => registry.create(name),
            None => Ok(CrawlingStrategy::None),
        }
    }
}
