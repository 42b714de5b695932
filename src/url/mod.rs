//! URL handling module for Cache-Warmer
//!
//! This module provides URI normalization for warmed URLs and sitemap
//! locations, and the exclude patterns used to suppress sitemaps and URLs.

mod matcher;
mod normalize;

// Re-export main functions
pub use matcher::{matches_any, ExcludePattern, PatternKind};
pub use normalize::{normalize_sitemap_location, normalize_url};
