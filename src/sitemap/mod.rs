//! Sitemap discovery
//!
//! This module turns seed sitemaps into a flat, deduplicated URL set:
//! - [`XmlSitemapParser`] fetches and parses one sitemap document
//! - [`SitemapResolver`] walks sitemap indexes recursively without revisiting
//! - [`UrlCollector`] accumulates accepted, excluded and failed entries

mod collector;
mod parser;
mod resolver;
mod types;

pub use collector::UrlCollector;
pub use parser::{parse_document, parse_lastmod, SitemapParser, XmlSitemapParser};
pub use resolver::{ResolutionReport, SitemapResolver};
pub use types::{ChangeFrequency, ParserResult, Sitemap, UrlEntry, DEFAULT_PRIORITY};
