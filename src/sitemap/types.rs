//! Sitemap and URL data model
//!
//! Both types are identified by their normalized URI. A sitemap's origin is
//! stored as the key of the sitemap that listed it rather than as a nested
//! value, so the origin graph can be walked through the
//! [`UrlCollector`](super::UrlCollector) registry.

use crate::url::{normalize_sitemap_location, normalize_url};
use crate::UrlError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Priority assumed for URLs that do not declare one
pub const DEFAULT_PRIORITY: f64 = 0.5;

/// How frequently a page is likely to change, as declared in `<changefreq>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Rank used for ordering, higher values change more often
    pub fn rank(&self) -> u8 {
        match self {
            Self::Always => 6,
            Self::Hourly => 5,
            Self::Daily => 4,
            Self::Weekly => 3,
            Self::Monthly => 2,
            Self::Yearly => 1,
            Self::Never => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            other => Err(format!("Unknown change frequency: {}", other)),
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sitemap (or sitemap index) discovered during resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sitemap {
    uri: Url,
    last_modified: Option<DateTime<Utc>>,
    origin: Option<String>,
}

impl Sitemap {
    /// Creates a root sitemap from an already normalized URI
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            last_modified: None,
            origin: None,
        }
    }

    /// Creates a root sitemap from a URL or local file path
    ///
    /// # Examples
    ///
    /// ```
    /// use cache_warmer::sitemap::Sitemap;
    ///
    /// let sitemap = Sitemap::parse("https://Example.com/sitemap.xml").unwrap();
    /// assert_eq!(sitemap.key(), "https://example.com/sitemap.xml");
    /// assert!(sitemap.is_root());
    /// ```
    pub fn parse(location: &str) -> Result<Self, UrlError> {
        Ok(Self::new(normalize_sitemap_location(location)?))
    }

    pub fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Records the sitemap that listed this one
    pub fn with_origin(mut self, origin: &Sitemap) -> Self {
        self.origin = Some(origin.key().to_string());
        self
    }

    /// The identity of this sitemap: its normalized URI
    pub fn key(&self) -> &str {
        self.uri.as_str()
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// Key of the sitemap that listed this one, `None` for a root
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.origin.is_none()
    }

    /// Returns true if this sitemap is read from the local filesystem
    pub fn is_local(&self) -> bool {
        self.uri.scheme() == "file"
    }
}

impl fmt::Display for Sitemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single cache warming target with optional ordering metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlEntry {
    uri: Url,
    priority: Option<f64>,
    last_modified: Option<DateTime<Utc>>,
    change_frequency: Option<ChangeFrequency>,
    origin: Option<String>,
}

impl UrlEntry {
    /// Creates an entry from an already normalized URI
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            priority: None,
            last_modified: None,
            change_frequency: None,
            origin: None,
        }
    }

    /// Creates an entry from a raw URL string
    pub fn parse(url: &str) -> Result<Self, UrlError> {
        Ok(Self::new(normalize_url(url)?))
    }

    /// Sets the priority, clamped to the sitemap protocol's 0.0..=1.0 range
    pub fn with_priority(mut self, priority: Option<f64>) -> Self {
        self.priority = priority
            .filter(|p| p.is_finite())
            .map(|p| p.clamp(0.0, 1.0));
        self
    }

    pub fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
        self.last_modified = last_modified;
        self
    }

    pub fn with_change_frequency(mut self, change_frequency: Option<ChangeFrequency>) -> Self {
        self.change_frequency = change_frequency;
        self
    }

    /// Records the sitemap that listed this URL
    pub fn with_origin(mut self, origin: &Sitemap) -> Self {
        self.origin = Some(origin.key().to_string());
        self
    }

    /// The identity of this URL: its normalized URI
    pub fn key(&self) -> &str {
        self.uri.as_str()
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Declared priority, if any
    pub fn priority(&self) -> Option<f64> {
        self.priority
    }

    /// Declared priority, or [`DEFAULT_PRIORITY`] when missing
    pub fn effective_priority(&self) -> f64 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    pub fn change_frequency(&self) -> Option<ChangeFrequency> {
        self.change_frequency
    }

    /// Key of the sitemap that listed this URL, `None` if added directly
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

impl fmt::Display for UrlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Output of parsing one sitemap document
#[derive(Debug, Clone, Default)]
pub struct ParserResult {
    /// Child sitemaps, in document order
    pub sitemaps: Vec<Sitemap>,

    /// URLs, in document order
    pub urls: Vec<UrlEntry>,
}

impl ParserResult {
    pub fn new(sitemaps: Vec<Sitemap>, urls: Vec<UrlEntry>) -> Self {
        Self { sitemaps, urls }
    }

    pub fn is_empty(&self) -> bool {
        self.sitemaps.is_empty() && self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_frequency_from_str() {
        assert_eq!("daily".parse::<ChangeFrequency>(), Ok(ChangeFrequency::Daily));
        assert_eq!(" Hourly ".parse::<ChangeFrequency>(), Ok(ChangeFrequency::Hourly));
        assert!("sometimes".parse::<ChangeFrequency>().is_err());
    }

    #[test]
    fn test_change_frequency_rank_order() {
        let ordered = [
            ChangeFrequency::Always,
            ChangeFrequency::Hourly,
            ChangeFrequency::Daily,
            ChangeFrequency::Weekly,
            ChangeFrequency::Monthly,
            ChangeFrequency::Yearly,
            ChangeFrequency::Never,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].rank() > pair[1].rank(), "{} <= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_sitemap_origin() {
        let root = Sitemap::parse("https://example.com/sitemap_index.xml").unwrap();
        let child = Sitemap::parse("https://example.com/posts.xml")
            .unwrap()
            .with_origin(&root);

        assert!(root.is_root());
        assert!(!child.is_root());
        assert_eq!(child.origin(), Some("https://example.com/sitemap_index.xml"));
    }

    #[test]
    fn test_sitemap_is_local() {
        assert!(Sitemap::parse("/tmp/sitemap.xml").unwrap().is_local());
        assert!(!Sitemap::parse("https://example.com/sitemap.xml")
            .unwrap()
            .is_local());
    }

    #[test]
    fn test_url_entry_priority_default() {
        let url = UrlEntry::parse("https://example.com/").unwrap();
        assert_eq!(url.priority(), None);
        assert_eq!(url.effective_priority(), DEFAULT_PRIORITY);
    }

    #[test]
    fn test_url_entry_priority_clamped() {
        let url = UrlEntry::parse("https://example.com/")
            .unwrap()
            .with_priority(Some(1.7));
        assert_eq!(url.priority(), Some(1.0));

        let url = UrlEntry::parse("https://example.com/")
            .unwrap()
            .with_priority(Some(f64::NAN));
        assert_eq!(url.priority(), None);
    }

    #[test]
    fn test_url_entry_key_is_normalized() {
        let url = UrlEntry::parse("https://EXAMPLE.com/page#frag").unwrap();
        assert_eq!(url.key(), "https://example.com/page");
        assert_eq!(url.to_string(), "https://example.com/page");
    }

    #[test]
    fn test_url_entry_rejects_invalid() {
        assert!(UrlEntry::parse("").is_err());
        assert!(UrlEntry::parse("mailto:someone@example.com").is_err());
    }
}
