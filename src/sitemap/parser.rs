//! Sitemap fetching and XML parsing
//!
//! This module handles:
//! - The `SitemapParser` collaborator contract used by the resolver
//! - Loading sitemap documents over HTTP(S) or from local files
//! - Transparent gzip decompression
//! - Parsing `<urlset>` and `<sitemapindex>` documents

use crate::sitemap::types::{ChangeFrequency, ParserResult, Sitemap, UrlEntry};
use crate::url::{normalize_sitemap_location, normalize_url};
use crate::SitemapError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use serde::Deserialize;
use std::io::Read;

/// Magic bytes at the start of every gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Resolves one sitemap into the child sitemaps and URLs it lists
#[async_trait]
pub trait SitemapParser: Send + Sync {
    /// Fetches and parses the given sitemap
    ///
    /// Returned children carry no origin; the resolver attaches it.
    async fn parse(&self, sitemap: &Sitemap) -> Result<ParserResult, SitemapError>;
}

/// Parser for XML sitemaps following the sitemaps.org protocol
pub struct XmlSitemapParser {
    client: Client,
}

impl XmlSitemapParser {
    /// Creates a parser that fetches remote sitemaps with the given client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Loads the raw bytes of a sitemap from the network or the filesystem
    async fn load(&self, sitemap: &Sitemap) -> Result<Vec<u8>, SitemapError> {
        let uri = sitemap.key();

        if sitemap.is_local() {
            let path = sitemap.uri().to_file_path().map_err(|_| SitemapError::FetchFailed {
                uri: uri.to_string(),
                message: "URI does not denote a local file".to_string(),
            })?;

            return tokio::fs::read(&path)
                .await
                .map_err(|e| SitemapError::FetchFailed {
                    uri: uri.to_string(),
                    message: e.to_string(),
                });
        }

        let response = self
            .client
            .get(sitemap.uri().clone())
            .send()
            .await
            .map_err(|e| SitemapError::FetchFailed {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::FetchFailed {
                uri: uri.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| SitemapError::FetchFailed {
            uri: uri.to_string(),
            message: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SitemapParser for XmlSitemapParser {
    async fn parse(&self, sitemap: &Sitemap) -> Result<ParserResult, SitemapError> {
        let bytes = self.load(sitemap).await?;
        let content = decode_body(sitemap.key(), bytes)?;
        let result = parse_document(sitemap, &content)?;

        tracing::debug!(
            "Parsed sitemap {}: {} sitemaps, {} urls",
            sitemap,
            result.sitemaps.len(),
            result.urls.len()
        );

        Ok(result)
    }
}

/// Decompresses gzip payloads and decodes the document as UTF-8
///
/// Detection relies on the gzip magic bytes, not on a `.gz` suffix: servers
/// often send `.xml.gz` files without a `Content-Encoding` header, while
/// others send one and the HTTP client has already inflated the body.
fn decode_body(uri: &str, bytes: Vec<u8>) -> Result<String, SitemapError> {
    let bytes = if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|e| SitemapError::Malformed {
                uri: uri.to_string(),
                message: format!("Invalid gzip stream: {}", e),
            })?;
        decoded
    } else {
        bytes
    };

    String::from_utf8(bytes).map_err(|e| SitemapError::Malformed {
        uri: uri.to_string(),
        message: format!("Invalid UTF-8: {}", e),
    })
}

/// Document structure shared by `<urlset>` and `<sitemapindex>`
#[derive(Debug, Deserialize)]
struct XmlDocument {
    #[serde(rename = "sitemap", default)]
    sitemaps: Vec<XmlSitemap>,

    #[serde(rename = "url", default)]
    urls: Vec<XmlUrl>,
}

#[derive(Debug, Deserialize)]
struct XmlSitemap {
    loc: Option<String>,
    lastmod: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlUrl {
    loc: Option<String>,
    lastmod: Option<String>,
    changefreq: Option<String>,
    priority: Option<String>,
}

/// The two document kinds defined by the sitemap protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    UrlSet,
    SitemapIndex,
}

/// Parses a sitemap document into child sitemaps and URLs
///
/// # Errors
///
/// * `Malformed` - Not well-formed XML, or the root is neither `<urlset>`
///   nor `<sitemapindex>`
/// * `EntryInvalid` - An entry has a missing or unparsable `<loc>`
pub fn parse_document(sitemap: &Sitemap, content: &str) -> Result<ParserResult, SitemapError> {
    let uri = sitemap.key();
    let malformed = |message: String| SitemapError::Malformed {
        uri: uri.to_string(),
        message,
    };

    let kind = match root_element(content).map_err(|e| malformed(e.to_string()))? {
        Some(name) if name == "urlset" => DocumentKind::UrlSet,
        Some(name) if name == "sitemapindex" => DocumentKind::SitemapIndex,
        Some(name) => return Err(malformed(format!("Unexpected root element <{}>", name))),
        None => return Err(malformed("Document has no root element".to_string())),
    };

    // `overlapped-lists` lets unknown elements sit between entries
    let document: XmlDocument =
        quick_xml::de::from_str(content).map_err(|e| malformed(e.to_string()))?;

    let mut result = ParserResult::default();

    match kind {
        DocumentKind::SitemapIndex => {
            for entry in document.sitemaps {
                let loc = required_loc(uri, entry.loc, "sitemap")?;
                let location = resolve_loc(sitemap, &loc)?;
                let child = normalize_sitemap_location(location.as_str())
                    .map_err(|e| invalid_entry(uri, &loc, &e.to_string()))?;

                result.sitemaps.push(
                    Sitemap::new(child)
                        .with_last_modified(entry.lastmod.as_deref().and_then(parse_lastmod)),
                );
            }
        }
        DocumentKind::UrlSet => {
            for entry in document.urls {
                let loc = required_loc(uri, entry.loc, "url")?;
                let location = resolve_loc(sitemap, &loc)?;
                let target = normalize_url(location.as_str())
                    .map_err(|e| invalid_entry(uri, &loc, &e.to_string()))?;

                result.urls.push(
                    UrlEntry::new(target)
                        .with_priority(entry.priority.as_deref().and_then(parse_priority))
                        .with_last_modified(entry.lastmod.as_deref().and_then(parse_lastmod))
                        .with_change_frequency(
                            entry
                                .changefreq
                                .as_deref()
                                .and_then(|value| value.parse::<ChangeFrequency>().ok()),
                        ),
                );
            }
        }
    }

    Ok(result)
}

/// Returns the local name of the document's root element
fn root_element(content: &str) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(content);

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                return Ok(Some(name));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn required_loc(uri: &str, loc: Option<String>, element: &str) -> Result<String, SitemapError> {
    match loc.map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SitemapError::EntryInvalid {
            uri: uri.to_string(),
            message: format!("<{}> entry without <loc>", element),
        }),
    }
}

/// Resolves a `<loc>` against the sitemap that lists it
///
/// Relative locations in an index may point at sibling sitemap files. In a
/// urlset of a local file they resolve to `file://` URIs, which are then
/// rejected as unwarmable.
fn resolve_loc(sitemap: &Sitemap, loc: &str) -> Result<url::Url, SitemapError> {
    sitemap
        .uri()
        .join(loc)
        .map_err(|e| invalid_entry(sitemap.key(), loc, &e.to_string()))
}

fn invalid_entry(uri: &str, loc: &str, reason: &str) -> SitemapError {
    SitemapError::EntryInvalid {
        uri: uri.to_string(),
        message: format!("Invalid location '{}': {}", loc, reason),
    }
}

/// Parses a W3C datetime as used by `<lastmod>`
///
/// Accepts full RFC 3339 timestamps, minute precision timestamps with an
/// offset, and plain dates (taken as midnight UTC).
pub fn parse_lastmod(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }

    if let Ok(datetime) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Some(datetime.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_priority(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok();
    if parsed.is_none() {
        tracing::debug!("Ignoring unparsable priority '{}'", value);
    }
    parsed
}
