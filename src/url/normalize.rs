use crate::UrlError;
use std::path::Path;
use url::Url;

/// Schemes accepted for warmed URLs
const CRAWLABLE_SCHEMES: &[&str] = &["http", "https"];

/// Normalizes a URL that will be requested during cache warming
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Parse the URL; reject if malformed
/// 3. Require an HTTP or HTTPS scheme and a host
/// 4. Lowercase the host, resolve dot segments, empty path becomes `/`
///    (performed by the parser itself)
/// 5. Remove the fragment, which is never sent to the server
///
/// Query strings are kept untouched: caches key on them, so two URLs that
/// only differ in their query are different cache entries.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use cache_warmer::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut url = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;

    if !CRAWLABLE_SCHEMES.contains(&url.scheme()) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Normalizes the location of a sitemap
///
/// Sitemaps may live on a web server or on the local filesystem. HTTP(S)
/// locations go through [`normalize_url`]; `file://` URLs are kept as they
/// are, and anything else is treated as a filesystem path (relative paths
/// are resolved against the current working directory).
pub fn normalize_sitemap_location(location: &str) -> Result<Url, UrlError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    if let Ok(url) = Url::parse(trimmed) {
        match url.scheme() {
            "http" | "https" => return normalize_url(trimmed),
            "file" => {
                let mut url = url;
                url.set_fragment(None);
                return Ok(url);
            }
            // Single letter schemes are Windows drive letters, not URLs
            scheme if scheme.len() > 1 => {
                return Err(UrlError::InvalidScheme(format!(
                    "Sitemaps must be HTTP(S) URLs or local files, got: {}",
                    scheme
                )));
            }
            _ => {}
        }
    }

    file_url(Path::new(trimmed))
}

/// Converts a filesystem path into a normalized `file://` URL
fn file_url(path: &Path) -> Result<Url, UrlError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| UrlError::Malformed(format!("Cannot resolve {}: {}", path.display(), e)))?
            .join(path)
    };

    let url = Url::from_file_path(&absolute)
        .map_err(|_| UrlError::Malformed(format!("Invalid file path: {}", absolute.display())))?;

    // Re-parsing resolves `.` and `..` segments
    Url::parse(url.as_str()).map_err(|e| UrlError::Parse(e.to_string()))
}
