//! Shared fixtures for the integration tests

use cache_warmer::config::{Config, CrawlerConfig};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders a `<urlset>` document; each entry is `(loc, priority)`
pub fn urlset(entries: &[(String, Option<f64>)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for (loc, priority) in entries {
        xml.push_str("\n  <url>\n    <loc>");
        xml.push_str(loc);
        xml.push_str("</loc>");
        if let Some(priority) = priority {
            xml.push_str(&format!("\n    <priority>{}</priority>", priority));
        }
        xml.push_str("\n  </url>");
    }
    xml.push_str("\n</urlset>\n");
    xml
}

/// Renders a `<sitemapindex>` document
pub fn sitemap_index(locs: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for loc in locs {
        xml.push_str(&format!("\n  <sitemap><loc>{}</loc></sitemap>", loc));
    }
    xml.push_str("\n</sitemapindex>\n");
    xml
}

pub fn gzip(content: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// Serves `body` as XML at `route`
pub async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Answers any request to `route` with `status`
pub async fn mount_page(server: &MockServer, route: &str, status: u16) {
    Mock::given(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Paths of the page requests the server received, in arrival order
pub async fn requested_paths(server: &MockServer, prefix: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .filter(|path| path.starts_with(prefix))
        .collect()
}

/// Creates a test configuration with short timeouts
pub fn create_test_config(sitemaps: Vec<String>) -> Config {
    Config {
        sitemaps,
        crawler: CrawlerConfig {
            timeout: 5,
            ..CrawlerConfig::default()
        },
        ..Config::default()
    }
}
