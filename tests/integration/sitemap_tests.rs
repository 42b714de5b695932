//! Sitemap fetching and resolution against a mock server

use crate::common::{gzip, mount_page, mount_xml, sitemap_index, urlset};
use cache_warmer::crawler::build_http_client;
use cache_warmer::config::CrawlerConfig;
use cache_warmer::sitemap::{Sitemap, SitemapParser, SitemapResolver, UrlCollector, XmlSitemapParser};
use cache_warmer::url::ExcludePattern;
use cache_warmer::SitemapError;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn parser() -> XmlSitemapParser {
    XmlSitemapParser::new(build_http_client(&CrawlerConfig::default()).unwrap())
}

fn keys(sitemaps: Vec<&Sitemap>) -> Vec<String> {
    sitemaps.iter().map(|s| s.key().to_string()).collect()
}

#[tokio::test]
async fn test_resolve_sitemap_index() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap_index.xml",
        sitemap_index(&[format!("{}/posts.xml", base), format!("{}/pages.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/posts.xml",
        urlset(&[(format!("{}/post-1", base), None), (format!("{}/post-2", base), None)]),
    )
    .await;
    mount_xml(
        &server,
        "/pages.xml",
        urlset(&[(format!("{}/about", base), None), (format!("{}/post-1", base), None)]),
    )
    .await;

    let parser = parser();
    let mut collector = UrlCollector::new(0);
    let seed = Sitemap::parse(&format!("{}/sitemap_index.xml", base)).unwrap();

    SitemapResolver::new(&parser, &[], false)
        .resolve(vec![seed], &mut collector)
        .await
        .unwrap();

    let urls: Vec<&str> = collector.accepted_urls().iter().map(|u| u.uri().path()).collect();
    assert_eq!(urls, vec!["/post-1", "/post-2", "/about"]);
    assert_eq!(
        keys(collector.accepted_sitemaps()),
        vec![
            format!("{}/sitemap_index.xml", base),
            format!("{}/posts.xml", base),
            format!("{}/pages.xml", base),
        ]
    );

    let pages = collector.sitemap(&format!("{}/pages.xml", base)).unwrap();
    assert_eq!(collector.root_of(pages).uri().path(), "/sitemap_index.xml");
}

#[tokio::test]
async fn test_self_referencing_index_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sitemap_index(&[format!("{}/sitemap.xml", base)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let parser = parser();
    let mut collector = UrlCollector::new(0);
    SitemapResolver::new(&parser, &[], false)
        .resolve(
            vec![Sitemap::parse(&format!("{}/sitemap.xml", base)).unwrap()],
            &mut collector,
        )
        .await
        .unwrap();

    assert_eq!(collector.accepted_sitemaps().len(), 1);
    assert!(collector.excluded_sitemaps().is_empty());
    assert!(collector.failed_sitemaps().is_empty());
}

#[tokio::test]
async fn test_gzipped_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(path("/sitemap.xml.gz"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/gzip")
                .set_body_bytes(gzip(&urlset(&[(format!("{}/zipped", base), Some(0.8))]))),
        )
        .mount(&server)
        .await;

    let sitemap = Sitemap::parse(&format!("{}/sitemap.xml.gz", base)).unwrap();
    let result = parser().parse(&sitemap).await.unwrap();

    assert_eq!(result.urls.len(), 1);
    assert_eq!(result.urls[0].uri().path(), "/zipped");
    assert_eq!(result.urls[0].priority(), Some(0.8));
}

#[tokio::test]
async fn test_missing_sitemap_non_strict() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/index.xml",
        sitemap_index(&[format!("{}/missing.xml", base), format!("{}/ok.xml", base)]),
    )
    .await;
    mount_xml(&server, "/ok.xml", urlset(&[(format!("{}/page", base), None)])).await;
    mount_page(&server, "/missing.xml", 404).await;

    let parser = parser();
    let mut collector = UrlCollector::new(0);
    SitemapResolver::new(&parser, &[], false)
        .resolve(
            vec![Sitemap::parse(&format!("{}/index.xml", base)).unwrap()],
            &mut collector,
        )
        .await
        .unwrap();

    assert_eq!(keys(collector.failed_sitemaps()), vec![format!("{}/missing.xml", base)]);
    assert_eq!(collector.accepted_urls().len(), 1);
}

#[tokio::test]
async fn test_missing_sitemap_strict() {
    let server = MockServer::start().await;
    mount_page(&server, "/missing.xml", 404).await;

    let parser = parser();
    let mut collector = UrlCollector::new(0);
    let result = SitemapResolver::new(&parser, &[], true)
        .resolve(
            vec![Sitemap::parse(&format!("{}/missing.xml", server.uri())).unwrap()],
            &mut collector,
        )
        .await;

    assert!(matches!(result, Err(SitemapError::FetchFailed { .. })));
    assert!(collector.failed_sitemaps().is_empty());
}

#[tokio::test]
async fn test_html_instead_of_sitemap() {
    let server = MockServer::start().await;
    Mock::given(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Not here</body></html>"))
        .mount(&server)
        .await;

    let sitemap = Sitemap::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
    let result = parser().parse(&sitemap).await;
    assert!(matches!(result, Err(SitemapError::Malformed { .. })));
}

#[tokio::test]
async fn test_exclude_and_limit() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/index.xml",
        sitemap_index(&[format!("{}/private/sitemap.xml", base), format!("{}/pages.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/pages.xml",
        urlset(&[
            (format!("{}/a", base), None),
            (format!("{}/foo", base), None),
            (format!("{}/b", base), None),
            (format!("{}/c", base), None),
        ]),
    )
    .await;

    let exclude = vec![
        ExcludePattern::parse("*/foo").unwrap(),
        ExcludePattern::parse("*/private/*").unwrap(),
    ];
    let parser = parser();
    let mut collector = UrlCollector::new(2);
    SitemapResolver::new(&parser, &exclude, false)
        .resolve(
            vec![Sitemap::parse(&format!("{}/index.xml", base)).unwrap()],
            &mut collector,
        )
        .await
        .unwrap();

    let accepted: Vec<&str> = collector.accepted_urls().iter().map(|u| u.uri().path()).collect();
    let excluded: Vec<&str> = collector.excluded_urls().iter().map(|u| u.uri().path()).collect();
    assert_eq!(accepted, vec!["/a", "/b"]);
    assert_eq!(excluded, vec!["/foo"]);
    assert_eq!(
        keys(collector.excluded_sitemaps()),
        vec![format!("{}/private/sitemap.xml", base)]
    );
    assert!(!collector.contains_url(&format!("{}/c", base)));

    let private_requests = crate::common::requested_paths(&server, "/private").await;
    assert!(private_requests.is_empty());
}

#[tokio::test]
async fn test_local_sitemap_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        urlset(&[
            ("https://example.com/one".to_string(), None),
            ("https://example.com/two".to_string(), Some(0.9)),
        ])
        .as_bytes(),
    )
    .unwrap();
    file.flush().unwrap();

    let sitemap = Sitemap::parse(file.path().to_str().unwrap()).unwrap();
    assert!(sitemap.is_local());

    let result = parser().parse(&sitemap).await.unwrap();
    assert_eq!(result.urls.len(), 2);
    assert_eq!(result.urls[1].priority(), Some(0.9));
}
