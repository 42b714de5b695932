//! End-to-end warmups against a mock server

use crate::common::{create_test_config, mount_page, mount_xml, requested_paths, sitemap_index, urlset};
use cache_warmer::config::load_config;
use cache_warmer::crawler::{warmup, Coordinator};
use cache_warmer::output::WarmupSummary;
use cache_warmer::{CrawlState, WarmupError};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves an index with two child sitemaps listing /page/1../page/4
async fn setup_site(server: &MockServer) {
    let base = server.uri();

    mount_xml(
        server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/a.xml", base), format!("{}/b.xml", base)]),
    )
    .await;
    mount_xml(
        server,
        "/a.xml",
        urlset(&[
            (format!("{}/page/1", base), Some(0.5)),
            (format!("{}/page/2", base), Some(1.0)),
        ]),
    )
    .await;
    mount_xml(
        server,
        "/b.xml",
        urlset(&[
            (format!("{}/page/3", base), Some(0.75)),
            (format!("{}/page/4", base), None),
        ]),
    )
    .await;
}

#[tokio::test]
async fn test_full_warmup() {
    let server = MockServer::start().await;
    setup_site(&server).await;
    for page in 1..=4 {
        mount_page(&server, &format!("/page/{}", page), 200).await;
    }

    let config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())]);
    let (coordinator, result) = warmup(&config).await.unwrap();

    assert_eq!(result.successful().len(), 4);
    assert!(result.failed().is_empty());
    assert!(!result.is_cancelled());
    assert!(result
        .successful()
        .iter()
        .all(|r| r.state() == CrawlState::Successful));

    let summary = WarmupSummary::new(coordinator.collector(), &result);
    assert_eq!(summary.sitemaps_accepted, 3);
    assert_eq!(summary.urls_accepted, 4);
    assert!(!summary.has_failures());
}

#[tokio::test]
async fn test_head_requests_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(Vec::new());
    config.urls = vec![format!("{}/page", server.uri())];

    let (_, result) = warmup(&config).await.unwrap();
    assert_eq!(result.successful().len(), 1);
}

#[tokio::test]
async fn test_failed_status_is_recorded() {
    let server = MockServer::start().await;
    setup_site(&server).await;
    mount_page(&server, "/page/1", 200).await;
    mount_page(&server, "/page/2", 500).await;
    mount_page(&server, "/page/3", 301).await;
    mount_page(&server, "/page/4", 404).await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())]);
    let (coordinator, result) = warmup(&config).await.unwrap();

    let failed: Vec<&str> = result.failed().iter().map(|r| r.url().uri().path()).collect();
    assert_eq!(result.successful().len(), 2);
    assert_eq!(failed.len(), 2);
    assert!(failed.contains(&"/page/2"));
    assert!(failed.contains(&"/page/4"));

    let summary = WarmupSummary::new(coordinator.collector(), &result);
    assert!(summary.has_failures());
}

#[tokio::test]
async fn test_priority_strategy_order() {
    let server = MockServer::start().await;
    setup_site(&server).await;
    for page in 1..=4 {
        mount_page(&server, &format!("/page/{}", page), 200).await;
    }

    let mut config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())]);
    config.strategy = Some("sort-by-priority".to_string());
    config.crawler.concurrency = 1;

    warmup(&config).await.unwrap();

    assert_eq!(
        requested_paths(&server, "/page").await,
        vec!["/page/2", "/page/3", "/page/1", "/page/4"]
    );
}

#[tokio::test]
async fn test_stop_on_failure() {
    let server = MockServer::start().await;
    setup_site(&server).await;
    mount_page(&server, "/page/1", 503).await;
    for page in 2..=4 {
        mount_page(&server, &format!("/page/{}", page), 200).await;
    }

    let mut config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())]);
    config.crawler.concurrency = 1;
    config.stop_on_failure = true;

    let (_, result) = warmup(&config).await.unwrap();

    assert!(result.is_cancelled());
    assert_eq!(result.failed().len(), 1);
    assert_eq!(result.failed()[0].url().uri().path(), "/page/1");
    assert!(result.successful().is_empty());
    assert_eq!(requested_paths(&server, "/page").await, vec!["/page/1"]);
}

#[tokio::test]
async fn test_excluded_urls_never_requested() {
    let server = MockServer::start().await;
    setup_site(&server).await;
    for page in 1..=4 {
        mount_page(&server, &format!("/page/{}", page), 200).await;
    }

    let mut config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())]);
    config.exclude = vec!["*/page/3".to_string(), "#/page/[4]$#".to_string()];

    let (coordinator, result) = warmup(&config).await.unwrap();

    assert_eq!(result.successful().len(), 2);
    assert_eq!(coordinator.excluded_urls().len(), 2);
    let requested = requested_paths(&server, "/page").await;
    assert!(!requested.contains(&"/page/3".to_string()));
    assert!(!requested.contains(&"/page/4".to_string()));
}

#[tokio::test]
async fn test_limit() {
    let server = MockServer::start().await;
    setup_site(&server).await;
    for page in 1..=4 {
        mount_page(&server, &format!("/page/{}", page), 200).await;
    }

    let mut config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())]);
    config.limit = 3;

    let (coordinator, result) = warmup(&config).await.unwrap();

    assert_eq!(coordinator.accepted_urls().len(), 3);
    assert_eq!(result.len(), 3);
    assert!(coordinator.excluded_urls().is_empty());
}

#[tokio::test]
async fn test_strict_mode_aborts() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/gone.xml", base)]),
    )
    .await;
    mount_page(&server, "/gone.xml", 410).await;

    let mut config = create_test_config(vec![format!("{}/sitemap.xml", base)]);
    config.strict = true;

    let result = warmup(&config).await;
    assert!(matches!(result, Err(WarmupError::Sitemap(_))));
}

#[tokio::test]
async fn test_run_twice_requests_same_urls() {
    let server = MockServer::start().await;
    setup_site(&server).await;
    for page in 1..=4 {
        mount_page(&server, &format!("/page/{}", page), 200).await;
    }

    let mut config = create_test_config(vec![format!("{}/sitemap.xml", server.uri())]);
    config.crawler.concurrency = 1;

    let mut coordinator = Coordinator::from_config(&config).unwrap();
    coordinator
        .add_sitemap_locations(&config.sitemaps)
        .await
        .unwrap();

    let first = coordinator.run().await.unwrap();
    let second = coordinator.run().await.unwrap();

    assert_eq!(first.len(), 4);
    assert_eq!(second.len(), 4);
    let requested = requested_paths(&server, "/page").await;
    assert_eq!(requested[..4], requested[4..]);
}

#[tokio::test]
async fn test_warmup_from_config_file() {
    let server = MockServer::start().await;
    setup_site(&server).await;
    for page in 1..=4 {
        mount_page(&server, &format!("/page/{}", page), 200).await;
    }

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
sitemaps = ["{}/sitemap.xml"]
limit = 2
strategy = "sort-by-priority"

[crawler]
concurrency = 1
request-method = "GET"
timeout = 5
"#,
        server.uri()
    )
    .unwrap();
    file.flush().unwrap();

    let config = load_config(file.path()).unwrap();
    let (_, result) = warmup(&config).await.unwrap();

    assert_eq!(result.successful().len(), 2);
    // The limit applies in discovery order, the strategy only reorders
    assert_eq!(requested_paths(&server, "/page").await, vec!["/page/2", "/page/1"]);
}
