//! Integration tests for discovery over HTTP
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! HTTP fetcher, the sitemap reader, and full traversals end-to-end.

use sitewalk::config::{FetcherConfig, TraversalConfig};
use sitewalk::crawler::{
    build_http_client, Fetcher, HttpFetcher, HttpSitemapReader, RenderConfig, SitemapReader,
};
use sitewalk::{discover, VisitStatus};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn http_fetcher(config: &FetcherConfig) -> HttpFetcher {
    HttpFetcher::new(build_http_client(config).unwrap())
}

fn page_url(server: &MockServer, page: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), page)).unwrap()
}

#[tokio::test]
async fn test_fetch_splits_internal_and_external_links() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/page1">One</a>
           <a href="page2#section">Two</a>
           <a href="https://external.invalid/x">Elsewhere</a>
           <a href="mailto:team@example.com">Mail</a>"#,
    )
    .await;

    let fetcher = http_fetcher(&FetcherConfig::default());
    let result = fetcher
        .fetch(&page_url(&server, "/"), &RenderConfig::default())
        .await;

    assert!(result.success);
    assert!(result.content.contains("<title>Test</title>"));
    assert_eq!(
        result.internal_links,
        vec![
            format!("{}/page1", server.uri()),
            format!("{}/page2#section", server.uri()),
        ]
    );
    assert_eq!(result.external_links, vec!["https://external.invalid/x"]);
}

#[tokio::test]
async fn test_fetch_http_error_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = http_fetcher(&FetcherConfig::default());
    for page in ["/gone", "/broken"] {
        let result = fetcher
            .fetch(&page_url(&server, page), &RenderConfig::default())
            .await;
        assert!(!result.success, "{} should fail", page);
        assert!(result.internal_links.is_empty());
    }
}

#[tokio::test]
async fn test_fetch_non_html_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"))
        .mount(&server)
        .await;

    let fetcher = http_fetcher(&FetcherConfig::default());
    let result = fetcher
        .fetch(&page_url(&server, "/data.json"), &RenderConfig::default())
        .await;

    assert!(!result.success);
}

#[tokio::test]
async fn test_fetch_resolves_links_against_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new/", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/new/", r#"<a href="child">Child</a>"#).await;

    let fetcher = http_fetcher(&FetcherConfig::default());
    let result = fetcher
        .fetch(&page_url(&server, "/old"), &RenderConfig::default())
        .await;

    assert!(result.success);
    assert_eq!(result.internal_links, vec![format!("{}/new/child", server.uri())]);
}

#[tokio::test]
async fn test_fetch_redirect_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/loop", server.uri()).as_str()),
        )
        .mount(&server)
        .await;

    let config = FetcherConfig {
        max_redirects: 2,
        ..FetcherConfig::default()
    };
    let result = http_fetcher(&config)
        .fetch(&page_url(&server, "/loop"), &RenderConfig::default())
        .await;

    assert!(!result.success);
}

#[tokio::test]
async fn test_fetch_timeout_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("slow").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = FetcherConfig {
        timeout_secs: 1,
        ..FetcherConfig::default()
    };
    let result = http_fetcher(&config)
        .fetch(&page_url(&server, "/slow"), &RenderConfig::default())
        .await;

    assert!(!result.success);
}

#[tokio::test]
async fn test_fetch_sends_render_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "sitewalk-test/2.0"))
        .respond_with(html("ok"))
        .mount(&server)
        .await;

    let render = RenderConfig {
        user_agent: Some("sitewalk-test/2.0".to_string()),
        ..RenderConfig::default()
    };
    let result = http_fetcher(&FetcherConfig::default())
        .fetch(&page_url(&server, "/"), &render)
        .await;

    assert!(result.success);
}

#[tokio::test]
async fn test_fetch_pagination_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><link rel="next" href="/list?page=2"></head>
               <body><button class="more" data-href="/list?page=3">More</button></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let render = RenderConfig {
        handle_pagination: true,
        next_selector: Some("button.more".to_string()),
        ..RenderConfig::default()
    };
    let result = http_fetcher(&FetcherConfig::default())
        .fetch(&page_url(&server, "/list"), &render)
        .await;

    assert!(result.success);
    assert_eq!(
        result.internal_links,
        vec![
            format!("{}/list?page=2", server.uri()),
            format!("{}/list?page=3", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_sitemap_reader() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/a</loc></url>
  <url><loc>{0}/b</loc><lastmod>2024-01-15</lastmod></url>
</urlset>"#,
                server.uri()
            ),
            "application/xml",
        ))
        .mount(&server)
        .await;

    let reader = HttpSitemapReader::new(build_http_client(&FetcherConfig::default()).unwrap());
    let urls = reader.read_sitemap(&page_url(&server, "/deep/page")).await;

    assert_eq!(
        urls,
        vec![format!("{}/a", server.uri()), format!("{}/b", server.uri())]
    );
}

#[tokio::test]
async fn test_sitemap_reader_sends_run_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("user-agent", "sitewalk-run/3.1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!("<urlset><url><loc>{}/a</loc></url></urlset>", server.uri()),
            "application/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let reader = HttpSitemapReader::new(build_http_client(&FetcherConfig::default()).unwrap())
        .with_user_agent(Some("sitewalk-run/3.1".to_string()));
    let urls = reader.read_sitemap(&page_url(&server, "/")).await;

    assert_eq!(urls, vec![format!("{}/a", server.uri())]);
}

#[tokio::test]
async fn test_discover_sitemap_uses_configured_agent() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "").await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("user-agent", "only-agent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<urlset></urlset>", "application/xml"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher_config = FetcherConfig {
        user_agents: vec!["only-agent/1.0".to_string()],
        ..FetcherConfig::default()
    };
    let config = TraversalConfig {
        max_depth: 0,
        max_urls: 5,
        ..TraversalConfig::default()
    };
    let result = discover(&server.uri(), &config, &fetcher_config, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.urls(), vec![format!("{}/", server.uri())]);
}

#[tokio::test]
async fn test_fetch_through_proxy() {
    let proxy = MockServer::start().await;
    // Plain-http requests reach the proxy in absolute form
    Mock::given(method("GET"))
        .and(path("/routed"))
        .respond_with(html(r#"<a href="/next">next</a>"#))
        .expect(1)
        .mount(&proxy)
        .await;

    let config = FetcherConfig {
        proxy: Some(proxy.uri()),
        ..FetcherConfig::default()
    };
    let target = Url::parse("http://sitewalk-target.invalid/routed").unwrap();
    let result = http_fetcher(&config)
        .fetch(&target, &RenderConfig::default())
        .await;

    assert!(result.success);
    assert_eq!(
        result.internal_links,
        vec!["http://sitewalk-target.invalid/next"]
    );
}

#[test]
fn test_invalid_proxy_fails_client_build() {
    let config = FetcherConfig {
        proxy: Some("ftp://proxy.invalid".to_string()),
        ..FetcherConfig::default()
    };
    assert!(build_http_client(&config).is_err());
}

#[tokio::test]
async fn test_sitemap_reader_failures_are_empty() {
    let server = MockServer::start().await;
    let reader = HttpSitemapReader::new(build_http_client(&FetcherConfig::default()).unwrap());

    // No mock mounted: 404
    assert!(reader.read_sitemap(&page_url(&server, "/")).await.is_empty());

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<urlset><url><loc>x</url>", "text/xml"),
        )
        .mount(&server)
        .await;
    assert!(reader.read_sitemap(&page_url(&server, "/")).await.is_empty());
}

#[tokio::test]
async fn test_discover_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/page1">1</a><a href="/page2/">2</a><a href="/missing">x</a>
           <a href="https://external.invalid/">ext</a>"#,
    )
    .await;
    mount_page(&server, "/page1", r#"<a href="/page3">3</a><a href="/">home</a>"#).await;
    mount_page(&server, "/page2", r#"<a href="/page1#top">1</a>"#).await;
    mount_page(&server, "/page3", "").await;
    mount_page(&server, "/from-sitemap", "").await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                "<urlset><url><loc>{0}/</loc></url><url><loc>{0}/from-sitemap</loc></url></urlset>",
                base
            ),
            "application/xml",
        ))
        .mount(&server)
        .await;

    let config = TraversalConfig {
        max_depth: 1,
        max_urls: 20,
        concurrent_requests: 2,
        ..TraversalConfig::default()
    };
    let result = discover(
        &format!("{}/", base),
        &config,
        &FetcherConfig::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        result.urls(),
        vec![
            format!("{}/", base),
            format!("{}/from-sitemap", base),
            format!("{}/page1", base),
            format!("{}/page2", base),
            format!("{}/missing", base),
        ]
    );
    let missing = result.visits.last().unwrap();
    assert_eq!(missing.status, VisitStatus::Failed);
    assert_eq!(missing.depth, 1);
    assert!(!result.contains(&format!("{}/page3", base)));
    assert!(!result.is_cancelled());
    assert_eq!(result.stats.succeeded, 4);
    assert_eq!(result.stats.failed, 1);
}

#[tokio::test]
async fn test_discover_cap_limits_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/a">a</a><a href="/b">b</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = TraversalConfig {
        max_depth: 3,
        max_urls: 1,
        ..TraversalConfig::default()
    };
    let result = discover(
        &server.uri(),
        &config,
        &FetcherConfig::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(result.urls(), vec![format!("{}/", server.uri())]);
    // Expectations are verified when the server drops
}

#[tokio::test]
async fn test_discover_query_pages_are_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("page", "2"))
        .respond_with(html(""))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/list",
        r#"<a href="/list?page=2">next</a><a href="/list?">same</a>"#,
    )
    .await;

    let config = TraversalConfig {
        max_depth: 2,
        max_urls: 10,
        crawl_sitemap: false,
        ..TraversalConfig::default()
    };
    let result = discover(
        &format!("{}/list", server.uri()),
        &config,
        &FetcherConfig::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        result.urls(),
        vec![
            format!("{}/list", server.uri()),
            format!("{}/list?page=2", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_discover_rejects_malformed_seed() {
    let result = discover(
        "definitely not a url",
        &TraversalConfig::default(),
        &FetcherConfig::default(),
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(sitewalk::SitewalkError::Url(_))));
}
