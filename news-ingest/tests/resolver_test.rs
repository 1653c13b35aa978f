mod common;

use chrono::Utc;
use common::{fetcher, html_page, init_tracing, rss_feed, rss_item, HTML_CONTENT_TYPE, RSS_CONTENT_TYPE};
use news_ingest::{FeedResolver, IngestError};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn sample_feed(server: &MockServer) -> String {
    rss_feed(
        "Discovered Feed",
        &[
            rss_item("First", &format!("{}/a/1", server.uri()), Some(Utc::now())),
            rss_item("Second", &format!("{}/a/2", server.uri()), Some(Utc::now())),
        ],
    )
}

async fn mount_feed(server: &MockServer, route: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sample_feed(server), RSS_CONTENT_TYPE))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, HTML_CONTENT_TYPE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_direct_feed() {
    init_tracing();
    let server = MockServer::start().await;
    mount_feed(&server, "/feed.xml", 1).await;

    let resolver = FeedResolver::new(fetcher());
    let feed = resolver
        .fetch(&format!("{}/feed.xml", server.uri()), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(feed.title.as_deref(), Some("Discovered Feed"));
    assert_eq!(feed.entries.len(), 2);
    assert_eq!(feed.entries[0].title.as_deref(), Some("First"));
    assert!(feed.feed_url.as_deref().unwrap().ends_with("/feed.xml"));
}

#[tokio::test]
async fn test_discovery_via_alternate_link() {
    init_tracing();
    let server = MockServer::start().await;
    mount_feed(&server, "/feed.xml", 1).await;
    mount_html(
        &server,
        "/page",
        html_page(
            r#"<link rel="alternate" type="application/rss+xml" href="/feed.xml">"#,
            "<p>Not a feed</p>",
        ),
    )
    .await;

    let resolver = FeedResolver::new(fetcher());
    let feed = resolver
        .fetch(&format!("{}/page", server.uri()), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(feed.entries.len(), 2);
    assert_eq!(feed.feed_url, Some(format!("{}/feed.xml", server.uri())));
}

#[tokio::test]
async fn test_discovery_via_anchor() {
    init_tracing();
    let server = MockServer::start().await;
    mount_feed(&server, "/blog/rss", 1).await;
    mount_html(
        &server,
        "/blog/",
        html_page("", r#"<a href="/about">About</a><a href="rss">RSS</a>"#),
    )
    .await;

    let resolver = FeedResolver::new(fetcher());
    let feed = resolver
        .fetch(&format!("{}/blog/", server.uri()), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(feed.entries.len(), 2);
}

#[tokio::test]
async fn test_feed_content_type_is_authoritative() {
    init_tracing();
    let server = MockServer::start().await;
    // The hint below must not be followed.
    mount_feed(&server, "/feed.xml", 0).await;

    let body = html_page(
        r#"<link rel="alternate" type="application/rss+xml" href="/feed.xml">"#,
        "",
    );
    Mock::given(method("GET"))
        .and(path("/claims-xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .mount(&server)
        .await;

    let resolver = FeedResolver::new(fetcher());
    let feed = resolver
        .fetch(&format!("{}/claims-xml", server.uri()), TIMEOUT)
        .await
        .unwrap();

    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_page_without_hints_is_empty() {
    init_tracing();
    let server = MockServer::start().await;
    mount_html(&server, "/plain", html_page("", "<article>Just text</article>")).await;

    let resolver = FeedResolver::new(fetcher());
    let feed = resolver
        .fetch(&format!("{}/plain", server.uri()), TIMEOUT)
        .await
        .unwrap();

    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_http_error_propagates() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resolver = FeedResolver::new(fetcher());
    let err = resolver
        .fetch(&format!("{}/gone", server.uri()), TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Status { status: 404, .. }));
}
