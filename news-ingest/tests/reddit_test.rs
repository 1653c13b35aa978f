mod common;

use common::{fetcher, html_page, init_tracing, HTML_CONTENT_TYPE};
use news_ingest::{PullSource, RedditClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);
const CREATED: i64 = 1_771_322_400; // 2026-02-17T10:00:00Z

fn client(server: &MockServer) -> RedditClient {
    RedditClient::new(fetcher())
        .with_api_base(server.uri())
        .with_link_base("https://reddit.com")
}

fn post(id: &str, extra: serde_json::Value) -> serde_json::Value {
    let mut data = json!({
        "id": id,
        "title": format!("Post {id}"),
        "permalink": format!("/r/science/comments/{id}/post_{id}/"),
        "author": "curious_cat",
        "created_utc": CREATED as f64,
        "selftext": "",
        "link_flair_text": null,
    });
    if let (Some(base), Some(extra)) = (data.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    json!({ "kind": "t3", "data": data })
}

fn listing(children: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "kind": "Listing", "data": { "children": children } })
}

#[tokio::test]
async fn test_subreddit_listing() {
    init_tracing();
    let server = MockServer::start().await;
    let article_url = format!("{}/external/article", server.uri());

    Mock::given(method("GET"))
        .and(path("/r/science/new.json"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![
            post(
                "p1",
                json!({ "selftext": "Self post body", "is_self": true, "link_flair_text": "Biology" }),
            ),
            post("p2", json!({ "url": article_url, "is_self": false })),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/external/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            html_page("", "<article>Linked article text</article>"),
            HTML_CONTENT_TYPE,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .fetch_subreddit("science", 25, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.id.as_deref(), Some("p1"));
    assert_eq!(first.title, "Post p1");
    assert_eq!(
        first.link.as_deref(),
        Some("https://reddit.com/r/science/comments/p1/post_p1/")
    );
    assert_eq!(first.summary, "Self post body");
    assert_eq!(first.content, "Self post body");
    assert_eq!(first.authors, vec!["curious_cat"]);
    assert_eq!(first.tags, vec!["Biology"]);
    assert_eq!(first.source, "reddit:science");
    assert_eq!(first.published.map(|ts| ts.timestamp()), Some(CREATED));

    let second = &records[1];
    assert_eq!(second.summary, "");
    assert_eq!(second.content, "Linked article text");
    assert!(second.tags.is_empty());
}

#[tokio::test]
async fn test_subreddit_listing_error_propagates() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/private/new.json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client(&server).fetch_subreddit("private", 25, TIMEOUT).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_post_thread_shape() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/science/comments/abc/some_title.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            listing(vec![post("abc", json!({ "selftext": "Thread body" }))]),
            listing(vec![]),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/r/science/comments/abc/some_title/?utm_source=share", server.uri());
    let records = client(&server).fetch_post(&url, TIMEOUT).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_deref(), Some("abc"));
    assert_eq!(records[0].content, "Thread body");
    assert_eq!(records[0].source, "reddit:post");
}

#[tokio::test]
async fn test_post_by_bare_id_single_listing_shape() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments/xyz.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![post(
            "xyz",
            json!({ "selftext": "Single body" }),
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).fetch_post("xyz", TIMEOUT).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "Single body");
}

#[tokio::test]
async fn test_post_failure_is_empty() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments/missing.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/comments/garbled.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.fetch_post("missing", TIMEOUT).await.is_empty());
    assert!(client.fetch_post("garbled", TIMEOUT).await.is_empty());
}

#[tokio::test]
async fn test_pull_routes_subreddit_shorthand() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/space/new.json"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![post(
            "s1",
            json!({ "selftext": "Orbit", "is_self": true }),
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .with_listing_limit(5)
        .pull("r/Space")
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source, "reddit:space");
}

#[tokio::test]
async fn test_self_post_without_text_skips_article_fetch() {
    init_tracing();
    let server = MockServer::start().await;
    let own_url = format!("{}/r/science/comments/e1/empty/", server.uri());

    Mock::given(method("GET"))
        .and(path("/r/science/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![post(
            "e1",
            json!({ "selftext": "", "is_self": true, "url": own_url }),
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/science/comments/e1/empty/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            html_page("", "<article>Rendered thread page</article>"),
            HTML_CONTENT_TYPE,
        ))
        .expect(0)
        .mount(&server)
        .await;

    let records = client(&server)
        .fetch_subreddit("science", 25, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "");
    assert_eq!(records[0].summary, "");
}
