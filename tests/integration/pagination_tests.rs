//! Page count discovery against a mock quotes site

use crate::common::*;
use quote_harvest::crawler::{build_http_client, discover_page_count, refresh_page_count};
use quote_harvest::url::parse_base_url;
use tempfile::TempDir;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Serves every listing page with a next-page control pointing one further
struct EndlessPages;

impl Respond for EndlessPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let page: u32 = request
            .url
            .path()
            .trim_matches('/')
            .trim_start_matches("page/")
            .parse()
            .unwrap();
        ResponseTemplate::new(200).set_body_string(listing_page(&[], Some(page + 1)))
    }
}

async fn mount_endless(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/page/\d+/$"))
        .respond_with(EndlessPages)
        .mount(server)
        .await;
}

async fn mount_untouchable(server: &MockServer, page: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/page/{}/", page)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], None)))
        .expect(0)
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> reqwest::Client {
    let dir = TempDir::new().unwrap();
    build_http_client(&create_test_config(server, dir.path(), 1).scraper).unwrap()
}

#[tokio::test]
async fn test_count_unchanged_without_next_page() {
    let server = MockServer::start().await;
    mount_page(&server, 5, listing_page(&[], None)).await;
    mount_untouchable(&server, 6).await;

    let base = parse_base_url(&format!("{}/", server.uri())).unwrap();
    let count = discover_page_count(&client_for(&server), &base, 5, 50).await;
    assert_eq!(count, 5);
}

#[tokio::test]
async fn test_walks_forward_to_last_page() {
    let server = MockServer::start().await;
    for page in 5..=7 {
        mount_page(&server, page, listing_page(&[], Some(page + 1))).await;
    }
    mount_page(&server, 8, listing_page(&[], None)).await;
    mount_untouchable(&server, 9).await;

    let base = parse_base_url(&format!("{}/", server.uri())).unwrap();
    let count = discover_page_count(&client_for(&server), &base, 5, 50).await;
    assert_eq!(count, 8);
}

#[tokio::test]
async fn test_failed_probe_keeps_confirmed_count() {
    let server = MockServer::start().await;
    mount_page(&server, 5, listing_page(&[], Some(6))).await;
    mount_page(&server, 6, listing_page(&[], Some(7))).await;
    Mock::given(method("GET"))
        .and(path("/page/7/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_untouchable(&server, 8).await;

    let base = parse_base_url(&format!("{}/", server.uri())).unwrap();
    let count = discover_page_count(&client_for(&server), &base, 5, 50).await;
    assert_eq!(count, 6);
}

#[tokio::test]
async fn test_unreachable_known_page_keeps_known_count() {
    let server = MockServer::start().await;
    // Nothing mounted: every request gets a 404

    let base = parse_base_url(&format!("{}/", server.uri())).unwrap();
    let count = discover_page_count(&client_for(&server), &base, 10, 50).await;
    assert_eq!(count, 10);
}

#[tokio::test]
async fn test_refresh_persists_grown_count() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, 10, listing_page(&[], Some(11))).await;
    mount_page(&server, 11, listing_page(&[], None)).await;

    std::fs::write(
        dir.path().join("state.json"),
        r#"{"pagesnum": 10, "url": "https://quotes.toscrape.com/"}"#,
    )
    .unwrap();
    let config = create_test_config(&server, dir.path(), 3);
    let client = build_http_client(&config.scraper).unwrap();

    let count = refresh_page_count(&client, &config).await.unwrap();
    assert_eq!(count, 11);
    assert_eq!(read_page_count(dir.path()), 11);

    let content = std::fs::read_to_string(dir.path().join("state.json")).unwrap();
    assert!(content.contains("quotes.toscrape.com"));
}

#[tokio::test]
async fn test_refresh_starts_from_initial_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, 3, listing_page(&[], None)).await;

    let config = create_test_config(&server, dir.path(), 3);
    let client = build_http_client(&config.scraper).unwrap();

    assert_eq!(refresh_page_count(&client, &config).await.unwrap(), 3);
    assert_eq!(read_page_count(dir.path()), 3);
}

#[tokio::test]
async fn test_endless_site_stops_at_walk_bound() {
    let server = MockServer::start().await;
    mount_endless(&server).await;

    let base = parse_base_url(&format!("{}/", server.uri())).unwrap();
    let client = client_for(&server);
    let walk = discover_page_count(&client, &base, 1, 5);
    let count = tokio::time::timeout(Duration::from_secs(10), walk)
        .await
        .expect("discovery must terminate");

    assert_eq!(count, 6);
    assert_eq!(server.received_requests().await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_next_control_pointing_backwards_stops_walk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/page/\d+/$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], Some(1))))
        .mount(&server)
        .await;

    let base = parse_base_url(&format!("{}/", server.uri())).unwrap();
    let client = client_for(&server);
    let walk = discover_page_count(&client, &base, 3, 50);
    let count = tokio::time::timeout(Duration::from_secs(10), walk)
        .await
        .expect("discovery must terminate");

    assert_eq!(count, 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_refresh_honors_configured_walk_bound() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_endless(&server).await;
    write_page_count(dir.path(), 10);

    let mut config = create_test_config(&server, dir.path(), 1);
    config.scraper.max_new_pages = 2;
    let client = build_http_client(&config.scraper).unwrap();

    assert_eq!(refresh_page_count(&client, &config).await.unwrap(), 12);
    assert_eq!(read_page_count(dir.path()), 12);
}
