//! Shared fixtures for the integration tests
//!
//! Builds listing and author pages shaped like the real quotes site and
//! mounts them on a wiremock server.

#![allow(dead_code)]

use quote_harvest::config::{Config, OutputConfig, ScraperConfig};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One quote as it should appear on a listing page
pub struct QuoteFixture<'a> {
    pub text: &'a str,
    pub author: &'a str,
    pub tags: &'a [&'a str],
}

/// The biography link the site uses for an author
pub fn author_slug(author: &str) -> String {
    format!("/author/{}", author.replace(' ', "-").replace('.', "-"))
}

pub fn quote_block(quote: &QuoteFixture<'_>) -> String {
    format!(
        r#"<div class="quote" itemscope itemtype="http://schema.org/CreativeWork">
        <span class="text" itemprop="text">“{}”</span>
        <span>by <small class="author" itemprop="author">{}</small>
        <a href="{}">(about)</a>
        </span>
        <div class="tags">
            Tags:
            <meta class="keywords" itemprop="keywords" content="{}" />
        </div>
    </div>"#,
        quote.text,
        quote.author,
        author_slug(quote.author),
        quote.tags.join(",")
    )
}

/// A listing page; `next` is the page the pager links to, if any
pub fn listing_page(quotes: &[QuoteFixture<'_>], next: Option<u32>) -> String {
    let blocks: String = quotes.iter().map(quote_block).collect();
    let pager = match next {
        Some(page) => format!(
            r#"<nav><ul class="pager"><li class="next"><a href="/page/{}/">Next <span aria-hidden="true">&rarr;</span></a></li></ul></nav>"#,
            page
        ),
        None => r#"<nav><ul class="pager"></ul></nav>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="UTF-8"><title>Quotes to Scrape</title></head>
<body><div class="container">
    <div class="row header-box">
        <div class="col-md-8"><h1><a href="/">Quotes to Scrape</a></h1></div>
        <div class="col-md-4"><p><a href="/login">Login</a></p></div>
    </div>
    <div class="row">
        <div class="col-md-8">{}{}</div>
        <div class="col-md-4 tags-box"><h2>Top Ten tags</h2></div>
    </div>
</div></body></html>"#,
        blocks, pager
    )
}

/// A page that lost its content column
pub fn broken_page() -> String {
    r#"<html><body><div class="container">
        <div class="row header-box"><div class="col-md-8"><h1>Quotes to Scrape</h1></div></div>
        <p>Under maintenance</p>
    </div></body></html>"#
        .to_string()
}

pub fn author_page(name: &str, description: &str) -> String {
    format!(
        r#"<html><body><div class="container"><div class="author-details">
        <h3 class="author-title">{}</h3>
        <p><strong>Born:</strong> <span class="author-born-date">December 16, 1775</span></p>
        <div class="author-description">{}</div>
    </div></div></body></html>"#,
        name, description
    )
}

/// The biography text `parse_author_bio` extracts from `author_page`
pub fn expected_bio(name: &str, description: &str) -> String {
    let html = author_page(name, description);
    quote_harvest::crawler::parse_author_bio(&html).unwrap()
}

pub fn create_test_config(server: &MockServer, dir: &Path, initial_pages: u32) -> Config {
    Config {
        scraper: ScraperConfig {
            base_url: format!("{}/", server.uri()),
            initial_pages,
            max_new_pages: 50,
            workers: Some(4),
            request_timeout_secs: 5,
            user_agent: "TestHarvester/1.0".to_string(),
        },
        output: OutputConfig {
            database_path: dir.join("quotes.db").display().to_string(),
            export_dir: dir.join("exports").display().to_string(),
            json_filename: "quotes".to_string(),
            state_path: dir.join("state.json").display().to_string(),
            database_enabled: true,
            logs_dir: None,
        },
    }
}

pub async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_seed(server: &MockServer) {
    mount_html(server, "/", listing_page(&[], Some(2))).await;
}

pub async fn mount_page(server: &MockServer, page: u32, body: String) {
    mount_html(server, &format!("/page/{}/", page), body).await;
}

/// Mounts an author page that must be requested exactly `times` times
pub async fn mount_author_expect(
    server: &MockServer,
    name: &str,
    description: &str,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(author_slug(name)))
        .respond_with(ResponseTemplate::new(200).set_body_string(author_page(name, description)))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_author(server: &MockServer, name: &str, description: &str) {
    mount_html(server, &author_slug(name), author_page(name, description)).await;
}

pub fn write_page_count(dir: &Path, count: u32) {
    std::fs::write(
        dir.join("state.json"),
        format!(r#"{{"pagesnum": {}}}"#, count),
    )
    .unwrap();
}

pub fn read_page_count(dir: &Path) -> u64 {
    let content = std::fs::read_to_string(dir.join("state.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    value["pagesnum"].as_u64().unwrap()
}
