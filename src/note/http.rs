//! HTTP gateway for the note platform
//!
//! Article listings come from the account RSS feed; article bodies are
//! scraped from the page HTML with regex-based tag stripping. Fetches
//! are sequential with plain error propagation.

use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{NoteArticleSummary, NoteScraper, ScrapeError, ScrapedArticle};
use crate::config::NoteConfig;

pub struct NoteScraperHttpGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Option<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default, rename = "item")]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: String,
    link: String,
    #[serde(rename = "pubDate")]
    pub_date: String,
}

impl NoteScraperHttpGateway {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &NoteConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl NoteScraper for NoteScraperHttpGateway {
    async fn fetch_article_list(
        &self,
        account: &str,
    ) -> Result<Vec<NoteArticleSummary>, ScrapeError> {
        let url = format!("{}/{}/rss", self.base_url, account);
        debug!(%url, "Fetching note RSS feed");

        let xml = self.fetch_text(&url).await?;
        parse_feed(&xml)
    }

    async fn fetch_article_content(&self, url: &str) -> Result<ScrapedArticle, ScrapeError> {
        debug!(%url, "Fetching note article");

        let html = self.fetch_text(url).await?;
        Ok(ScrapedArticle {
            title: extract_title(&html),
            content: extract_content(&html),
        })
    }
}

fn parse_feed(xml: &str) -> Result<Vec<NoteArticleSummary>, ScrapeError> {
    let rss: Rss = quick_xml::de::from_str(xml).map_err(|e| ScrapeError::Feed(e.to_string()))?;

    let items = rss.channel.map(|c| c.items).unwrap_or_default();
    Ok(items
        .into_iter()
        .map(|item| NoteArticleSummary {
            published_at: parse_pub_date(&item.pub_date),
            title: item.title,
            url: item.link,
        })
        .collect())
}

/// A malformed pubDate degrades to `None` so one bad item does not
/// hide the rest of the feed.
fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc2822(value.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(pub_date = %value, error = %e, "Ignoring malformed pubDate in feed item");
            None
        }
    }
}

fn extract_title(html: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").unwrap());

    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn extract_content(html: &str) -> String {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    static STYLE: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();
    static SPACE: OnceLock<Regex> = OnceLock::new();

    let script = SCRIPT.get_or_init(|| Regex::new(r"(?is)<script.*?</script>").unwrap());
    let style = STYLE.get_or_init(|| Regex::new(r"(?is)<style.*?</style>").unwrap());
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    let space = SPACE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let without_script = script.replace_all(html, "");
    let without_style = style.replace_all(&without_script, "");
    let without_tags = tag.replace_all(&without_style, " ");
    space.replace_all(&without_tags, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>テストユーザーのnote</title>
    <link>https://note.com/testuser</link>
    <item>
      <title>記事タイトル1</title>
      <link>https://note.com/testuser/n/n001</link>
      <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
    </item>
    <item>
      <title>記事タイトル2</title>
      <link>https://note.com/testuser/n/n002</link>
      <pubDate>Tue, 02 Jan 2024 00:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>記事のタイトル</title>
    <style>body { color: red; }</style>
  </head>
  <body>
    <script>console.log("test");</script>
    <h1>見出し</h1>
    <p>本文テキスト1</p>
    <p>本文テキスト2</p>
  </body>
</html>"#;

    #[test]
    fn parse_feed_returns_all_items() {
        let items = parse_feed(SAMPLE_RSS).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "記事タイトル1");
        assert_eq!(items[0].url, "https://note.com/testuser/n/n001");
        assert_eq!(
            items[0].published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(items[1].title, "記事タイトル2");
    }

    #[test]
    fn parse_feed_handles_a_single_item() {
        let xml = r#"<rss version="2.0"><channel>
            <item>
              <title>唯一の記事</title>
              <link>https://note.com/testuser/n/n001</link>
              <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
            </item>
        </channel></rss>"#;

        let items = parse_feed(xml).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "唯一の記事");
    }

    #[test]
    fn parse_feed_handles_an_empty_channel() {
        let xml = r#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        assert_eq!(parse_feed(xml).unwrap(), vec![]);
    }

    #[test]
    fn parse_feed_keeps_items_with_a_malformed_pub_date() {
        let xml = r#"<rss version="2.0"><channel>
            <item>
              <title>壊れた日付の記事</title>
              <link>https://note.com/u/n/n001</link>
              <pubDate>not a date</pubDate>
            </item>
            <item>
              <title>正常な記事</title>
              <link>https://note.com/u/n/n002</link>
              <pubDate>Tue, 02 Jan 2024 00:00:00 +0000</pubDate>
            </item>
        </channel></rss>"#;

        let items = parse_feed(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].published_at, None);
        assert_eq!(
            items[1].published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn extract_title_reads_the_title_tag() {
        assert_eq!(extract_title(SAMPLE_HTML), "記事のタイトル");
        assert_eq!(extract_title("<p>no title here</p>"), "");
    }

    #[test]
    fn extract_content_strips_script_style_and_tags() {
        let content = extract_content(SAMPLE_HTML);
        assert!(content.contains("見出し"));
        assert!(content.contains("本文テキスト1 本文テキスト2"));
        assert!(!content.contains("console.log"));
        assert!(!content.contains("color: red"));
        assert!(!content.contains('<'));
    }

    #[tokio::test]
    async fn fetch_article_list_hits_the_account_rss_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/testuser/rss")
            .with_status(200)
            .with_header("content-type", "application/xml")
            .with_body(SAMPLE_RSS)
            .create_async()
            .await;

        let gateway = NoteScraperHttpGateway::new(server.url());
        let items = gateway.fetch_article_list("testuser").await.unwrap();

        assert_eq!(items.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_article_list_propagates_http_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/testuser/rss")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let gateway = NoteScraperHttpGateway::new(server.url());
        let err = gateway.fetch_article_list("testuser").await.unwrap_err();

        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn fetch_article_content_scrapes_title_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/testuser/n/n001")
            .with_status(200)
            .with_body(SAMPLE_HTML)
            .create_async()
            .await;

        let gateway = NoteScraperHttpGateway::new(server.url());
        let url = format!("{}/testuser/n/n001", server.url());
        let article = gateway.fetch_article_content(&url).await.unwrap();

        assert_eq!(article.title, "記事のタイトル");
        assert!(article.content.contains("本文テキスト1"));
    }
}
