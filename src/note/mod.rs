// Note platform scraping gateway

pub mod http;

pub use http::NoteScraperHttpGateway;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to fetch {url}: status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to parse feed: {0}")]
    Feed(String),
}

/// One entry of an account's RSS feed. `published_at` is `None` when
/// the item carried an unparseable pubDate.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NoteArticleSummary {
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Title and stripped body text of a single scraped page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedArticle {
    pub title: String,
    pub content: String,
}

/// Fetches article listings and bodies from the note publishing platform.
#[async_trait]
pub trait NoteScraper: Send + Sync {
    async fn fetch_article_list(&self, account: &str)
        -> Result<Vec<NoteArticleSummary>, ScrapeError>;

    async fn fetch_article_content(&self, url: &str) -> Result<ScrapedArticle, ScrapeError>;
}
