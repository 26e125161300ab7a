//! Google News RSS feed fetching and parsing.
//!
//! Three feed URL variants are supported, all rooted at a configurable base
//! (`https://news.google.com` by default):
//!
//! | Request | URL |
//! |---------|-----|
//! | Top headlines | `{base}/news/rss` |
//! | Topic section | `{base}/news/rss/headlines/section/topic/{TOPIC}` |
//! | Keyword search | `{base}/rss/search?q={query}` |
//!
//! All variants return RSS 2.0 and share one parser: every `<item>` becomes a
//! [`NewsItem`] in feed order.

use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{NewsError, Result};
use crate::models::{Mode, NewsItem, NewsSource, Topic};

/// Builds feed URLs for each request mode.
#[derive(Debug, Clone)]
pub struct FeedUrls {
    base_url: String,
}

impl FeedUrls {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn top(&self) -> String {
        format!("{}/news/rss", self.base_url)
    }

    pub fn category(&self, topic: Topic) -> String {
        format!("{}/news/rss/headlines/section/topic/{}", self.base_url, topic.as_str())
    }

    /// Spaces are stripped from the query before it is percent-encoded.
    pub fn search(&self, query: &str) -> String {
        let compact: String = query.chars().filter(|c| *c != ' ').collect();
        format!("{}/rss/search?q={}", self.base_url, urlencoding::encode(&compact))
    }

    /// Feed URL for a mode, or `None` for modes that do not read a feed.
    pub fn for_mode(&self, mode: &Mode) -> Option<String> {
        match mode {
            Mode::Trending => Some(self.top()),
            Mode::Category(topic) => Some(self.category(*topic)),
            Mode::Search(query) => Some(self.search(query)),
            Mode::CustomUrl(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    source: Option<RawSource>,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(rename = "@url", default)]
    url: Option<String>,
    #[serde(rename = "$text", default)]
    name: String,
}

impl From<RawItem> for NewsItem {
    fn from(raw: RawItem) -> Self {
        let source = raw
            .source
            .map(|s| NewsSource {
                name: s.name.trim().to_string(),
                url: s.url,
            })
            .unwrap_or_default();
        NewsItem {
            title: raw.title.trim().to_string(),
            link: raw.link.trim().to_string(),
            source,
            publish_date: raw.pub_date.trim().to_string(),
        }
    }
}

/// Parse an RSS 2.0 document into news items, preserving feed order.
///
/// # Errors
///
/// Returns [`NewsError::Parse`] if the document is not well-formed XML or has
/// no `<channel>`.
pub fn parse_feed(xml: &str) -> Result<Vec<NewsItem>> {
    let rss: Rss = from_str(xml)?;
    Ok(rss.channel.items.into_iter().map(NewsItem::from).collect())
}

/// Anything that can turn a feed URL into news items.
pub trait FeedSource {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<NewsItem>>;
}

/// Fetches feeds over HTTP. No retries: failures go straight to the caller.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl FeedSource for HttpFeedSource {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, feed_url: &str) -> Result<Vec<NewsItem>> {
        let response = self.client.get(feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Network(format!(
                "feed returned HTTP {status}"
            )));
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Downloaded feed");

        let items = parse_feed(&body)?;
        info!(count = items.len(), "Parsed feed items");
        Ok(items)
    }
}
