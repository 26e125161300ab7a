//! Data models for feed entries, scraped articles and rendered results.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NewsItem`]: One `<item>` of an RSS feed
//! - [`ArticleContent`]: Text, lead image and extractive summary of a linked page
//! - [`DisplayImage`]: A renderable image, either fetched or the placeholder
//! - [`SummaryResult`]: Model-generated summary for a custom URL
//! - [`RequestContext`] and [`Selection`]: What the user asked for
//! - [`NewsCard`] and [`Edition`]: What the pipeline produced
//!
//! Nothing here outlives a single interaction.

use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NewsError;

/// A single headline as listed in a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// The headline text.
    pub title: String,
    /// Link to the article (for Google News, a redirecting link).
    pub link: String,
    /// Publisher of the article.
    pub source: NewsSource,
    /// The raw `pubDate` value, e.g. `Mon, 06 May 2025 14:30:00 GMT`.
    pub publish_date: String,
}

impl NewsItem {
    /// Parse [`NewsItem::publish_date`] as an RFC 2822 timestamp.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(self.publish_date.trim()).ok()
    }
}

/// Publisher attribution from the feed's `<source url="...">Name</source>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSource {
    pub name: String,
    pub url: Option<String>,
}

/// Content scraped from an article page.
///
/// `ArticleContent::default()` is the degraded value used when extraction
/// fails: every field absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleContent {
    /// Page title, from `og:title` or `<title>`.
    pub title: Option<String>,
    /// Main body text, paragraphs separated by blank lines.
    pub text: String,
    /// Absolute URL of the lead image.
    pub top_image_url: Option<String>,
    /// Sentences picked by the extractive summarizer.
    pub extractive_summary: Option<String>,
}

impl ArticleContent {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.text.trim().is_empty()
            && self.top_image_url.is_none()
            && self.extractive_summary.is_none()
    }
}

/// Raster formats recognized by the image resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    Ico,
}

impl ImageFormat {
    /// Identify a format from the leading magic bytes of a payload.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageFormat::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(ImageFormat::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(ImageFormat::Webp),
            [b'B', b'M', ..] => Some(ImageFormat::Bmp),
            [0x00, 0x00, 0x01, 0x00, ..] => Some(ImageFormat::Ico),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Ico => "ico",
        }
    }
}

/// The bundled "no image" asset.
pub const PLACEHOLDER_IMAGE: &[u8] = include_bytes!("../assets/no_image.png");

/// An image that can always be rendered.
///
/// Serialized without the payload: only the kind, origin, format and size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayImage {
    Fetched {
        url: String,
        format: ImageFormat,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    Placeholder,
}

impl DisplayImage {
    pub fn bytes(&self) -> &[u8] {
        match self {
            DisplayImage::Fetched { bytes, .. } => bytes,
            DisplayImage::Placeholder => PLACEHOLDER_IMAGE,
        }
    }

    pub fn format(&self) -> ImageFormat {
        match self {
            DisplayImage::Fetched { format, .. } => *format,
            DisplayImage::Placeholder => ImageFormat::Png,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DisplayImage::Placeholder)
    }
}

/// A model-generated summary of an arbitrary article URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub source_url: String,
    pub summary_text: String,
}

/// Google News topic sections offered as "favourite topics".
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "UPPER")]
#[serde(rename_all = "UPPERCASE")]
pub enum Topic {
    World,
    Nation,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Topic {
    /// The section name used in feed URLs and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::World => "WORLD",
            Topic::Nation => "NATION",
            Topic::Business => "BUSINESS",
            Topic::Technology => "TECHNOLOGY",
            Topic::Entertainment => "ENTERTAINMENT",
            Topic::Sports => "SPORTS",
            Topic::Science => "SCIENCE",
            Topic::Health => "HEALTH",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of request is being served, with its parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Trending,
    Category(Topic),
    Search(String),
    CustomUrl(String),
}

/// A complete, validated request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub mode: Mode,
    item_limit: usize,
}

impl RequestContext {
    /// Build a request; `item_limit` must be at least 1.
    pub fn new(mode: Mode, item_limit: usize) -> Result<Self, NewsError> {
        if item_limit == 0 {
            return Err(NewsError::Config(
                "item limit must be at least 1".to_string(),
            ));
        }
        Ok(Self { mode, item_limit })
    }

    pub fn item_limit(&self) -> usize {
        self.item_limit
    }

    /// Short human label used for logs and export file names.
    pub fn label(&self) -> String {
        match &self.mode {
            Mode::Trending => "trending".to_string(),
            Mode::Category(topic) => topic.as_str().to_lowercase(),
            Mode::Search(query) => format!("search {query}"),
            Mode::CustomUrl(_) => "custom url".to_string(),
        }
    }
}

/// The raw selection handed over by the presentation surface.
///
/// Unlike [`RequestContext`] it may be incomplete, in which case the
/// pipeline prompts the user instead of fetching anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Nothing,
    Trending { count: usize },
    Topic { topic: Option<Topic>, count: usize },
    Search { query: String, count: usize },
    CustomUrl { url: String },
}

/// Prompt shown when no mode has been chosen.
pub const PROMPT_SELECT_TYPE: &str = "Please select Type!!";
/// Prompt shown when the topic mode is chosen without a topic.
pub const PROMPT_CHOOSE_TOPIC: &str = "Please Choose the Topic";
/// Prompt shown for an empty search.
pub const PROMPT_SEARCH_TOPIC: &str = "Please write Topic Name to Search🔍";
/// Prompt shown for an empty custom URL.
pub const PROMPT_ENTER_URL: &str = "Please enter a valid URL to summarize.";

impl Selection {
    /// Turn the selection into a request, or return the prompt to show.
    pub fn into_request(self) -> Result<RequestContext, &'static str> {
        let (mode, count) = match self {
            Selection::Nothing => return Err(PROMPT_SELECT_TYPE),
            Selection::Trending { count } => (Mode::Trending, count),
            Selection::Topic { topic: None, .. } => return Err(PROMPT_CHOOSE_TOPIC),
            Selection::Topic {
                topic: Some(topic),
                count,
            } => (Mode::Category(topic), count),
            Selection::Search { query, count } => {
                if query.trim().is_empty() {
                    return Err(PROMPT_SEARCH_TOPIC);
                }
                (Mode::Search(query), count)
            }
            Selection::CustomUrl { url } => {
                if url.trim().is_empty() {
                    return Err(PROMPT_ENTER_URL);
                }
                (Mode::CustomUrl(url.trim().to_string()), 1)
            }
        };
        // Counts come from bounded controls; a zero still gets clamped up.
        Ok(RequestContext {
            mode,
            item_limit: count.max(1),
        })
    }
}

/// One rendered headline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsCard {
    /// 1-based position in the listing.
    pub position: usize,
    pub item: NewsItem,
    /// Extractive summary of the linked article, if extraction succeeded.
    pub summary: Option<String>,
    pub image: DisplayImage,
    /// Inline warning when the article could not be extracted.
    pub warning: Option<String>,
}

/// Everything produced by one interaction.
#[derive(Debug, Clone, Serialize)]
pub struct Edition {
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The local time of the run.
    pub local_time: String,
    /// What was requested, e.g. `trending` or `sports`.
    pub request: String,
    pub cards: Vec<NewsCard>,
    pub summary: Option<SummaryResult>,
}

impl Edition {
    pub fn new(request: impl Into<String>) -> Self {
        let now = chrono::Local::now();
        Self {
            local_date: now.date_naive().to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            request: request.into(),
            cards: Vec::new(),
            summary: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.summary.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_at_parses_rfc2822() {
        let item = NewsItem {
            publish_date: "Tue, 06 May 2025 14:30:00 GMT".to_string(),
            ..Default::default()
        };
        let parsed = item.published_at().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-05-06T14:30:00+00:00");
    }

    #[test]
    fn test_published_at_garbage_is_none() {
        let item = NewsItem {
            publish_date: "yesterday-ish".to_string(),
            ..Default::default()
        };
        assert!(item.published_at().is_none());
    }

    #[test]
    fn test_default_article_content_is_empty() {
        assert!(ArticleContent::default().is_empty());
        let content = ArticleContent {
            text: "Body".to_string(),
            ..Default::default()
        };
        assert!(!content.is_empty());
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"RIFF\x10\x00\x00\x00WEBPVP8 "), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::sniff(b"<!DOCTYPE html>"), None);
        assert_eq!(ImageFormat::sniff(&[]), None);
    }

    #[test]
    fn test_placeholder_is_a_png() {
        let image = DisplayImage::Placeholder;
        assert_eq!(ImageFormat::sniff(image.bytes()), Some(ImageFormat::Png));
        assert_eq!(image.format(), ImageFormat::Png);
        assert!(image.is_placeholder());
    }

    #[test]
    fn test_display_image_serializes_without_bytes() {
        let image = DisplayImage::Fetched {
            url: "https://example.com/a.jpg".to_string(),
            format: ImageFormat::Jpeg,
            bytes: vec![0xFF, 0xD8, 0xFF, 0x00],
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["kind"], "fetched");
        assert_eq!(json["format"], "jpeg");
        assert!(json.get("bytes").is_none());

        let json = serde_json::to_value(DisplayImage::Placeholder).unwrap();
        assert_eq!(json["kind"], "placeholder");
    }

    #[test]
    fn test_request_context_rejects_zero_limit() {
        assert!(RequestContext::new(Mode::Trending, 0).is_err());
        let ctx = RequestContext::new(Mode::Category(Topic::Sports), 5).unwrap();
        assert_eq!(ctx.item_limit(), 5);
        assert_eq!(ctx.label(), "sports");
    }

    #[test]
    fn test_incomplete_selections_prompt() {
        assert_eq!(Selection::Nothing.into_request(), Err(PROMPT_SELECT_TYPE));
        assert_eq!(
            Selection::Topic { topic: None, count: 5 }.into_request(),
            Err(PROMPT_CHOOSE_TOPIC)
        );
        assert_eq!(
            Selection::Search { query: "   ".to_string(), count: 5 }.into_request(),
            Err(PROMPT_SEARCH_TOPIC)
        );
        assert_eq!(
            Selection::CustomUrl { url: String::new() }.into_request(),
            Err(PROMPT_ENTER_URL)
        );
    }

    #[test]
    fn test_complete_selection_becomes_request() {
        let ctx = Selection::Topic {
            topic: Some(Topic::Health),
            count: 7,
        }
        .into_request()
        .unwrap();
        assert_eq!(ctx.mode, Mode::Category(Topic::Health));
        assert_eq!(ctx.item_limit(), 7);

        let ctx = Selection::CustomUrl {
            url: "  https://example.com/a  ".to_string(),
        }
        .into_request()
        .unwrap();
        assert_eq!(ctx.mode, Mode::CustomUrl("https://example.com/a".to_string()));
    }

    #[test]
    fn test_zero_count_selection_is_clamped() {
        let ctx = Selection::Trending { count: 0 }.into_request().unwrap();
        assert_eq!(ctx.mode, Mode::Trending);
        assert_eq!(ctx.item_limit(), 1);
    }

    #[test]
    fn test_topic_display_is_uppercase() {
        assert_eq!(Topic::Sports.to_string(), "SPORTS");
        assert_eq!(Topic::Entertainment.as_str(), "ENTERTAINMENT");
    }
}
