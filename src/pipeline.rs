//! Request orchestration: from a user selection to rendered results.
//!
//! Each interaction is one linear run:
//!
//! 1. **Selection**: incomplete selections only produce a prompt
//! 2. **Feed**: resolve the feed URL for the mode and fetch its items
//! 3. **Cards**: for the first `item_limit` items, extract the article,
//!    resolve its image and render a card, one item at a time
//!
//! The custom-URL mode skips the feed: the page is extracted and its text is
//! sent to the summarization model.
//!
//! # Failure handling
//!
//! | Failure | Effect |
//! |---------|--------|
//! | feed fetch | one blocking error message, no cards |
//! | empty feed | `No News found for ...`, no cards |
//! | article extraction | inline error, card still rendered with empty content |
//! | image | placeholder, nothing shown to the user |
//! | custom URL | one generic error message |

use futures::stream::{self, StreamExt};
use std::pin::pin;
use tracing::{debug, error, info, instrument, warn};

use crate::article::ArticleSource;
use crate::error::{NewsError, Result};
use crate::feeds::{FeedSource, FeedUrls};
use crate::images::ImageSource;
use crate::models::{
    ArticleContent, Edition, Mode, NewsCard, NewsItem, RequestContext, Selection, SummaryResult,
};
use crate::summarizer::Summarize;
use crate::utils::capitalize;

/// Shown for any failure in the custom-URL flow.
pub const CUSTOM_URL_FAILURE: &str =
    "Error summarizing URL. Please check the URL or try another one.";

/// Where results go. Implemented by the terminal renderer.
pub trait Surface {
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn subheader(&mut self, message: &str);
    fn card(&mut self, card: &NewsCard);
    fn summary(&mut self, result: &SummaryResult);
}

/// The four request modes wired to their collaborators.
pub struct Pipeline<F, A, I, S> {
    feeds: F,
    articles: A,
    images: I,
    summarizer: S,
    urls: FeedUrls,
}

impl<F, A, I, S> Pipeline<F, A, I, S>
where
    F: FeedSource,
    A: ArticleSource,
    I: ImageSource,
    S: Summarize,
{
    pub fn new(feeds: F, articles: A, images: I, summarizer: S, urls: FeedUrls) -> Self {
        Self {
            feeds,
            articles,
            images,
            summarizer,
            urls,
        }
    }

    /// Serve one selection, rendering to `surface` as results arrive.
    #[instrument(level = "info", skip(self, surface))]
    pub async fn run(&self, selection: Selection, surface: &mut impl Surface) -> Edition {
        let request = match selection.into_request() {
            Ok(request) => request,
            Err(prompt) => {
                info!(prompt, "Selection incomplete");
                surface.warning(prompt);
                return Edition::new("none");
            }
        };
        self.serve(&request, surface).await
    }

    /// Serve a complete request.
    pub async fn serve(&self, request: &RequestContext, surface: &mut impl Surface) -> Edition {
        let mut edition = Edition::new(request.label());
        match &request.mode {
            Mode::CustomUrl(url) => {
                if let Some(result) = self.custom_url(url, surface).await {
                    edition.summary = Some(result);
                }
            }
            mode => {
                let Some(feed_url) = self.urls.for_mode(mode) else {
                    return edition;
                };
                let (heading, empty_label) = headings(mode);
                if matches!(mode, Mode::Trending) {
                    surface.subheader(&heading);
                }
                let items = match self.feeds.fetch(&feed_url).await {
                    Ok(items) => items,
                    Err(e) => {
                        error!(%feed_url, error = %e, "Feed fetch failed");
                        surface.error(&format!("Could not fetch news: {e}"));
                        return edition;
                    }
                };
                if items.is_empty() {
                    warn!(%feed_url, "Feed returned no items");
                    surface.error(&format!("No News found for {empty_label}"));
                    return edition;
                }
                if !matches!(mode, Mode::Trending) {
                    surface.subheader(&heading);
                }
                edition.cards = self
                    .display_news(items, request.item_limit(), surface)
                    .await;
            }
        }
        edition
    }

    /// Render at most `limit` cards from `items`, in feed order.
    ///
    /// A failed extraction is reported inline and the card is rendered with
    /// empty content; the remaining items are still processed.
    #[instrument(level = "info", skip(self, items, surface), fields(available = items.len()))]
    pub async fn display_news(
        &self,
        items: Vec<NewsItem>,
        limit: usize,
        surface: &mut impl Surface,
    ) -> Vec<NewsCard> {
        let mut cards = pin!(stream::iter(items.into_iter().take(limit).enumerate()).then(
            |(i, item)| async move {
                let (content, warning) = match self.articles.extract(&item.link).await {
                    Ok(content) => {
                        if content.is_empty() {
                            debug!(index = i, link = %item.link, "Article yielded no content");
                        }
                        (content, None)
                    }
                    Err(e) => {
                        warn!(index = i, link = %item.link, error = %e, "Article extraction failed");
                        (ArticleContent::default(), Some(e.to_string()))
                    }
                };
                let image = self.images.resolve(content.top_image_url.as_deref()).await;
                NewsCard {
                    position: i + 1,
                    item,
                    summary: content.extractive_summary,
                    image,
                    warning,
                }
            }
        ));

        let mut rendered = Vec::new();
        while let Some(card) = cards.next().await {
            if let Some(warning) = &card.warning {
                surface.error(warning);
            }
            surface.card(&card);
            rendered.push(card);
        }
        info!(rendered = rendered.len(), "Displayed news cards");
        rendered
    }

    /// Extract the page at `url` and summarize its text with the model.
    #[instrument(level = "info", skip(self))]
    pub async fn summarize_url(&self, url: &str) -> Result<SummaryResult> {
        let content = self.articles.extract(url).await?;
        if content.text.trim().is_empty() {
            return Err(NewsError::Parse(format!("no article text found at {url}")));
        }
        let summary_text = self.summarizer.summarize(&content.text).await?;
        Ok(SummaryResult {
            source_url: url.to_string(),
            summary_text,
        })
    }

    async fn custom_url(&self, url: &str, surface: &mut impl Surface) -> Option<SummaryResult> {
        match self.summarize_url(url).await {
            Ok(result) => {
                surface.success("Summary:");
                surface.summary(&result);
                Some(result)
            }
            Err(e) => {
                error!(%url, error = %e, "Custom URL summarization failed");
                surface.error(CUSTOM_URL_FAILURE);
                None
            }
        }
    }
}

/// Subheader and "no news" label for a feed mode.
fn headings(mode: &Mode) -> (String, String) {
    match mode {
        Mode::Trending => (
            "✅ Here is the Trending🔥 news for you".to_string(),
            "Trending🔥 News".to_string(),
        ),
        Mode::Category(topic) => (
            format!("✅ Here are the some {topic} News for you"),
            topic.to_string(),
        ),
        Mode::Search(query) => (
            format!("✅ Here are the some {} News for you", capitalize(query)),
            query.clone(),
        ),
        Mode::CustomUrl(url) => (String::new(), url.clone()),
    }
}
