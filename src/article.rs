//! Article download and main-content extraction.
//!
//! Extraction runs three steps in sequence: download the page, parse the
//! HTML into text and a lead image, then compute an extractive summary. Any
//! step failing fails the whole extraction; callers decide whether that
//! degrades a card or aborts a request.
//!
//! # Main text
//!
//! Candidate containers are tried from most to least specific: `article`,
//! `[itemprop=articleBody]`, then `main`. The first selector with a match
//! holding a meaningful amount of paragraph text wins, taking its densest
//! match. If none qualifies, every `<p>` in the document is used instead.
//!
//! # Lead image
//!
//! Looked up in order: `og:image`, `twitter:image`, `link[rel=image_src]`,
//! then the first `<img>` inside the chosen container. Relative URLs are
//! resolved against the page URL.

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{NewsError, Result};
use crate::extractive;
use crate::models::ArticleContent;

/// A container needs at least this many characters of paragraph text to win.
const MIN_CONTAINER_CHARS: usize = 200;

struct Selectors {
    containers: Vec<Selector>,
    paragraph: Selector,
    image: Selector,
    title: Selector,
    og_title: Selector,
    meta_images: Vec<(Selector, &'static str)>,
}

static SELECTORS: Lazy<Selectors> = Lazy::new(|| {
    let parse = |s: &str| Selector::parse(s).expect("static selector");
    Selectors {
        containers: vec![
            parse("article"),
            parse("[itemprop=articleBody]"),
            parse("main"),
        ],
        paragraph: parse("p"),
        image: parse("img[src]"),
        title: parse("title"),
        og_title: parse(r#"meta[property="og:title"][content]"#),
        meta_images: vec![
            (parse(r#"meta[property="og:image"][content]"#), "content"),
            (parse(r#"meta[name="twitter:image"][content]"#), "content"),
            (parse(r#"meta[property="twitter:image"][content]"#), "content"),
            (parse(r#"link[rel="image_src"][href]"#), "href"),
        ],
    }
});

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn paragraphs(root: ElementRef<'_>) -> Vec<String> {
    root.select(&SELECTORS.paragraph)
        .map(|p| normalize(&p.text().collect::<String>()))
        .filter(|p| !p.is_empty())
        .collect()
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("data:") {
        return None;
    }
    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => Url::parse(href).ok().map(|u| u.to_string()),
    }
}

fn page_title(document: &Html) -> Option<String> {
    document
        .select(&SELECTORS.og_title)
        .filter_map(|m| m.value().attr("content"))
        .map(normalize)
        .find(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(&SELECTORS.title)
                .map(|t| normalize(&t.text().collect::<String>()))
                .find(|t| !t.is_empty())
        })
}

/// Parse an article page. `page_url` is used to resolve relative image links.
pub fn parse_article(html: &str, page_url: Option<&str>) -> ArticleContent {
    let document = Html::parse_document(html);
    let base = page_url.and_then(|u| Url::parse(u).ok());

    // Most specific selector first; within it, the densest substantial match.
    let container = SELECTORS.containers.iter().find_map(|sel| {
        document
            .select(sel)
            .map(|el| {
                let paras = paragraphs(el);
                let chars: usize = paras.iter().map(|p| p.len()).sum();
                (el, paras, chars)
            })
            .filter(|(_, _, chars)| *chars >= MIN_CONTAINER_CHARS)
            .max_by_key(|(_, _, chars)| *chars)
    });

    let (container, paras) = match container {
        Some((el, paras, _)) => (Some(el), paras),
        None => (None, paragraphs(document.root_element())),
    };
    let text = paras.join("\n\n");

    let top_image_url = SELECTORS
        .meta_images
        .iter()
        .flat_map(|(sel, attr)| document.select(sel).filter_map(move |el| el.value().attr(attr)))
        .find_map(|href| resolve(base.as_ref(), href))
        .or_else(|| {
            container.and_then(|el| {
                el.select(&SELECTORS.image)
                    .filter_map(|img| img.value().attr("src"))
                    .find_map(|src| resolve(base.as_ref(), src))
            })
        });

    let title = page_title(&document);
    let extractive_summary = extractive::summarize(
        title.as_deref().unwrap_or_default(),
        &text,
        extractive::SUMMARY_SENTENCES,
    );

    ArticleContent {
        title,
        text,
        top_image_url,
        extractive_summary,
    }
}

/// Anything that can turn an article URL into [`ArticleContent`].
pub trait ArticleSource {
    async fn extract(&self, article_url: &str) -> Result<ArticleContent>;
}

/// Downloads article pages over HTTP and parses them.
#[derive(Debug, Clone)]
pub struct HttpArticleExtractor {
    client: Client,
}

impl HttpArticleExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ArticleSource for HttpArticleExtractor {
    #[instrument(level = "info", skip(self))]
    async fn extract(&self, article_url: &str) -> Result<ArticleContent> {
        let url = Url::parse(article_url.trim())
            .map_err(|e| NewsError::Parse(format!("invalid article URL {article_url:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NewsError::Parse(format!(
                "unsupported URL scheme {:?}",
                url.scheme()
            )));
        }

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Network(format!(
                "article download failed with HTTP {status} for {url}"
            )));
        }
        // Redirects (e.g. Google News links) land on the publisher's page.
        let final_url = response.url().to_string();
        let html = response.text().await?;
        debug!(bytes = html.len(), %final_url, "Downloaded article");

        let content = parse_article(&html, Some(&final_url));
        info!(
            text_bytes = content.text.len(),
            has_image = content.top_image_url.is_some(),
            has_summary = content.extractive_summary.is_some(),
            "Parsed article"
        );
        Ok(content)
    }
}
