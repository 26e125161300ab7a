//! Markdown rendering of an edition.

use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::{DisplayImage, Edition, NewsCard};
use crate::outputs::edition_stem;

/// Escape text placed inside `[...]` so brackets in headlines keep links intact.
fn escape_link_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn card_to_markdown(card: &NewsCard) -> String {
    let mut md = format!("## ({}) {}\n\n", card.position, card.item.title);

    if let Some(warning) = &card.warning {
        md.push_str(&format!("> ⚠️ {warning}\n\n"));
    }
    match &card.image {
        DisplayImage::Fetched { url, .. } => {
            md.push_str(&format!("![{}]({})\n\n", escape_link_text(&card.item.title), url))
        }
        DisplayImage::Placeholder => md.push_str("_No image available_\n\n"),
    }
    if let Some(summary) = &card.summary {
        md.push_str(summary);
        md.push_str("\n\n");
    }
    let source = if card.item.source.name.is_empty() {
        "source"
    } else {
        card.item.source.name.as_str()
    };
    md.push_str(&format!(
        "[Read more at {}...]({})\n\n",
        escape_link_text(source),
        card.item.link
    ));

    let published = card
        .item
        .published_at()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| card.item.publish_date.clone());
    if !published.is_empty() {
        md.push_str(&format!("*Published Date: {published}*\n\n"));
    }
    md
}

/// Render an [`Edition`] as a Markdown document.
pub fn edition_to_markdown(edition: &Edition) -> String {
    let mut md = format!(
        "# RapidRecap: {}\n\n*{} {}*\n\n",
        edition.request, edition.local_date, edition.local_time
    );

    if let Some(summary) = &edition.summary {
        md.push_str(&format!("## Summary of <{}>\n\n", summary.source_url));
        md.push_str(&summary.summary_text);
        md.push_str("\n\n");
    }
    for card in &edition.cards {
        md.push_str(&card_to_markdown(card));
    }
    md
}

/// Write the Markdown rendering to `{markdown_output_dir}/{date}_{time}-{request}.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_edition(edition: &Edition, markdown_output_dir: &str) -> Result<String> {
    fs::create_dir_all(markdown_output_dir).await?;
    let path = format!(
        "{}/{}_{}.md",
        markdown_output_dir.trim_end_matches('/'),
        edition.local_date,
        edition_stem(edition)
    );
    fs::write(&path, edition_to_markdown(edition)).await?;
    info!(%path, "Wrote Markdown edition");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageFormat, NewsItem, NewsSource, SummaryResult};

    fn card() -> NewsCard {
        NewsCard {
            position: 2,
            item: NewsItem {
                title: "Markets rally".to_string(),
                link: "https://news.test/markets".to_string(),
                source: NewsSource {
                    name: "Reuters".to_string(),
                    url: None,
                },
                publish_date: "Tue, 06 May 2025 13:00:00 GMT".to_string(),
            },
            summary: Some("Stocks rose for a third day.".to_string()),
            image: DisplayImage::Fetched {
                url: "https://img.test/m.jpg".to_string(),
                format: ImageFormat::Jpeg,
                bytes: vec![],
            },
            warning: None,
        }
    }

    #[test]
    fn test_card_markdown() {
        let md = card_to_markdown(&card());
        assert!(md.starts_with("## (2) Markets rally"));
        assert!(md.contains("![Markets rally](https://img.test/m.jpg)"));
        assert!(md.contains("Stocks rose for a third day."));
        assert!(md.contains("[Read more at Reuters...](https://news.test/markets)"));
        assert!(md.contains("*Published Date: 2025-05-06T13:00:00+00:00*"));
    }

    #[test]
    fn test_brackets_in_titles_are_escaped() {
        let mut c = card();
        c.item.title = "[LIVE] Markets rally [updated]".to_string();
        c.item.source.name = "Reuters [wire]".to_string();
        let md = card_to_markdown(&c);
        assert!(md.contains(r"![\[LIVE\] Markets rally \[updated\]](https://img.test/m.jpg)"));
        assert!(md.contains(r"[Read more at Reuters \[wire\]...](https://news.test/markets)"));
    }

    #[test]
    fn test_degraded_card_markdown() {
        let mut c = card();
        c.summary = None;
        c.image = DisplayImage::Placeholder;
        c.warning = Some("network error: reset".to_string());
        c.item.publish_date = "sometime".to_string();
        let md = card_to_markdown(&c);
        assert!(md.contains("> ⚠️ network error: reset"));
        assert!(md.contains("_No image available_"));
        assert!(md.contains("*Published Date: sometime*"));
    }

    #[test]
    fn test_edition_markdown_with_summary() {
        let mut edition = Edition::new("custom url");
        edition.summary = Some(SummaryResult {
            source_url: "https://news.test/story".to_string(),
            summary_text: "A concise recap.".to_string(),
        });
        let md = edition_to_markdown(&edition);
        assert!(md.starts_with("# RapidRecap: custom url"));
        assert!(md.contains("## Summary of <https://news.test/story>"));
        assert!(md.contains("A concise recap."));
    }

    #[tokio::test]
    async fn test_write_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let mut edition = Edition::new("trending");
        edition.local_date = "2025-05-06".to_string();
        edition.local_time = "08:15:00".to_string();
        edition.cards.push(card());

        let path = write_edition(&edition, dir.path().to_str().unwrap()).await.unwrap();
        assert!(path.ends_with("2025-05-06_08-15-00-trending.md"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("Markets rally"));
    }
}
