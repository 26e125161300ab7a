//! Plain-text rendering of prompts, cards and summaries.
//!
//! This is the interactive surface of the CLI. Logs go to stderr, so stdout
//! carries only what the user asked for.

use std::io::Write;
use tracing::warn;

use crate::models::{DisplayImage, NewsCard, SummaryResult};
use crate::pipeline::Surface;

pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

fn image_line(image: &DisplayImage) -> String {
    match image {
        DisplayImage::Fetched { url, format, bytes } => {
            format!("[image: {} {} bytes, {}]", format.extension(), bytes.len(), url)
        }
        DisplayImage::Placeholder => "[image: no image available]".to_string(),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text block for one card.
pub fn render_card(card: &NewsCard) -> String {
    let mut lines = vec![
        format!("({}) {}", card.position, card.item.title),
        image_line(&card.image),
    ];
    if let Some(summary) = &card.summary {
        lines.push(indent(summary));
    }
    let source = if card.item.source.name.is_empty() {
        "source"
    } else {
        card.item.source.name.as_str()
    };
    lines.push(format!("Read more at {}... {}", source, card.item.link));
    lines.push(format!("Published Date: {}", card.item.publish_date));
    lines.join("\n") + "\n"
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn warning(&mut self, message: &str) {
        self.emit(&format!("⚠ {message}"));
    }

    fn error(&mut self, message: &str) {
        self.emit(&format!("✖ {message}"));
    }

    fn success(&mut self, message: &str) {
        self.emit(&format!("✔ {message}"));
    }

    fn subheader(&mut self, message: &str) {
        self.emit(&format!("\n{message}\n"));
    }

    fn card(&mut self, card: &NewsCard) {
        self.emit(&render_card(card));
    }

    fn summary(&mut self, result: &SummaryResult) {
        self.emit(&result.summary_text);
    }
}
