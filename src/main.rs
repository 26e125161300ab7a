//! # RapidRecap
//!
//! Summarized news from Google News RSS feeds. Headlines are fetched for
//! trending news, a topic section or a keyword search; every linked article
//! is scraped for its text and lead image and condensed with an extractive
//! summary. Any article URL can also be summarized by a hosted
//! sequence-to-sequence model.
//!
//! ## Usage
//!
//! ```sh
//! rapid_recap trending -n 10
//! rapid_recap topic SPORTS
//! rapid_recap search climate change
//! rapid_recap url https://example.com/story
//! ```
//!
//! ## Architecture
//!
//! Each invocation runs one linear pipeline:
//! 1. **Feed**: Fetch the RSS feed for the selected mode
//! 2. **Extraction**: Download each article, pull its text and image, one at a time
//! 3. **Rendering**: Print a card per article; optionally export JSON, Markdown and images
//!
//! The custom-URL mode replaces steps 1 and 2 with a single extraction followed
//! by a call to the summarization model.

use clap::Parser;
use std::error::Error;
use std::io;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod article;
mod cli;
mod config;
mod error;
mod extractive;
mod feeds;
mod images;
mod models;
mod outputs;
mod pipeline;
mod summarizer;
mod utils;

use article::HttpArticleExtractor;
use cli::Cli;
use config::AppConfig;
use feeds::{FeedUrls, HttpFeedSource};
use images::HttpImageResolver;
use outputs::terminal::TerminalSurface;
use pipeline::Pipeline;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("rapid_recap starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(command = ?args.command, "Parsed CLI arguments");

    // ---- Load config ----
    let config = AppConfig::load(args.config.as_deref())
        .await?
        .with_overrides(args.model_endpoint.clone(), args.api_token.clone());

    // Early check: export directories must be writable before any fetching.
    for dir in [&args.json_output_dir, &args.markdown_output_dir, &args.image_dir]
        .into_iter()
        .flatten()
    {
        if let Err(e) = utils::ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable");
            return Err(e.into());
        }
    }

    // ---- Services ----
    let summarizer = summarizer::init(&config.summarizer)?;
    let client = config.http.client()?;
    let pipeline = Pipeline::new(
        HttpFeedSource::new(client.clone()),
        HttpArticleExtractor::new(client.clone()),
        HttpImageResolver::new(client),
        summarizer,
        FeedUrls::new(&config.feeds.base_url),
    );

    // ---- Run ----
    let mut surface = TerminalSurface::new(io::stdout().lock());
    let edition = pipeline.run(args.selection(), &mut surface).await;
    info!(
        request = %edition.request,
        cards = edition.cards.len(),
        placeholders = edition.cards.iter().filter(|c| c.image.is_placeholder()).count(),
        summarized = edition.summary.is_some(),
        "Request served"
    );

    // ---- Exports ----
    if !edition.is_empty() {
        if let Some(dir) = &args.json_output_dir {
            if let Err(e) = outputs::json::write_edition(&edition, dir).await {
                error!(error = %e, "Failed to write JSON");
            }
        }
        if let Some(dir) = &args.markdown_output_dir {
            if let Err(e) = outputs::markdown::write_edition(&edition, dir).await {
                error!(error = %e, "Failed to write Markdown");
            }
        }
        if let Some(dir) = &args.image_dir {
            if let Err(e) = outputs::images::write_card_images(&edition, dir).await {
                error!(error = %e, "Failed to write images");
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
