//! Command-line interface definitions for RapidRecap.
//!
//! The subcommand picks the mode. Running without one is the same as opening
//! the app without choosing a type: the user is prompted and nothing is
//! fetched.
//!
//! Nothing is written to disk unless one of the export directories is given.

use clap::{Parser, Subcommand, value_parser};

use crate::models::{Selection, Topic};

/// Command-line arguments for the RapidRecap application.
///
/// # Examples
///
/// ```sh
/// # Trending headlines, ten cards
/// rapid_recap trending -n 10
///
/// # A topic section, exporting JSON and Markdown
/// rapid_recap -j ./json -m ./markdown topic SPORTS
///
/// # Keyword search
/// rapid_recap search climate change -n 8
///
/// # Model summary of any article
/// HF_API_TOKEN=hf_xxx rapid_recap url https://example.com/story
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Also write the results as JSON to this directory (off by default)
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Also write the results as Markdown to this directory (off by default)
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Also save each card's image to this directory (off by default)
    #[arg(short, long)]
    pub image_dir: Option<String>,

    /// Summarization model endpoint
    #[arg(long, env = "RAPID_RECAP_MODEL_ENDPOINT")]
    pub model_endpoint: Option<String>,

    /// Bearer token for the summarization endpoint
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Trending headlines
    Trending {
        /// Number of news
        #[arg(short = 'n', long, default_value_t = 5, value_parser = value_parser!(u8).range(5..=25))]
        count: u8,
    },
    /// Headlines from one of the favourite topics
    Topic {
        #[arg(value_enum, ignore_case = true)]
        topic: Option<Topic>,

        /// Number of news
        #[arg(short = 'n', long, default_value_t = 5, value_parser = value_parser!(u8).range(5..=25))]
        count: u8,
    },
    /// Search headlines by keyword
    Search {
        /// Topic to search for
        query: Vec<String>,

        /// Number of news
        #[arg(short = 'n', long, default_value_t = 5, value_parser = value_parser!(u8).range(5..=15))]
        count: u8,
    },
    /// Summarize an article URL with the model
    Url { url: Option<String> },
}

impl Cli {
    /// The user's selection, possibly incomplete.
    pub fn selection(&self) -> Selection {
        match &self.command {
            None => Selection::Nothing,
            Some(Command::Trending { count }) => Selection::Trending {
                count: usize::from(*count),
            },
            Some(Command::Topic { topic, count }) => Selection::Topic {
                topic: *topic,
                count: usize::from(*count),
            },
            Some(Command::Search { query, count }) => Selection::Search {
                query: query.join(" "),
                count: usize::from(*count),
            },
            Some(Command::Url { url }) => Selection::CustomUrl {
                url: url.clone().unwrap_or_default(),
            },
        }
    }
}
