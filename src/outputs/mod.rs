//! Rendering and export of pipeline results.
//!
//! # Submodules
//!
//! - [`terminal`]: Renders cards, prompts and summaries as text (the interactive surface)
//! - [`json`]: Writes an [`Edition`](crate::models::Edition) to a JSON file
//! - [`markdown`]: Converts an `Edition` to Markdown and writes it
//! - [`images`]: Saves each card's display image next to the exports
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── 14-30-05-sports.json
//!
//! markdown_output_dir/
//! └── 2025-05-06_14-30-05-sports.md
//!
//! image_dir/
//! ├── 01-rover-finds-water-ice.jpg
//! └── 02-markets-rally.png        # placeholder
//! ```

pub mod images;
pub mod json;
pub mod markdown;
pub mod terminal;

use crate::models::Edition;
use crate::utils::slugify_title;

/// File stem shared by the JSON and Markdown exports of an edition.
pub fn edition_stem(edition: &Edition) -> String {
    format!(
        "{}-{}",
        edition.local_time.replace(':', "-"),
        slugify_title(&edition.request)
    )
}
