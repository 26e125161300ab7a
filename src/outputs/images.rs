//! Saves the display image of every card to disk.
//!
//! Placeholders are written too, so each card has exactly one file.

use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::Edition;
use crate::utils::{ensure_writable_dir, slugify_title};

/// Write `{image_dir}/{position:02}-{title-slug}.{ext}` for each card.
#[instrument(level = "info", skip_all, fields(%image_dir, cards = edition.cards.len()))]
pub async fn write_card_images(edition: &Edition, image_dir: &str) -> Result<Vec<String>> {
    ensure_writable_dir(image_dir).await?;

    let mut paths = Vec::with_capacity(edition.cards.len());
    for card in &edition.cards {
        let slug: String = slugify_title(&card.item.title).chars().take(60).collect();
        let path = format!(
            "{}/{:02}-{}.{}",
            image_dir.trim_end_matches('/'),
            card.position,
            slug.trim_end_matches('-'),
            card.image.format().extension()
        );
        fs::write(&path, card.image.bytes()).await?;
        paths.push(path);
    }
    info!(count = paths.len(), "Wrote card images");
    Ok(paths)
}
