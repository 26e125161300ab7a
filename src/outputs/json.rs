//! JSON export of an edition.
//!
//! Files are organized by date:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 08-15-00-trending.json
//!     └── 14-30-05-search-climate-change.json
//! ```
//!
//! Image payloads are not embedded; each card records whether its image was
//! fetched or replaced by the placeholder.

use tokio::fs;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::models::Edition;
use crate::outputs::edition_stem;

/// Write an [`Edition`] to `{json_output_dir}/{date}/{time}-{request}.json`.
///
/// Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_edition(edition: &Edition, json_output_dir: &str) -> Result<String> {
    let json = serde_json::to_string_pretty(edition)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        edition.local_date
    );
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!("{}/{}.json", full_json_dir, edition_stem(edition));
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote JSON edition");

    Ok(output_json_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisplayImage, NewsCard, NewsItem};

    #[tokio::test]
    async fn test_write_edition() {
        let dir = tempfile::tempdir().unwrap();
        let mut edition = Edition::new("sports");
        edition.local_date = "2025-05-06".to_string();
        edition.local_time = "14:30:05".to_string();
        edition.cards.push(NewsCard {
            position: 1,
            item: NewsItem {
                title: "Cup final ends 2-2".to_string(),
                ..Default::default()
            },
            summary: None,
            image: DisplayImage::Placeholder,
            warning: Some("network error: timed out".to_string()),
        });

        let path = write_edition(&edition, dir.path().to_str().unwrap())
            .await
            .unwrap();
        assert!(path.ends_with("2025-05-06/14-30-05-sports.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["request"], "sports");
        assert_eq!(value["cards"][0]["item"]["title"], "Cup final ends 2-2");
        assert_eq!(value["cards"][0]["image"]["kind"], "placeholder");
        assert!(value["summary"].is_null());
    }
}
