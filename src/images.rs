//! Lead image resolution with placeholder substitution.
//!
//! [`ImageSource::resolve`] never fails. An absent URL, a transport error,
//! a non-success status, an oversized body, or a payload that is not a
//! recognized raster image all produce [`DisplayImage::Placeholder`].

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::error::{NewsError, Result};
use crate::models::{DisplayImage, ImageFormat};

pub trait ImageSource {
    async fn resolve(&self, image_url: Option<&str>) -> DisplayImage;
}

/// Largest image payload accepted before falling back to the placeholder.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpImageResolver {
    client: Client,
    max_bytes: usize,
}

impl HttpImageResolver {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_bytes: MAX_IMAGE_BYTES,
        }
    }

    #[cfg(test)]
    fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    async fn download(&self, url: &str) -> Result<DisplayImage> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Network(format!("image returned HTTP {status}")));
        }
        if let Some(len) = response.content_length().filter(|&n| n > self.max_bytes as u64) {
            return Err(NewsError::Parse(format!(
                "image of {len} bytes exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        // Content-Length may be absent or wrong; enforce the cap while reading.
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(NewsError::Parse(format!(
                    "image exceeds the {} byte limit",
                    self.max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        let format = ImageFormat::sniff(&bytes).ok_or_else(|| {
            NewsError::Parse(format!("{} bytes are not a known image format", bytes.len()))
        })?;
        Ok(DisplayImage::Fetched {
            url: url.to_string(),
            format,
            bytes,
        })
    }
}

impl ImageSource for HttpImageResolver {
    #[instrument(level = "debug", skip(self))]
    async fn resolve(&self, image_url: Option<&str>) -> DisplayImage {
        let Some(url) = image_url.map(str::trim).filter(|u| !u.is_empty()) else {
            debug!("No image URL; using placeholder");
            return DisplayImage::Placeholder;
        };
        match self.download(url).await {
            Ok(image) => {
                debug!(%url, bytes = image.bytes().len(), format = ?image.format(), "Fetched image");
                image
            }
            Err(e) => {
                warn!(%url, error = %e, "Image unavailable; using placeholder");
                DisplayImage::Placeholder
            }
        }
    }
}
