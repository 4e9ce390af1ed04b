use async_trait::async_trait;
use image::{imageops::FilterType, DynamicImage, RgbImage};
use tracing::debug;

use crate::application::ImageLoader;
use crate::domain::RerankError;

/// Loads images from local paths or http(s) URLs, resizes them to the
/// requested size (native size otherwise) and normalizes to 3-channel RGB.
pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn is_url(reference: &str) -> bool {
        reqwest::Url::parse(reference)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    async fn fetch_bytes(&self, reference: &str) -> Result<Vec<u8>, RerankError> {
        if Self::is_url(reference) {
            let response = self
                .client
                .get(reference)
                .send()
                .await
                .map_err(|e| {
                    RerankError::image_load(format!("failed to fetch '{}': {}", reference, e))
                })?
                .error_for_status()
                .map_err(|e| {
                    RerankError::image_load(format!("failed to fetch '{}': {}", reference, e))
                })?;

            let bytes = response.bytes().await.map_err(|e| {
                RerankError::image_load(format!("failed to read body of '{}': {}", reference, e))
            })?;
            Ok(bytes.to_vec())
        } else {
            tokio::fs::read(reference).await.map_err(|e| {
                RerankError::image_load(format!("failed to open '{}': {}", reference, e))
            })
        }
    }
}

impl Default for HttpImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(
        &self,
        reference: &str,
        size: Option<(u32, u32)>,
    ) -> Result<RgbImage, RerankError> {
        let bytes = self.fetch_bytes(reference).await?;

        let decoded: DynamicImage = image::load_from_memory(&bytes).map_err(|e| {
            RerankError::image_load(format!("failed to decode '{}': {}", reference, e))
        })?;

        let resized = match size {
            Some((width, height)) => decoded.resize_exact(width, height, FilterType::Triangle),
            None => decoded,
        };

        debug!(
            "loaded '{}' at {}x{}",
            reference,
            resized.width(),
            resized.height()
        );
        Ok(resized.to_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_url_detection() {
        assert!(HttpImageLoader::is_url("http://example.com/cat.jpg"));
        assert!(HttpImageLoader::is_url("https://example.com/cat.jpg"));
        assert!(!HttpImageLoader::is_url("/tmp/cat.jpg"));
        assert!(!HttpImageLoader::is_url("cat.jpg"));
        assert!(!HttpImageLoader::is_url("file:///tmp/cat.jpg"));
    }

    #[tokio::test]
    async fn test_load_local_file_resizes_to_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");

        let mut source = RgbImage::new(2, 2);
        source.put_pixel(0, 0, Rgb([255, 0, 0]));
        source.save(&path).unwrap();

        let loader = HttpImageLoader::new();
        let loaded = loader
            .load(path.to_str().unwrap(), Some((4, 4)))
            .await
            .unwrap();

        assert_eq!((loaded.width(), loaded.height()), (4, 4));
    }

    #[tokio::test]
    async fn test_load_local_file_native_size_without_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        RgbImage::new(3, 5).save(&path).unwrap();

        let loader = HttpImageLoader::new();
        let loaded = loader.load(path.to_str().unwrap(), None).await.unwrap();

        assert_eq!((loaded.width(), loaded.height()), (3, 5));
    }

    #[tokio::test]
    async fn test_missing_file_is_image_load_error() {
        let loader = HttpImageLoader::new();
        let err = loader
            .load("/nonexistent/no-such-image.png", None)
            .await
            .unwrap_err();

        assert!(err.is_image_load());
        assert!(err.to_string().contains("no-such-image.png"));
    }

    #[tokio::test]
    async fn test_undecodable_bytes_is_image_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        tokio::fs::write(&path, b"definitely not image data")
            .await
            .unwrap();

        let loader = HttpImageLoader::new();
        let err = loader.load(path.to_str().unwrap(), None).await.unwrap_err();
        assert!(err.is_image_load());
    }
}
