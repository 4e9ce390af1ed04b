use async_trait::async_trait;
use image::RgbImage;

use crate::domain::RerankError;

/// Resolves an image reference (local path or URL) to a decoded image,
/// resized to `size` when given, at the image's native size otherwise.
/// Output is always 3-channel RGB for model compatibility.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(
        &self,
        reference: &str,
        size: Option<(u32, u32)>,
    ) -> Result<RgbImage, RerankError>;
}
