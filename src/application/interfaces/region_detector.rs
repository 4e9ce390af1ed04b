use async_trait::async_trait;
use image::RgbImage;

use crate::domain::{Detection, RerankError};

/// Runs an open-vocabulary detection model over one (query, image) pair and
/// returns the proposed regions with their scores.
///
/// Called strictly one image at a time: batching multiple images through the
/// underlying runtimes has proven unreliable, so the pipeline loops instead.
#[async_trait]
pub trait RegionDetector: Send + Sync {
    async fn detect(&self, query: &str, image: &RgbImage) -> Result<Vec<Detection>, RerankError>;

    /// Get the model name used for detection
    fn model_name(&self) -> &str;
}
