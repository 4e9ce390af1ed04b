use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use image::RgbImage;

use crate::application::RegionDetector;
use crate::domain::{Detection, RerankError};

/// Detector for tests and offline development: replays canned detection
/// lists in call order. Once the queue is drained, further calls yield no
/// detections.
pub struct MockDetector {
    responses: Mutex<VecDeque<Vec<Detection>>>,
}

impl MockDetector {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_responses(responses: Vec<Vec<Detection>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegionDetector for MockDetector {
    async fn detect(&self, _query: &str, _image: &RgbImage) -> Result<Vec<Detection>, RerankError> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|e| RerankError::internal(format!("Failed to lock responses: {}", e)))?;
        Ok(responses.pop_front().unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        "mock-detector"
    }
}
