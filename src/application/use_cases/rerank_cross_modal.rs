use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::application::interfaces::{ImageLoader, RegionDetector};
use crate::application::use_cases::normalize::{assign_reranked_ids, reduce_highlight};
use crate::domain::{
    BoundingBox, DetectionGroup, ProcessTime, RerankConfig, RerankError, RerankQuery,
    RerankedPayload, ResultSet,
};

/// Cross-modal reranking: resolve each hit's highlight content to an image,
/// run the detector over every (query, image) pair one at a time, then sort
/// all detections globally by score.
///
/// The result payload lands under the result set's `reranked` key and
/// replaces the per-document mutation the text path performs.
pub struct CrossModalReranker {
    detector: Arc<dyn RegionDetector>,
    image_loader: Arc<dyn ImageLoader>,
    config: RerankConfig,
}

impl CrossModalReranker {
    pub fn new(
        detector: Arc<dyn RegionDetector>,
        image_loader: Arc<dyn ImageLoader>,
        config: RerankConfig,
    ) -> Self {
        Self {
            detector,
            image_loader,
            config,
        }
    }

    pub async fn rerank(
        &self,
        query: &RerankQuery,
        results: &mut ResultSet,
    ) -> Result<(), RerankError> {
        let term = query.as_text().ok_or_else(|| {
            RerankError::invalid_input(
                "cross-modal reranking supports a single plain-text query only",
            )
        })?;

        if results.is_empty() {
            warn!("empty result set for cross-modal reranking, returning unchanged");
            return Ok(());
        }

        info!(
            "Cross-modal reranking {} hits with {}",
            results.len(),
            self.detector.model_name()
        );

        let prepare_start = Instant::now();
        assign_reranked_ids(&mut results.hits)?;
        let content = extract_image_references(results)?;
        let images = self.load_images(&content).await?;
        let time_to_prepare_data = prepare_start.elapsed().as_secs_f64();

        // One (query, image) pair at a time; batching several images through
        // the detector runtime is unreliable.
        let predict_start = Instant::now();
        let mut rows: Vec<(BoundingBox, f32, String)> = Vec::new();
        for (image, reference) in images.iter().zip(&content) {
            let detections = self.detector.detect(term, image).await?;
            debug!("{} detections for '{}'", detections.len(), reference);
            for detection in detections {
                rows.push((detection.bbox, detection.score, reference.clone()));
            }
        }
        let time_to_predict = predict_start.elapsed().as_secs_f64();

        let sort_start = Instant::now();
        rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let mut group = DetectionGroup::default();
        for (bbox, score, identifier) in rows {
            group.boxes.push(bbox);
            group.scores.push(score);
            group.identifier.push(identifier);
        }
        let time_to_sort = sort_start.elapsed().as_secs_f64();

        results.reranked = Some(RerankedPayload {
            hits: vec![group],
            process_time: ProcessTime {
                time_to_prepare_data,
                time_to_predict,
                time_to_sort,
            },
        });

        Ok(())
    }

    async fn load_images(&self, content: &[String]) -> Result<Vec<RgbImage>, RerankError> {
        let mut images = Vec::with_capacity(content.len());
        for reference in content {
            images.push(
                self.image_loader
                    .load(reference, self.config.image_size())
                    .await?,
            );
        }
        Ok(images)
    }
}

/// Pull the image reference for every hit from its reduced highlight value.
/// This path assumes a single attribute supplies the references; a hit
/// without one cannot be reranked cross-modally.
fn extract_image_references(results: &ResultSet) -> Result<Vec<String>, RerankError> {
    results
        .hits
        .iter()
        .map(|hit| {
            hit.highlights()
                .and_then(reduce_highlight)
                .ok_or_else(|| {
                    RerankError::invalid_input(format!(
                        "document '{}' has no highlight content to resolve an image from",
                        hit.reranked_id().unwrap_or("<unassigned>")
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Hit;
    use serde_json::json;

    #[test]
    fn test_extract_references_reads_reduced_highlights() {
        let mut results = ResultSet::new(vec![
            Hit::new()
                .with_id("a")
                .with_highlights(json!({"image": "one.jpg"})),
            Hit::new()
                .with_id("b")
                .with_highlights(json!({"image": "two.jpg"})),
        ]);
        assign_reranked_ids(&mut results.hits).unwrap();

        let refs = extract_image_references(&results).unwrap();
        assert_eq!(refs, vec!["one.jpg", "two.jpg"]);
    }

    #[test]
    fn test_extract_references_requires_highlights() {
        let mut results = ResultSet::new(vec![Hit::new().with_id("a")]);
        assign_reranked_ids(&mut results.hits).unwrap();

        let err = extract_image_references(&results).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
