//! End-to-end tests for the cross-modal (detection) reranking path.

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;
use serde_json::json;

use rescore::{
    BoundingBox, CrossModalReranker, Detection, Hit, ImageLoader, MockDetector, RerankConfig,
    RerankError, RerankQuery, ResultSet,
};

/// Loader that fabricates a blank image of the requested size, recording
/// nothing and touching no I/O.
struct BlankImageLoader;

#[async_trait]
impl ImageLoader for BlankImageLoader {
    async fn load(
        &self,
        _reference: &str,
        size: Option<(u32, u32)>,
    ) -> Result<RgbImage, RerankError> {
        let (width, height) = size.unwrap_or((8, 8));
        Ok(RgbImage::new(width, height))
    }
}

/// Loader that always fails, for error propagation tests.
struct FailingImageLoader;

#[async_trait]
impl ImageLoader for FailingImageLoader {
    async fn load(
        &self,
        reference: &str,
        _size: Option<(u32, u32)>,
    ) -> Result<RgbImage, RerankError> {
        Err(RerankError::image_load(format!(
            "failed to fetch '{}': connection refused",
            reference
        )))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn image_hits() -> Vec<Hit> {
    init_tracing();
    vec![
        Hit::new()
            .with_id("doc1")
            .with_highlights(json!({"image": "one.jpg"})),
        Hit::new()
            .with_id("doc2")
            .with_highlights(json!({"image": "two.jpg"})),
    ]
}

fn detection(x: f32, score: f32) -> Detection {
    Detection::new(BoundingBox::new(x, 0.0, x + 1.0, 1.0), score)
}

#[tokio::test]
async fn test_detections_sorted_globally_with_identifiers() {
    let detector = MockDetector::with_responses(vec![
        vec![detection(0.0, 0.8), detection(1.0, 0.3)], // one.jpg
        vec![detection(2.0, 0.9), detection(3.0, 0.1)], // two.jpg
    ]);
    let pipeline = CrossModalReranker::new(
        Arc::new(detector),
        Arc::new(BlankImageLoader),
        RerankConfig::new("test-detector").with_image_size(16, 16),
    );

    let mut results = ResultSet::new(image_hits());
    pipeline
        .rerank(&RerankQuery::from("a photo of a cat"), &mut results)
        .await
        .unwrap();

    let payload = results.reranked.expect("reranked payload attached");
    assert_eq!(payload.hits.len(), 1);

    let group = &payload.hits[0];
    assert_eq!(group.scores, vec![0.9, 0.8, 0.3, 0.1]);
    assert_eq!(group.identifier, vec!["two.jpg", "one.jpg", "one.jpg", "two.jpg"]);
    assert_eq!(group.boxes.len(), 4);
    assert_eq!(group.boxes[0], BoundingBox::new(2.0, 0.0, 3.0, 1.0));

    let timings = &payload.process_time;
    assert!(timings.time_to_prepare_data >= 0.0);
    assert!(timings.time_to_predict >= 0.0);
    assert!(timings.time_to_sort >= 0.0);
}

#[tokio::test]
async fn test_hits_themselves_are_left_alone() {
    let detector = MockDetector::with_responses(vec![vec![detection(0.0, 0.5)], vec![]]);
    let pipeline = CrossModalReranker::new(
        Arc::new(detector),
        Arc::new(BlankImageLoader),
        RerankConfig::new("test-detector"),
    );

    let mut results = ResultSet::new(image_hits());
    pipeline
        .rerank(&RerankQuery::from("q"), &mut results)
        .await
        .unwrap();

    // The payload replaces, rather than merges with, per-document mutation
    assert_eq!(results.len(), 2);
    assert!(results.hits.iter().all(|h| h.reranker_score().is_none()));
    assert!(results
        .hits
        .iter()
        .all(|h| h.highlights_reranked().is_none()));
}

#[tokio::test]
async fn test_weighted_query_is_rejected() {
    let pipeline = CrossModalReranker::new(
        Arc::new(MockDetector::new()),
        Arc::new(BlankImageLoader),
        RerankConfig::new("test-detector"),
    );

    let query = RerankQuery::weighted(vec![("cat".to_string(), 1.0)]);
    let mut results = ResultSet::new(image_hits());

    let err = pipeline.rerank(&query, &mut results).await.unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_hit_without_highlight_content_fails_fast() {
    let pipeline = CrossModalReranker::new(
        Arc::new(MockDetector::new()),
        Arc::new(BlankImageLoader),
        RerankConfig::new("test-detector"),
    );

    let mut results = ResultSet::new(vec![Hit::new().with_id("doc1")]);
    let err = pipeline
        .rerank(&RerankQuery::from("q"), &mut results)
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_image_load_failure_propagates_with_reference() {
    let pipeline = CrossModalReranker::new(
        Arc::new(MockDetector::new()),
        Arc::new(FailingImageLoader),
        RerankConfig::new("test-detector"),
    );

    let mut results = ResultSet::new(image_hits());
    let err = pipeline
        .rerank(&RerankQuery::from("q"), &mut results)
        .await
        .unwrap_err();

    assert!(err.is_image_load());
    assert!(err.to_string().contains("one.jpg"));
}

#[tokio::test]
async fn test_empty_result_set_is_a_no_op() {
    let pipeline = CrossModalReranker::new(
        Arc::new(MockDetector::new()),
        Arc::new(BlankImageLoader),
        RerankConfig::new("test-detector"),
    );

    let mut results = ResultSet::new(vec![]);
    pipeline
        .rerank(&RerankQuery::from("q"), &mut results)
        .await
        .unwrap();

    assert!(results.reranked.is_none());
}

#[tokio::test]
async fn test_payload_serializes_to_wire_shape() {
    let detector = MockDetector::with_responses(vec![vec![detection(0.0, 0.5)], vec![]]);
    let pipeline = CrossModalReranker::new(
        Arc::new(detector),
        Arc::new(BlankImageLoader),
        RerankConfig::new("test-detector"),
    );

    let mut results = ResultSet::new(image_hits());
    pipeline
        .rerank(&RerankQuery::from("q"), &mut results)
        .await
        .unwrap();

    let value = serde_json::to_value(&results).unwrap();
    let reranked = &value["reranked"];
    assert_eq!(reranked["hits"][0]["scores"][0], json!(0.5));
    assert_eq!(reranked["hits"][0]["identifier"][0], "one.jpg");
    assert!(reranked["processTime"]["time_to_predict"].is_number());
}
