use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates, `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox(pub [f32; 4]);

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self([x1, y1, x2, y2])
    }
}

/// One scored region proposed by the detection model for a (query, image)
/// pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub score: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, score: f32) -> Self {
        Self { bbox, score }
    }
}

/// Globally sorted detections with parallel identifiers tracing each box back
/// to the content (image reference) it came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionGroup {
    pub boxes: Vec<BoundingBox>,
    pub scores: Vec<f32>,
    pub identifier: Vec<String>,
}

impl DetectionGroup {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Per-phase wall-clock diagnostics for a cross-modal rerank call, in
/// seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessTime {
    pub time_to_prepare_data: f64,
    pub time_to_predict: f64,
    pub time_to_sort: f64,
}

/// The cross-modal result payload, attached to the result set under the
/// `reranked` key. It replaces, rather than merges with, the per-document
/// highlight mutation used by the text path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankedPayload {
    pub hits: Vec<DetectionGroup>,

    #[serde(rename = "processTime")]
    pub process_time: ProcessTime,
}
