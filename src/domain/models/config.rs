use serde::{Deserialize, Serialize};

use super::ScoredCandidate;

pub const DEFAULT_MAX_LENGTH: usize = 512;
pub const DEFAULT_NUM_HIGHLIGHTS: usize = 1;

/// How field content is broken into sub-spans before splitting into windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    Character,
    Word,
    Sentence,
}

/// Segmentation policy: window length and overlap measured in units of
/// `split_method`. Treated as opaque parameters by the pipeline and handed to
/// the segmenter unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitParams {
    pub split_length: usize,
    pub split_overlap: usize,
    pub split_method: SplitMethod,
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            split_length: 2,
            split_overlap: 0,
            split_method: SplitMethod::Sentence,
        }
    }
}

/// Which score column drives top-k selection and the final document order.
/// The raw reranker score is the default; the hybrid blends are opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKey {
    #[default]
    RerankerScore,
    HybridMultiply,
    HybridAdd,
}

impl RankingKey {
    pub fn score_of(&self, candidate: &ScoredCandidate) -> f32 {
        match self {
            Self::RerankerScore => candidate.reranker_score(),
            Self::HybridMultiply => candidate.hybrid_multiply(),
            Self::HybridAdd => candidate.hybrid_add(),
        }
    }
}

/// Configuration surface for a reranker instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankConfig {
    model_name: String,
    device: String,
    max_length: usize,
    num_highlights: usize,
    split_params: Option<SplitParams>,
    searchable_attributes: Option<Vec<String>>,
    ranking_key: RankingKey,
    image_size: Option<(u32, u32)>,
}

impl RerankConfig {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            device: "cpu".to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            num_highlights: DEFAULT_NUM_HIGHLIGHTS,
            split_params: None,
            searchable_attributes: None,
            ranking_key: RankingKey::default(),
            image_size: None,
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_num_highlights(mut self, num_highlights: usize) -> Self {
        // At least one highlight is always retained
        self.num_highlights = num_highlights.max(1);
        self
    }

    pub fn with_split_params(mut self, params: SplitParams) -> Self {
        self.split_params = Some(params);
        self
    }

    pub fn with_searchable_attributes(mut self, attributes: Vec<String>) -> Self {
        self.searchable_attributes = Some(attributes);
        self
    }

    pub fn with_ranking_key(mut self, key: RankingKey) -> Self {
        self.ranking_key = key;
        self
    }

    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = Some((width, height));
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn num_highlights(&self) -> usize {
        self.num_highlights
    }

    pub fn split_params(&self) -> Option<&SplitParams> {
        self.split_params.as_ref()
    }

    pub fn searchable_attributes(&self) -> Option<&[String]> {
        self.searchable_attributes.as_deref()
    }

    pub fn ranking_key(&self) -> RankingKey {
        self.ranking_key
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }
}
