use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use tokenizers::Tokenizer;
use tracing::{debug, info};

#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;

#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;

use crate::application::{verify_batch, RelevanceScorer};
use crate::domain::{RerankError, DEFAULT_MAX_LENGTH};

const DEFAULT_MODEL_ID: &str = "cross-encoder/ms-marco-TinyBERT-L-2-v2";
const BATCH_SIZE: usize = 32;

/// Cross-encoder relevance scorer backed by ONNX Runtime.
///
/// Returns raw logits; scale and sign depend on the model. The session is
/// created once and reused across calls behind a mutex.
pub struct OrtScorer {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    max_length: usize,
}

impl OrtScorer {
    pub fn new(model_id: Option<&str>, max_length: Option<usize>) -> Result<Self, RerankError> {
        let model_id = model_id.unwrap_or(DEFAULT_MODEL_ID);
        info!("Initializing ORT scorer with model: {}", model_id);

        let api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(true)
            .build()
            .map_err(|e| RerankError::internal(format!("Failed to create HF API: {}", e)))?;

        let repo = api.model(model_id.to_string());

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| RerankError::internal(format!("Failed to download tokenizer: {}", e)))?;

        let model_path = repo
            .get("model.onnx")
            .or_else(|_| repo.get("onnx/model.onnx"))
            .map_err(|e| RerankError::internal(format!("Failed to download ONNX model: {}", e)))?;

        Self::from_paths(model_path, tokenizer_path, model_id, max_length)
    }

    pub fn from_paths(
        model_path: PathBuf,
        tokenizer_path: PathBuf,
        model_name: &str,
        max_length: Option<usize>,
    ) -> Result<Self, RerankError> {
        info!("Loading ONNX model from: {:?}", model_path);

        let session = Self::create_session(&model_path)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| RerankError::internal(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name: model_name.to_string(),
            max_length: max_length.unwrap_or(DEFAULT_MAX_LENGTH),
        })
    }

    fn create_session(model_path: &PathBuf) -> Result<Session, RerankError> {
        let builder = Session::builder()
            .map_err(|e| RerankError::internal(format!("Failed to create session builder: {}", e)))?;

        #[cfg(feature = "cuda")]
        let builder = {
            let cuda_available = CUDAExecutionProvider::is_available();
            if cuda_available {
                info!("CUDA execution provider available, enabling GPU acceleration");
            } else {
                warn!("CUDA execution provider not available (missing CUDA/cuDNN?), falling back to CPU");
            }
            builder
                .with_execution_providers([CUDAExecutionProvider::default().build()])
                .map_err(|e| {
                    RerankError::internal(format!("Failed to set CUDA execution provider: {}", e))
                })?
        };

        #[cfg(feature = "coreml")]
        let builder = {
            let coreml_available = CoreMLExecutionProvider::is_available();
            if coreml_available {
                info!("CoreML execution provider available, enabling GPU/ANE acceleration");
            } else {
                warn!("CoreML execution provider not available, falling back to CPU");
            }
            builder
                .with_execution_providers([CoreMLExecutionProvider::default()
                    .with_subgraphs()
                    .build()])
                .map_err(|e| {
                    RerankError::internal(format!("Failed to set CoreML execution provider: {}", e))
                })?
        };

        #[cfg(not(any(feature = "cuda", feature = "coreml")))]
        info!("No GPU execution provider configured, using CPU");

        builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| RerankError::internal(format!("Failed to set optimization level: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| RerankError::internal(format!("Failed to load ONNX model: {}", e)))
    }

    fn score_batch(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, RerankError> {
        if pairs.is_empty() {
            return Ok(vec![]);
        }

        let batch_size = pairs.len();

        let encodings = self
            .tokenizer
            .encode_batch(
                pairs
                    .iter()
                    .map(|(q, c)| (q.as_str(), c.as_str()))
                    .collect(),
                true,
            )
            .map_err(|e| RerankError::scoring(format!("Tokenization failed: {}", e)))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(self.max_length);

        let mut input_ids: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask: Vec<i64> = Vec::with_capacity(batch_size * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            let len = ids.len().min(max_len);

            input_ids.extend(ids[..len].iter().map(|&x| x as i64));
            attention_mask.extend(mask[..len].iter().map(|&x| x as i64));

            let padding = max_len - len;
            input_ids.extend(std::iter::repeat_n(0i64, padding));
            attention_mask.extend(std::iter::repeat_n(0i64, padding));
        }

        let shape = [batch_size, max_len];
        let input_ids_tensor = Tensor::from_array((shape, input_ids))
            .map_err(|e| RerankError::scoring(format!("Failed to create input_ids tensor: {}", e)))?;
        let attention_mask_tensor = Tensor::from_array((shape, attention_mask)).map_err(|e| {
            RerankError::scoring(format!("Failed to create attention_mask tensor: {}", e))
        })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| RerankError::internal(format!("Failed to lock session: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
            ])
            .map_err(|e| RerankError::scoring(format!("Inference failed: {}", e)))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| RerankError::scoring("No output tensor found"))?;

        let (shape, data) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| RerankError::scoring(format!("Failed to extract output tensor: {}", e)))?;

        let shape: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
        debug!("Output tensor shape: {:?}", shape);

        // Raw logits, taken as-is: [batch_size, 1] or already-squeezed
        // [batch_size]. The combiner's clipping handles negative values.
        let scores = if (shape.len() == 2 && shape[1] == 1) || shape.len() == 1 {
            data.iter().take(batch_size).copied().collect()
        } else {
            return Err(RerankError::scoring(format!(
                "Unexpected output tensor shape: {:?}",
                shape
            )));
        };

        Ok(scores)
    }
}

#[async_trait]
impl RelevanceScorer for OrtScorer {
    async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, RerankError> {
        verify_batch(pairs)?;

        let mut all_scores = Vec::with_capacity(pairs.len());
        for batch in pairs.chunks(BATCH_SIZE) {
            all_scores.extend(self.score_batch(batch)?);
        }

        debug!("Scored {} pairs", all_scores.len());
        Ok(all_scores)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires model download"]
    async fn test_ort_scorer_orders_by_relevance() {
        let scorer = OrtScorer::new(None, None).expect("Failed to create scorer");

        let pairs = vec![
            (
                "a photo of a cat".to_string(),
                "a small cat sitting on a windowsill".to_string(),
            ),
            (
                "a photo of a cat".to_string(),
                "quarterly revenue projections for 2024".to_string(),
            ),
        ];

        let scores = scorer.score_pairs(&pairs).await.unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores[0] > scores[1]);
    }
}
