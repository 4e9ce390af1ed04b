use async_trait::async_trait;

use crate::domain::RerankError;

/// Scores (query, content) pairs with a cross-encoder style relevance model.
///
/// Scale and sign of the returned scores are model-dependent; they may be
/// unbounded logits rather than probabilities. Implementations must return
/// exactly one score per input pair, in order.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, RerankError>;

    /// Get the model name used for scoring
    fn model_name(&self) -> &str;
}

/// Batch validation every scorer runs before touching the model: an empty
/// batch fails here with a clear error instead of a confusing model-level one.
pub fn verify_batch(pairs: &[(String, String)]) -> Result<(), RerankError> {
    if pairs.is_empty() {
        return Err(RerankError::invalid_input(
            "scorer batch is empty, expected at least one (query, content) pair",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_batch_rejects_empty() {
        let err = verify_batch(&[]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_verify_batch_accepts_pairs() {
        let pairs = vec![("q".to_string(), "content".to_string())];
        assert!(verify_batch(&pairs).is_ok());
    }
}
