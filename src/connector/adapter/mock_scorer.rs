use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::application::{verify_batch, RelevanceScorer};
use crate::domain::RerankError;

/// Deterministic scorer for tests and offline development: hashes each
/// (query, content) pair into a score in `[0, 1)`. The same pair always
/// receives the same score.
pub struct MockScorer;

impl MockScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelevanceScorer for MockScorer {
    async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, RerankError> {
        verify_batch(pairs)?;

        Ok(pairs
            .iter()
            .map(|(query, content)| {
                let mut hasher = DefaultHasher::new();
                query.hash(&mut hasher);
                content.hash(&mut hasher);
                (hasher.finish() % 10000) as f32 / 10000.0
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "mock-scorer"
    }
}
