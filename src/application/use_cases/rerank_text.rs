use std::sync::Arc;

use tracing::{info, warn};

use crate::application::interfaces::{verify_batch, ContentSegmenter, RelevanceScorer};
use crate::application::use_cases::combine::combine_scores;
use crate::application::use_cases::normalize::{assign_reranked_ids, normalize_hits};
use crate::application::use_cases::pairing::{build_candidates, segment_candidates};
use crate::application::use_cases::select::{resort_hits, select_top_candidates, write_back};
use crate::domain::{RerankConfig, RerankError, RerankQuery, ResultSet};

/// Orchestrates the text reranking pipeline: normalize, pair, optionally
/// segment, score, combine, select and write back. Mutates the result set in
/// place: every hit gains a reranked id, the scored hits gain reranker score
/// and highlight fields, and the hit list is re-sorted.
pub struct TextReranker {
    scorer: Arc<dyn RelevanceScorer>,
    segmenter: Option<Arc<dyn ContentSegmenter>>,
    config: RerankConfig,
}

impl TextReranker {
    pub fn new(scorer: Arc<dyn RelevanceScorer>, config: RerankConfig) -> Self {
        Self {
            scorer,
            segmenter: None,
            config,
        }
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn ContentSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    pub async fn rerank(
        &self,
        query: &RerankQuery,
        results: &mut ResultSet,
    ) -> Result<(), RerankError> {
        if results.is_empty() {
            warn!("empty result set for reranking, returning unchanged");
            return Ok(());
        }

        info!(
            "Reranking {} hits with {}",
            results.len(),
            self.scorer.model_name()
        );

        assign_reranked_ids(&mut results.hits)?;
        let table = normalize_hits(&results.hits)?;

        let mut candidates =
            build_candidates(&table, query, self.config.searchable_attributes());

        if candidates.is_empty() {
            warn!("no eligible searchable content in result set, returning unchanged");
            return Ok(());
        }

        if let Some(ref segmenter) = self.segmenter {
            let params = self.config.split_params().copied().unwrap_or_default();
            let before = candidates.len();
            candidates = segment_candidates(candidates, segmenter.as_ref(), &params);
            info!(
                "segmented field content, went from {} to {} candidates",
                before,
                candidates.len()
            );
        }

        let pairs: Vec<(String, String)> = candidates
            .iter()
            .map(|c| (c.query().to_string(), c.content().to_string()))
            .collect();
        verify_batch(&pairs)?;

        let scores = self.scorer.score_pairs(&pairs).await?;
        let scored = combine_scores(candidates, &scores)?;

        let groups = select_top_candidates(
            scored,
            self.config.ranking_key(),
            self.config.num_highlights(),
        );
        write_back(
            &mut results.hits,
            &groups,
            self.config.ranking_key(),
            self.config.num_highlights(),
        );
        resort_hits(&mut results.hits);

        Ok(())
    }
}
