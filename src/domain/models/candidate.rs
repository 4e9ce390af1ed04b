use serde::{Deserialize, Serialize};

/// One (query, content) unit submitted for scoring.
///
/// `content` may be a sub-span of the field produced by segmentation, in
/// which case `source_content` keeps the full field value for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    query: String,
    content: String,
    reranked_id: String,
    field_name: String,
    original_score: f32,
    weight: f32,
    source_content: Option<String>,
}

impl Candidate {
    pub fn new(
        query: impl Into<String>,
        content: impl Into<String>,
        reranked_id: impl Into<String>,
        field_name: impl Into<String>,
        original_score: f32,
    ) -> Self {
        Self {
            query: query.into(),
            content: content.into(),
            reranked_id: reranked_id.into(),
            field_name: field_name.into(),
            original_score,
            weight: 1.0,
            source_content: None,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Replace the content with a sub-span, keeping the original for audit.
    pub fn into_span(mut self, span: impl Into<String>) -> Self {
        let original = self
            .source_content
            .take()
            .unwrap_or_else(|| self.content.clone());
        self.content = span.into();
        self.source_content = Some(original);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn reranked_id(&self) -> &str {
        &self.reranked_id
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn original_score(&self) -> f32 {
        self.original_score
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn source_content(&self) -> Option<&str> {
        self.source_content.as_deref()
    }
}

/// A candidate after model invocation, carrying the reranker score and both
/// hybrid blends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    candidate: Candidate,
    reranker_score: f32,
    hybrid_multiply: f32,
    hybrid_add: f32,
}

impl ScoredCandidate {
    pub fn new(
        candidate: Candidate,
        reranker_score: f32,
        hybrid_multiply: f32,
        hybrid_add: f32,
    ) -> Self {
        Self {
            candidate,
            reranker_score,
            hybrid_multiply,
            hybrid_add,
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn reranker_score(&self) -> f32 {
        self.reranker_score
    }

    pub fn hybrid_multiply(&self) -> f32 {
        self.hybrid_multiply
    }

    pub fn hybrid_add(&self) -> f32 {
        self.hybrid_add
    }
}
