pub mod application;
pub mod connector;
pub mod domain;

pub use application::{
    assign_reranked_ids, build_candidates, combine_scores, hybrid_add, hybrid_multiply,
    normalize_hits, reduce_highlight, resort_hits, segment_candidates, select_top_candidates,
    verify_batch, write_back, ContentSegmenter, CrossModalReranker, ImageLoader,
    NormalizedRow, NormalizedTable, RegionDetector, RelevanceScorer, TextReranker,
};

pub use connector::{
    HttpImageLoader, MockDetector, MockScorer, OrtScorer, WindowSegmenter,
};

pub use domain::{
    BoundingBox, Candidate, Detection, DetectionGroup, Hit, ProcessTime, RankingKey,
    RerankConfig, RerankError, RerankQuery, RerankedHighlights, RerankedPayload, RerankerScore,
    ResultSet, ScoredCandidate, SplitMethod, SplitParams,
};
