use crate::domain::SplitParams;

/// Splits field content into overlapping sub-spans for finer-grained scoring.
///
/// Implementations must return at least one span for non-empty content; the
/// pipeline relies on segmentation never shrinking the candidate set.
pub trait ContentSegmenter: Send + Sync {
    fn split(&self, content: &str, params: &SplitParams) -> Vec<String>;
}
