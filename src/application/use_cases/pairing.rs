use tracing::debug;

use crate::application::interfaces::ContentSegmenter;
use crate::application::use_cases::normalize::NormalizedTable;
use crate::domain::{Candidate, RerankQuery, SplitParams};

/// Original score used when the upstream pipeline never computed one.
pub const DEFAULT_ORIGINAL_SCORE: f32 = 1.0;

/// Expand a normalized table into the unified candidate list: one candidate
/// per (query term, searchable field, hit with non-empty content).
///
/// `restrict` limits scoring to a caller-chosen subset of fields; names not
/// present in the table simply contribute nothing.
pub fn build_candidates(
    table: &NormalizedTable,
    query: &RerankQuery,
    restrict: Option<&[String]>,
) -> Vec<Candidate> {
    let fields: Vec<&str> = match restrict {
        Some(subset) => subset
            .iter()
            .map(String::as_str)
            .filter(|name| table.searchable_fields().iter().any(|f| f == name))
            .collect(),
        None => table.searchable_fields().iter().map(String::as_str).collect(),
    };

    let mut candidates = Vec::new();
    for (term, weight) in query.terms() {
        for field in &fields {
            for row in table.rows() {
                let Some(content) = row.field(field) else {
                    continue;
                };
                candidates.push(
                    Candidate::new(
                        term,
                        content,
                        row.reranked_id(),
                        *field,
                        row.original_score().unwrap_or(DEFAULT_ORIGINAL_SCORE),
                    )
                    .with_weight(weight),
                );
            }
        }
    }

    debug!(
        "paired {} candidates across {} fields",
        candidates.len(),
        fields.len()
    );
    candidates
}

/// Expand each candidate's content into overlapping sub-spans. Every span
/// becomes its own candidate keeping the id, field name, score and query of
/// its parent; the full field content is retained for audit. The candidate
/// count never decreases.
pub fn segment_candidates(
    candidates: Vec<Candidate>,
    segmenter: &dyn ContentSegmenter,
    params: &SplitParams,
) -> Vec<Candidate> {
    let mut expanded = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let spans = segmenter.split(candidate.content(), params);
        if spans.is_empty() {
            // A segmenter must not erase content; keep the candidate whole.
            expanded.push(candidate);
            continue;
        }
        for span in spans {
            expanded.push(candidate.clone().into_span(span));
        }
    }
    expanded
}
