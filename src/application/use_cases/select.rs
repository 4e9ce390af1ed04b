use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::warn;

use crate::domain::{
    Hit, RankingKey, RerankedHighlights, RerankerScore, ScoredCandidate,
};

/// Group scored candidates by document and keep the best `num_highlights`
/// per group, ordered by the chosen score column descending. Groups are
/// emitted in first-appearance order; ties within a group stay in arrival
/// order (stable sort).
pub fn select_top_candidates(
    scored: Vec<ScoredCandidate>,
    key: RankingKey,
    num_highlights: usize,
) -> Vec<(String, Vec<ScoredCandidate>)> {
    let mut groups: Vec<(String, Vec<ScoredCandidate>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in scored {
        let id = candidate.candidate().reranked_id().to_string();
        match index.get(&id) {
            Some(&i) => groups[i].1.push(candidate),
            None => {
                index.insert(id.clone(), groups.len());
                groups.push((id, vec![candidate]));
            }
        }
    }

    for (_, group) in groups.iter_mut() {
        group.sort_by(|a, b| {
            key.score_of(b)
                .partial_cmp(&key.score_of(a))
                .unwrap_or(Ordering::Equal)
        });
        group.truncate(num_highlights);
    }

    groups
}

/// Write the selected candidates back onto the original hits: the reranker
/// score (scalar for one highlight, ordered list otherwise) and the matching
/// `{field: content}` highlight(s).
///
/// A hit whose id produced no candidates is passed through unscored; that is
/// the defined policy for documents with zero eligible fields.
pub fn write_back(
    hits: &mut [Hit],
    groups: &[(String, Vec<ScoredCandidate>)],
    key: RankingKey,
    num_highlights: usize,
) {
    let by_id: HashMap<&str, &[ScoredCandidate]> = groups
        .iter()
        .map(|(id, group)| (id.as_str(), group.as_slice()))
        .collect();

    for hit in hits.iter_mut() {
        let Some(id) = hit.reranked_id() else {
            continue;
        };
        let Some(group) = by_id.get(id).copied().filter(|g| !g.is_empty()) else {
            warn!(
                "document '{}' produced no scored candidates, passing through unscored",
                id
            );
            continue;
        };

        let scores: Vec<f32> = group.iter().map(|c| key.score_of(c)).collect();
        let highlights: Vec<_> = group
            .iter()
            .map(|c| {
                RerankedHighlights::entry(c.candidate().field_name(), c.candidate().content())
            })
            .collect();

        if num_highlights == 1 {
            hit.set_reranker_score(RerankerScore::Single(scores[0]));
            hit.set_highlights_reranked(RerankedHighlights::Single(
                highlights.into_iter().next().unwrap_or_default(),
            ));
        } else {
            hit.set_reranker_score(RerankerScore::Many(scores));
            hit.set_highlights_reranked(RerankedHighlights::Many(highlights));
        }
    }
}

/// Re-sort the hit list by top reranker score descending. Stable, so tied
/// documents keep their relative order; unscored hits sink to the end in
/// their original order.
pub fn resort_hits(hits: &mut [Hit]) {
    hits.sort_by(|a, b| {
        let score_a = a.reranker_score().and_then(RerankerScore::top);
        let score_b = b.reranker_score().and_then(RerankerScore::top);
        match (score_a, score_b) {
            (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
