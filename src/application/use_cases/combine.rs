use crate::domain::{Candidate, RerankError, ScoredCandidate};

/// Floor applied to both factors of the multiplicative blend so that a zero
/// or negative score cannot zero out the product.
pub const SCORE_FLOOR: f32 = 1e-3;

fn clip_floor(score: f32) -> f32 {
    score.max(SCORE_FLOOR)
}

/// Multiplicative blend of original and reranker scores, both clipped to
/// `[SCORE_FLOOR, +inf)`.
pub fn hybrid_multiply(original: f32, reranker: f32) -> f32 {
    clip_floor(original) * clip_floor(reranker)
}

/// Additive blend, unclipped; keeps sign information intact.
pub fn hybrid_add(original: f32, reranker: f32) -> f32 {
    original + reranker
}

/// Join model scores back onto their candidates, applying each candidate's
/// term weight and deriving both hybrid blends. Fails if the model returned
/// a different number of scores than it was given pairs.
pub fn combine_scores(
    candidates: Vec<Candidate>,
    scores: &[f32],
) -> Result<Vec<ScoredCandidate>, RerankError> {
    if candidates.len() != scores.len() {
        return Err(RerankError::scoring(format!(
            "model returned {} scores for {} pairs",
            scores.len(),
            candidates.len()
        )));
    }

    Ok(candidates
        .into_iter()
        .zip(scores)
        .map(|(candidate, &raw)| {
            let reranker_score = raw * candidate.weight();
            let original = candidate.original_score();
            ScoredCandidate::new(
                candidate,
                reranker_score,
                hybrid_multiply(original, reranker_score),
                hybrid_add(original, reranker_score),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_multiply_floor_invariant() {
        // Both factors clipped, so the product never drops below 1e-6
        for (o, s) in [(-1.0, -1.0), (0.0, 0.0), (0.0, 5.0), (-3.0, 0.5)] {
            assert!(hybrid_multiply(o, s) >= 1e-6);
        }
    }

    #[test]
    fn test_hybrid_multiply_is_plain_product_above_floor() {
        assert_eq!(hybrid_multiply(0.5, 0.8), 0.5 * 0.8);
        assert_eq!(hybrid_multiply(2.0, 3.0), 6.0);
    }

    #[test]
    fn test_hybrid_add_preserves_sign() {
        assert_eq!(hybrid_add(0.5, -2.0), -1.5);
        assert_eq!(hybrid_add(-0.25, 0.25), 0.0);
    }

    #[test]
    fn test_combine_applies_weight() {
        let candidates = vec![Candidate::new("q", "c", "a", "f", 0.5).with_weight(0.5)];
        let scored = combine_scores(candidates, &[0.8]).unwrap();

        assert_eq!(scored[0].reranker_score(), 0.4);
        assert_eq!(scored[0].hybrid_add(), 0.5 + 0.4);
    }

    #[test]
    fn test_combine_rejects_length_mismatch() {
        let candidates = vec![Candidate::new("q", "c", "a", "f", 0.5)];
        let err = combine_scores(candidates, &[0.8, 0.2]).unwrap_err();
        assert!(err.is_scoring());
    }
}
