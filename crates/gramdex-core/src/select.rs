//! Top-K ordering of sentence indices by descending score

use std::cmp::Ordering;

/// Fill `indices` with `0..scores.len()` ordered by descending score.
///
/// When there are more scores than `num_results`, only the first
/// `num_results` positions are guaranteed to be sorted and to hold the
/// highest scores; the rest are an arbitrary permutation of the remainder.
/// Tie order is unspecified.
pub fn rank_descending(scores: &[f32], num_results: usize, indices: &mut [usize]) {
    debug_assert_eq!(scores.len(), indices.len());
    for (i, slot) in indices.iter_mut().enumerate() {
        *slot = i;
    }

    let by_score_desc = |a: &usize, b: &usize| {
        scores[*b]
            .partial_cmp(&scores[*a])
            .unwrap_or(Ordering::Equal)
    };

    if indices.len() > num_results {
        if num_results == 0 {
            return;
        }
        indices.select_nth_unstable_by(num_results - 1, by_score_desc);
        indices[..num_results].sort_by(by_score_desc);
    } else {
        indices.sort_by(by_score_desc);
    }
}
