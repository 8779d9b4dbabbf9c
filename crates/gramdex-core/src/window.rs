//! Sliding-window aggregation of token scores into sentence scores

use crate::corpus::{Sentence, Token};
use crate::matches::push_merged;

/// Minimum window width regardless of query length.
pub const MIN_WINDOW: usize = 2;

/// Window width for a query with `query_tokens` whitespace-separated words.
///
/// Each sentence further clamps this to its own token count.
#[inline]
pub fn window_width(query_tokens: usize) -> usize {
    query_tokens.max(MIN_WINDOW)
}

/// Compute `sentence`'s score and absolute match spans from the per-token
/// results already stored in `tokens`.
///
/// The score is the largest sum of `width` consecutive token scores (clamped
/// to the sentence length). Spans come from every token scoring at least
/// `threshold`, regardless of which window won. `scratch` must hold at least
/// as many entries as the sentence has tokens.
pub(crate) fn aggregate_sentence(
    sentence: &mut Sentence,
    tokens: &[Token],
    width: usize,
    threshold: f32,
    scratch: &mut [f32],
) {
    let Sentence {
        tokens: occurrences,
        score: sentence_score,
        matches,
        ..
    } = sentence;
    matches.clear();

    let window = width.min(occurrences.len());
    let mut sum = 0.0f32;
    let mut best = 0.0f32;

    for (j, occurrence) in occurrences.iter().enumerate() {
        let token = &tokens[occurrence.token.index()];
        scratch[j] = token.score;
        sum += token.score;
        if j >= window {
            sum -= scratch[j - window];
        }
        if j + 1 >= window {
            best = best.max(sum);
        }

        if token.score >= threshold {
            for m in &token.matches {
                let shifted = m.shifted(occurrence.offset);
                push_merged(matches, shifted.start, shifted.end);
            }
        }
    }

    *sentence_score = best;
}
