//! Sørensen–Dice similarity over character grams
//!
//! Two scorers share the [`GramTable`] built from the query:
//!
//! - [`compare_with_table`] scores a whole candidate string against the
//!   query's bigrams (single best match).
//! - [`score_tokens`] scores every unique corpus token against the query's
//!   grams of a caller-chosen length and records which parts of the token
//!   matched (windowed search).
//!
//! Both consume grams from the shared table and leave it to be restored
//! before the next candidate.

use crate::corpus::{token_text, Sentence, Token};
use crate::error::Result;
use crate::grams::{gram_count, GramTable};
use crate::matches::push_merged;

/// Gram length used by the whole-string comparator.
pub const BIGRAM: usize = 2;

/// Dice similarity of `query` and `candidate`, where `bigrams` was built
/// from `query` with gram length 2.
///
/// Grams are byte pairs, so the denominator counts bytes, but the
/// single-character rule counts characters.
///
/// Consumes from `bigrams`; the caller restores it before reuse.
pub fn compare_with_table(bigrams: &mut GramTable<'_>, query: &str, candidate: &str) -> f32 {
    let len1 = query.len();
    let len2 = candidate.len();
    if len1 == 0 && len2 == 0 {
        return 1.0;
    }
    if len1 == 0 || len2 == 0 {
        return 0.0;
    }
    if query == candidate {
        return 1.0;
    }
    if shorter_than_bigram(query) || shorter_than_bigram(candidate) {
        return 0.0;
    }

    let intersection = candidate
        .as_bytes()
        .windows(BIGRAM)
        .filter(|gram| bigrams.consume(gram))
        .count();

    (2.0 * intersection as f32) / (len1 + len2 - 2) as f32
}

#[inline]
fn shorter_than_bigram(s: &str) -> bool {
    s.chars().nth(1).is_none()
}

/// Widen a byte span of `text` outward to the nearest char boundaries.
#[inline]
fn char_span(text: &str, mut start: usize, mut end: usize) -> (usize, usize) {
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    while !text.is_char_boundary(end) {
        end += 1;
    }
    (start, end)
}

/// Dice similarity of two strings over bigrams.
pub fn compare_two_strings(first: &str, second: &str) -> Result<f32> {
    let mut bigrams = GramTable::new(first, BIGRAM)?;
    Ok(compare_with_table(&mut bigrams, first, second))
}

/// Score every unique token against the query grams in `grams`.
///
/// Overwrites each token's score and match list. Tokens shorter than the
/// gram length score zero with no matches. Spans are widened to whole
/// characters so they can always slice the token text.
pub(crate) fn score_tokens(grams: &mut GramTable<'_>, sentences: &[Sentence], tokens: &mut [Token]) {
    let gram_len = grams.gram_len();
    let query_grams = grams.gram_count();

    for token in tokens.iter_mut() {
        token.matches.clear();

        let text = token_text(sentences, token);
        let token_grams = gram_count(text.len(), gram_len);
        if token_grams == 0 {
            token.score = 0.0;
            continue;
        }

        let mut intersection = 0usize;
        for (j, gram) in text.as_bytes().windows(gram_len).enumerate() {
            if grams.consume(gram) {
                intersection += 1;
                let (start, end) = char_span(text, j, j + gram_len);
                push_merged(&mut token.matches, start, end);
            }
        }
        token.score = (2.0 * intersection as f32) / (query_grams + token_grams) as f32;

        grams.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::matches::Match;
    use pretty_assertions::assert_eq;

    fn compare(a: &str, b: &str) -> f32 {
        compare_two_strings(a, b).unwrap()
    }

    #[test]
    fn identical_strings_score_one() {
        for s in ["", "a", "ab", "hello world", "aaaa"] {
            assert_eq!(compare(s, s), 1.0, "compare({s:?}, {s:?})");
        }
    }

    #[test]
    fn empty_against_non_empty_scores_zero() {
        assert_eq!(compare("abc", ""), 0.0);
        assert_eq!(compare("", "abc"), 0.0);
    }

    #[test]
    fn single_character_scores_zero() {
        assert_eq!(compare("a", "b"), 0.0);
        assert_eq!(compare("a", "abc"), 0.0);
        assert_eq!(compare("abc", "c"), 0.0);
    }

    #[test]
    fn single_multibyte_character_scores_zero() {
        assert_eq!(compare("é", "éa"), 0.0);
        assert_eq!(compare("éa", "é"), 0.0);
        assert_eq!(compare("é", "é"), 1.0);
        assert!(compare("éa", "éb") > 0.0);
    }

    #[test]
    fn char_span_widens_to_boundaries() {
        // a=0, é=1..3, b=3
        assert_eq!(char_span("aéb", 0, 2), (0, 3));
        assert_eq!(char_span("aéb", 2, 4), (1, 4));
        assert_eq!(char_span("aéb", 0, 1), (0, 1));
    }

    #[test]
    fn known_values() {
        // ni ig gh ht vs na ac ch ht: one shared bigram
        assert_eq!(compare("night", "nacht"), 0.25);
        assert_eq!(compare("abc", "xyz"), 0.0);
        // he el ll lo "o " shared out of 10 + 10 bigrams
        assert_eq!(compare("hello there", "hello world"), 0.5);
    }

    #[test]
    fn repeated_bigrams_are_counted_as_a_multiset() {
        // aa aa aa vs aa: only one hit available on the shorter side
        assert_eq!(compare("aaaa", "aa"), 0.5);
        assert_eq!(compare("aa", "aaaa"), 0.5);
    }

    #[test]
    fn symmetric_across_independent_calls() {
        let pairs = [
            ("french", "quebec"),
            ("healed", "sealed"),
            ("the quick brown fox", "quick brown fence"),
            ("aaab", "abbb"),
            ("mississippi", "missouri"),
        ];
        for (a, b) in pairs {
            assert_eq!(compare(a, b), compare(b, a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn agrees_with_strsim_on_whitespace_free_ascii() {
        let words = [
            "healed", "sealed", "healthy", "heard", "herded", "help", "sold", "night", "nacht",
            "context", "contact", "aaaa", "ab",
        ];
        for a in words {
            for b in words {
                let expected = strsim::sorensen_dice(a, b) as f32;
                let actual = compare(a, b);
                assert!(
                    (expected - actual).abs() < 1e-6,
                    "{a:?} vs {b:?}: expected {expected}, got {actual}"
                );
            }
        }
    }

    #[test]
    fn table_restore_allows_reuse_between_candidates() {
        let query = "hello there";
        let mut bigrams = GramTable::new(query, BIGRAM).unwrap();
        let first = compare_with_table(&mut bigrams, query, "hello world");
        bigrams.restore();
        let second = compare_with_table(&mut bigrams, query, "hello world");
        assert_eq!(first, second);
    }

    #[test]
    fn token_scores_and_local_matches() {
        let mut corpus = Corpus::build(vec![
            "the quick brown fox".to_string(),
            "quick brown fence".to_string(),
        ])
        .unwrap();
        let query = "quick brown";
        let mut grams = GramTable::new(query, 2).unwrap();
        score_tokens(&mut grams, &corpus.sentences, &mut corpus.tokens);

        let score_of = |word: &str| {
            let token = corpus
                .tokens()
                .iter()
                .find(|t| token_text(corpus.sentences(), t) == word)
                .unwrap();
            (token.score(), token.matches().to_vec())
        };

        let (score, matches) = score_of("quick");
        assert!((score - 8.0 / 14.0).abs() < 1e-6);
        assert_eq!(matches, vec![Match::new(0, 5)]);

        let (score, matches) = score_of("brown");
        assert!((score - 8.0 / 14.0).abs() < 1e-6);
        assert_eq!(matches, vec![Match::new(0, 5)]);

        let (score, matches) = score_of("fox");
        assert_eq!(score, 0.0);
        assert!(matches.is_empty());
    }

    #[test]
    fn partial_token_match_records_split_spans() {
        let mut corpus = Corpus::build(vec!["abxcd".to_string()]).unwrap();
        let mut grams = GramTable::new("ab cd", 2).unwrap();
        score_tokens(&mut grams, &corpus.sentences, &mut corpus.tokens);

        let token = &corpus.tokens()[0];
        assert_eq!(token.matches(), &[Match::new(0, 2), Match::new(3, 5)]);
        // 2 hits, 4 query grams, 4 token grams
        assert_eq!(token.score(), 0.5);
    }

    #[test]
    fn short_tokens_score_zero_and_clear_stale_matches() {
        let mut corpus = Corpus::build(vec!["ab abcd".to_string()]).unwrap();

        let mut grams = GramTable::new("ab", 2).unwrap();
        score_tokens(&mut grams, &corpus.sentences, &mut corpus.tokens);
        assert_eq!(corpus.tokens()[0].matches(), &[Match::new(0, 2)]);

        let mut grams = GramTable::new("abcd", 3).unwrap();
        score_tokens(&mut grams, &corpus.sentences, &mut corpus.tokens);
        assert_eq!(corpus.tokens()[0].score(), 0.0);
        assert!(corpus.tokens()[0].matches().is_empty());
        assert_eq!(corpus.tokens()[1].score(), 1.0);
    }

    #[test]
    fn spans_on_multibyte_tokens_fall_on_char_boundaries() {
        let mut corpus = Corpus::build(vec!["aé".to_string()]).unwrap();
        // shares only the bytes "a" + first byte of the accented char
        let mut grams = GramTable::new("xaè", 2).unwrap();
        score_tokens(&mut grams, &corpus.sentences, &mut corpus.tokens);

        let token = &corpus.tokens()[0];
        assert_eq!(token.matches(), &[Match::new(0, 3)]);
        let text = token_text(corpus.sentences(), token);
        for m in token.matches() {
            assert!(text.is_char_boundary(m.start) && text.is_char_boundary(m.end));
            assert_eq!(&text[m.start..m.end], "aé");
        }
    }

    #[test]
    fn query_shorter_than_gram_length_scores_zero() {
        let mut corpus = Corpus::build(vec!["abc abcd".to_string()]).unwrap();
        let mut grams = GramTable::new("ab", 3).unwrap();
        score_tokens(&mut grams, &corpus.sentences, &mut corpus.tokens);
        assert!(corpus.tokens().iter().all(|t| t.score() == 0.0));
        assert!(corpus.tokens().iter().all(|t| t.matches().is_empty()));
    }
}
