//! Searcher - corpus plus the scratch state reused across queries
//!
//! A [`Searcher`] is built once from a fixed set of sentences and then
//! answers any number of queries. Every query method takes `&mut self`:
//! token scores, sentence scores, match lists and the result-index buffer
//! are overwritten in place on each call, so results from one call are only
//! readable until the next.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::corpus::{split_tokens, Corpus, CorpusStats, Sentence};
use crate::error::{Result, SearchError};
use crate::grams::GramTable;
use crate::matches::Match;
use crate::select::rank_descending;
use crate::similarity::{compare_with_table, score_tokens, BIGRAM};
use crate::window::{aggregate_sentence, window_width};

/// A ranked sentence with its highlighted spans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub index: usize,
    pub score: f32,
    pub matches: Vec<Match>,
}

/// In-memory fuzzy sentence searcher
#[derive(Debug)]
pub struct Searcher {
    corpus: Corpus,
    /// Rolling token scores for one sentence, sized to the longest sentence.
    score_window: Vec<f32>,
    /// Result ordering of the last windowed search, sized to the corpus.
    indices: Vec<usize>,
    /// Sentence scores gathered for ranking.
    scores: Vec<f32>,
}

impl Searcher {
    /// Index `sentences`. The strings move into the searcher.
    pub fn new(sentences: Vec<String>) -> Result<Self> {
        let corpus = Corpus::build(sentences)?;
        let len = corpus.len();
        let max_tokens = corpus.stats().max_sentence_tokens;

        let mut score_window = Vec::new();
        score_window.try_reserve_exact(max_tokens)?;
        score_window.resize(max_tokens, 0.0);

        let mut indices = Vec::new();
        indices.try_reserve_exact(len)?;
        indices.extend(0..len);

        let mut scores = Vec::new();
        scores.try_reserve_exact(len)?;
        scores.resize(len, 0.0);

        Ok(Self {
            corpus,
            score_window,
            indices,
            scores,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> CorpusStats {
        self.corpus.stats()
    }

    #[inline]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn unique_token_count(&self) -> usize {
        self.corpus.tokens().len()
    }

    pub fn token_occurrence_count(&self) -> usize {
        self.corpus.stats().token_occurrences
    }

    pub fn max_sentence_tokens(&self) -> usize {
        self.score_window.len()
    }

    /// Original text of sentence `index`.
    pub fn sentence(&self, index: usize) -> Result<&str> {
        self.checked(index).map(Sentence::text)
    }

    /// Index of the sentence most similar to `query` as a whole string.
    ///
    /// Records the winning score on that sentence; ties keep the earliest
    /// sentence. Returns `None` for an empty corpus.
    pub fn find_best_match(&mut self, query: &str) -> Result<Option<usize>> {
        if self.corpus.is_empty() {
            return Ok(None);
        }
        let start = Instant::now();
        let mut bigrams = GramTable::new(query, BIGRAM)?;

        let mut best_index = 0;
        let mut best_score = 0.0f32;
        for (i, sentence) in self.corpus.sentences.iter().enumerate() {
            let score = compare_with_table(&mut bigrams, query, sentence.text());
            if score > best_score {
                best_index = i;
                best_score = score;
            }
            bigrams.restore();
        }
        self.corpus.sentences[best_index].score = best_score;

        trace!(
            best_index,
            best_score,
            elapsed_us = start.elapsed().as_micros() as u64,
            "best match"
        );
        Ok(Some(best_index))
    }

    /// Windowed search with parameters from `config`.
    pub fn search_with(&mut self, query: &str, config: &SearchConfig) -> Result<&[usize]> {
        self.search(query, config.num_results, config.gram_length, config.threshold)
    }

    /// Score every sentence against `query` and order sentence indices by
    /// descending score.
    ///
    /// The first `num_results` entries of the returned ordering are sorted;
    /// the rest are unordered. Per-sentence scores and spans are then
    /// available through [`score`](Self::score) and
    /// [`matches`](Self::matches) until the next search.
    pub fn search(
        &mut self,
        query: &str,
        num_results: usize,
        gram_length: usize,
        threshold: f32,
    ) -> Result<&[usize]> {
        SearchConfig::new(num_results, gram_length, threshold).validate()?;
        let start = Instant::now();

        {
            let mut grams = GramTable::new(query, gram_length)?;
            score_tokens(&mut grams, &self.corpus.sentences, &mut self.corpus.tokens);
        }

        let width = window_width(split_tokens(query).count());
        let Corpus {
            sentences, tokens, ..
        } = &mut self.corpus;
        for (sentence, score) in sentences.iter_mut().zip(self.scores.iter_mut()) {
            aggregate_sentence(sentence, tokens, width, threshold, &mut self.score_window);
            *score = sentence.score;
        }

        rank_descending(&self.scores, num_results, &mut self.indices);

        debug!(
            sentences = self.indices.len(),
            num_results,
            gram_length,
            elapsed_us = start.elapsed().as_micros() as u64,
            "windowed search"
        );
        Ok(self.indices.as_slice())
    }

    /// Result ordering produced by the last windowed search.
    #[inline]
    pub fn last_ranking(&self) -> &[usize] {
        &self.indices
    }

    /// Relevance score of sentence `index` from the last search.
    pub fn score(&self, index: usize) -> Result<f32> {
        self.checked(index).map(Sentence::score)
    }

    /// Match spans of sentence `index` from the last windowed search.
    pub fn matches(&self, index: usize) -> Result<&[Match]> {
        self.checked(index).map(Sentence::matches)
    }

    /// The first `limit` entries of the last windowed search as owned hits.
    pub fn hits(&self, limit: usize) -> Vec<SearchHit> {
        self.indices
            .iter()
            .take(limit)
            .map(|&index| {
                let sentence = &self.corpus.sentences[index];
                SearchHit {
                    index,
                    score: sentence.score(),
                    matches: sentence.matches().to_vec(),
                }
            })
            .collect()
    }

    fn checked(&self, index: usize) -> Result<&Sentence> {
        self.corpus
            .sentences()
            .get(index)
            .ok_or(SearchError::IndexOutOfRange {
                index,
                len: self.corpus.len(),
            })
    }
}
