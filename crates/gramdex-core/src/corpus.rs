//! Corpus index
//!
//! Sentences are split on ASCII whitespace. Every distinct token text is
//! stored once in a token arena and every occurrence refers to it through a
//! [`TokenId`], so per-token work during a search runs once per word form
//! rather than once per occurrence.

use std::collections::HashMap;
use std::time::Instant;

use ahash::RandomState;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::matches::Match;

/// Stable index of a unique token in the corpus token arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(u32);

impl TokenId {
    /// Id for arena slot `index`, failing once the arena outgrows `u32`.
    pub fn from_index(index: usize) -> Result<Self> {
        u32::try_from(index).map(TokenId).map_err(|_| {
            SearchError::InvalidArgument(format!(
                "corpus has more than {} unique tokens",
                u32::MAX
            ))
        })
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Location of a token's text inside the corpus sentence storage.
#[derive(Debug, Clone, Copy)]
struct TextRef {
    sentence: usize,
    start: usize,
    end: usize,
}

/// A distinct word form with its transient per-query score and spans.
#[derive(Debug, Clone)]
pub struct Token {
    text: TextRef,
    pub(crate) score: f32,
    /// Spans relative to the start of the token.
    pub(crate) matches: Vec<Match>,
}

impl Token {
    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[inline]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }
}

/// One occurrence of a token within a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedToken {
    pub token: TokenId,
    /// Byte offset of this occurrence within its sentence.
    pub offset: usize,
}

/// A corpus entry with its tokenization and transient search results.
#[derive(Debug, Clone)]
pub struct Sentence {
    text: String,
    pub(crate) tokens: Vec<IndexedToken>,
    pub(crate) score: f32,
    pub(crate) matches: Vec<Match>,
}

impl Sentence {
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn tokens(&self) -> &[IndexedToken] {
        &self.tokens
    }

    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[inline]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }
}

/// Statistics reported after building a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub sentences: usize,
    pub token_occurrences: usize,
    pub unique_tokens: usize,
    pub max_sentence_tokens: usize,
    pub build_time_us: u64,
}

/// Immutable sentence storage plus the deduplicated token arena.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub(crate) sentences: Vec<Sentence>,
    pub(crate) tokens: Vec<Token>,
    stats: CorpusStats,
}

impl Corpus {
    /// Tokenize and index `sentences`. The strings move into the corpus.
    pub fn build(sentences: Vec<String>) -> Result<Self> {
        let start = Instant::now();

        let mut arena: Vec<Token> = Vec::new();
        let mut indexed: Vec<Vec<IndexedToken>> = Vec::new();
        indexed.try_reserve_exact(sentences.len())?;
        {
            let mut ids: HashMap<&str, TokenId, RandomState> =
                HashMap::with_hasher(RandomState::new());
            ids.try_reserve(sentences.len() * 2)?;

            for (sentence_idx, text) in sentences.iter().enumerate() {
                let mut occurrences = Vec::new();
                for (offset, word) in split_tokens(text) {
                    let id = match ids.get(word) {
                        Some(&id) => id,
                        None => {
                            let id = TokenId::from_index(arena.len())?;
                            arena.try_reserve(1)?;
                            ids.try_reserve(1)?;
                            arena.push(Token {
                                text: TextRef {
                                    sentence: sentence_idx,
                                    start: offset,
                                    end: offset + word.len(),
                                },
                                score: 0.0,
                                matches: Vec::new(),
                            });
                            ids.insert(word, id);
                            id
                        }
                    };
                    occurrences.try_reserve(1)?;
                    occurrences.push(IndexedToken { token: id, offset });
                }
                indexed.push(occurrences);
            }
        }
        arena.shrink_to_fit();

        let mut built = Vec::new();
        built.try_reserve_exact(sentences.len())?;
        built.extend(
            sentences
                .into_iter()
                .zip(indexed)
                .map(|(text, tokens)| Sentence {
                    text,
                    tokens,
                    score: 0.0,
                    matches: Vec::new(),
                }),
        );
        let sentences = built;

        let token_occurrences = sentences.iter().map(|s| s.tokens.len()).sum();
        let max_sentence_tokens = sentences.iter().map(|s| s.tokens.len()).max().unwrap_or(0);
        let stats = CorpusStats {
            sentences: sentences.len(),
            token_occurrences,
            unique_tokens: arena.len(),
            max_sentence_tokens,
            build_time_us: start.elapsed().as_micros() as u64,
        };
        debug!(
            sentences = stats.sentences,
            token_occurrences = stats.token_occurrences,
            unique_tokens = stats.unique_tokens,
            build_time_us = stats.build_time_us,
            "corpus indexed"
        );

        Ok(Self {
            sentences,
            tokens: arena,
            stats,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> CorpusStats {
        self.stats
    }

    #[inline]
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    /// Text of a unique token, resolved from the sentence that introduced it.
    #[inline]
    pub fn token_text(&self, id: TokenId) -> &str {
        token_text(&self.sentences, &self.tokens[id.index()])
    }
}

/// Resolve a token's text against sentence storage. Kept free-standing so the
/// scorer can read sentences while it holds the token arena mutably.
#[inline]
pub(crate) fn token_text<'a>(sentences: &'a [Sentence], token: &Token) -> &'a str {
    let TextRef {
        sentence,
        start,
        end,
    } = token.text;
    &sentences[sentence].text[start..end]
}

/// Split on runs of ASCII whitespace, yielding `(byte_offset, token)` pairs.
pub fn split_tokens(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    let bytes = text.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        Some((start, &text[start..pos]))
    })
}
