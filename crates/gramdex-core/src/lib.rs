//! gramdex Core Engine
//!
//! In-memory fuzzy search over a fixed corpus of short, already normalized
//! sentences. Similarity is Sørensen–Dice over character grams, so matching
//! tolerates typos, reordering and partial overlap.
//!
//! Two query types are supported:
//!
//! - [`Searcher::find_best_match`] - the single sentence most similar to the
//!   query as a whole string (bigram Dice).
//! - [`Searcher::search`] - every sentence scored by its best window of
//!   per-token Dice scores, ordered with a sorted top-K prefix, with the
//!   matching byte spans of each sentence available for highlighting.
//!
//! # Example
//!
//! ```rust
//! use gramdex_core::{Match, Searcher};
//!
//! let mut searcher = Searcher::new(vec![
//!     "the quick brown fox".into(),
//!     "lazy dog sleeps".into(),
//!     "quick brown fence".into(),
//! ])?;
//!
//! assert_eq!(searcher.find_best_match("lazy dgo")?, Some(1));
//!
//! let ranking = searcher.search("quick brown", 2, 2, 0.5)?.to_vec();
//! assert_eq!(ranking[2], 1);
//! assert_eq!(searcher.matches(0)?, &[Match::new(4, 9), Match::new(10, 15)]);
//! # Ok::<(), gramdex_core::SearchError>(())
//! ```
//!
//! # Concurrency
//!
//! A searcher owns scratch buffers and per-sentence results that every query
//! overwrites, so all query methods take `&mut self`. Share an instance
//! between threads only behind a lock.

pub mod config;
pub mod corpus;
pub mod error;
pub mod grams;
pub mod matches;
pub mod searcher;
pub mod select;
pub mod similarity;
pub mod window;

// Re-export main types at crate root
pub use config::SearchConfig;
pub use corpus::{Corpus, CorpusStats, IndexedToken, Sentence, Token, TokenId};
pub use error::{Result, SearchError};
pub use grams::GramTable;
pub use matches::{push_merged, Match};
pub use searcher::{SearchHit, Searcher};
pub use similarity::compare_two_strings;
