//! Gram frequency table
//!
//! A multiset of the overlapping length-`g` substrings of a query. Each
//! distinct gram maps to a slot in a flat counter array. The array holds two
//! regions of equal size: live counters that are decremented while a
//! candidate is scanned, and a pristine snapshot taken after construction.
//! Restoring the table between candidates is a single `copy_from_slice` of
//! the snapshot over the live region, so the map itself is never rebuilt.

use std::collections::HashMap;

use ahash::RandomState;

use crate::error::{Result, SearchError};

/// Multiset of the grams of one query string, reusable across comparisons.
#[derive(Debug)]
pub struct GramTable<'q> {
    gram_len: usize,
    slots: HashMap<&'q [u8], usize, RandomState>,
    /// `counts[..gram_count]` is live, `counts[gram_count..]` is the snapshot.
    counts: Vec<i32>,
    gram_count: usize,
}

impl<'q> GramTable<'q> {
    /// Build the table from every length-`gram_len` window of `text`.
    ///
    /// A text shorter than `gram_len` yields an empty table with a gram count
    /// of zero.
    pub fn new(text: &'q str, gram_len: usize) -> Result<Self> {
        if gram_len == 0 {
            return Err(SearchError::InvalidArgument(
                "gram length must be at least 1".to_string(),
            ));
        }
        let bytes = text.as_bytes();
        let gram_count = gram_count(bytes.len(), gram_len);

        let mut counts = Vec::new();
        counts.try_reserve_exact(gram_count * 2)?;
        counts.resize(gram_count * 2, 0);

        let mut slots = HashMap::with_hasher(RandomState::new());
        slots.try_reserve(gram_count)?;

        let mut next_slot = 0;
        for gram in bytes.windows(gram_len).take(gram_count) {
            let slot = *slots.entry(gram).or_insert_with(|| {
                let slot = next_slot;
                next_slot += 1;
                slot
            });
            counts[slot] += 1;
        }

        let (live, snapshot) = counts.split_at_mut(gram_count);
        snapshot.copy_from_slice(live);

        Ok(Self {
            gram_len,
            slots,
            counts,
            gram_count,
        })
    }

    /// Number of grams (with multiplicity) in the source text.
    #[inline]
    pub fn gram_count(&self) -> usize {
        self.gram_count
    }

    /// Number of distinct grams.
    #[inline]
    pub fn distinct_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn gram_len(&self) -> usize {
        self.gram_len
    }

    /// Consume one occurrence of `gram`. Returns `true` on a hit.
    ///
    /// A gram whose live count has reached zero is used up and will not hit
    /// again until [`restore`](Self::restore) is called.
    #[inline]
    pub fn consume(&mut self, gram: &[u8]) -> bool {
        match self.slots.get(gram) {
            Some(&slot) if self.counts[slot] > 0 => {
                self.counts[slot] -= 1;
                true
            }
            _ => false,
        }
    }

    /// Copy the pristine snapshot back over the live counters.
    #[inline]
    pub fn restore(&mut self) {
        let (live, snapshot) = self.counts.split_at_mut(self.gram_count);
        live.copy_from_slice(snapshot);
    }

    /// Remaining live count for `gram`, or zero if it never occurred.
    pub fn remaining(&self, gram: &[u8]) -> i32 {
        self.slots.get(gram).map_or(0, |&slot| self.counts[slot])
    }
}

/// Number of length-`gram_len` windows in a text of `len` bytes.
#[inline]
pub fn gram_count(len: usize, gram_len: usize) -> usize {
    (len + 1).saturating_sub(gram_len)
}
