//! Match spans and the merge-on-append primitive

use serde::{Deserialize, Serialize};

/// Half-open byte interval `[start, end)` where query content aligned with
/// corpus content.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Same span moved right by `offset`.
    #[inline]
    pub fn shifted(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

/// Append `[start, end)` to `matches`, coalescing with the last span when
/// they touch or overlap.
///
/// Spans must be appended in non-decreasing `start` order.
#[inline]
pub fn push_merged(matches: &mut Vec<Match>, start: usize, end: usize) {
    debug_assert!(
        matches.last().map_or(true, |last| last.start <= start),
        "match spans appended out of order"
    );
    match matches.last_mut() {
        Some(last) if last.end >= start => last.end = last.end.max(end),
        _ => matches.push(Match::new(start, end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overlapping_spans_merge() {
        let mut matches = Vec::new();
        push_merged(&mut matches, 0, 2);
        push_merged(&mut matches, 1, 3);
        assert_eq!(matches, vec![Match::new(0, 3)]);
    }

    #[test]
    fn disjoint_spans_stay_separate() {
        let mut matches = Vec::new();
        push_merged(&mut matches, 0, 2);
        push_merged(&mut matches, 5, 7);
        assert_eq!(matches, vec![Match::new(0, 2), Match::new(5, 7)]);
    }

    #[test]
    fn adjacent_spans_merge() {
        let mut matches = Vec::new();
        push_merged(&mut matches, 0, 2);
        push_merged(&mut matches, 2, 4);
        push_merged(&mut matches, 3, 5);
        assert_eq!(matches, vec![Match::new(0, 5)]);
    }

    #[test]
    fn contained_span_does_not_shrink() {
        let mut matches = vec![Match::new(0, 6)];
        push_merged(&mut matches, 1, 3);
        assert_eq!(matches, vec![Match::new(0, 6)]);
    }

    #[test]
    fn shifted_moves_both_ends() {
        let m = Match::new(1, 3).shifted(10);
        assert_eq!(m, Match::new(11, 13));
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
    }
}
