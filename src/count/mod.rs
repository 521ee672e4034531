//! Exact n-gram counting.
//!
//! [`NGramTally`] is one partition's count table. [`NGramTally::merge`] is
//! the pairwise combine: counts for shared keys are summed, remaining keys
//! unioned. The combine is associative and commutative, so partial tables may
//! be merged in any order or tree shape and the result equals a
//! single-threaded tally of the whole corpus.

use rustc_hash::FxHashMap;

use crate::pipeline::traits::Combiner;
use crate::types::{CountEntry, NGram};

/// A mapping from distinct n-gram to its occurrence count.
///
/// Counts for unseen n-grams are implicitly zero and never materialized; a
/// stored count is always positive.
#[derive(Debug, Clone, Default)]
pub struct NGramTally {
    counts: FxHashMap<NGram, u64>,
}

impl NGramTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Record one occurrence.
    pub fn observe(&mut self, ngram: NGram) {
        *self.counts.entry(ngram).or_insert(0) += 1;
    }

    /// Record `count` occurrences at once (the unit of the pairwise combine).
    pub fn observe_count(&mut self, ngram: NGram, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(ngram).or_insert(0) += count;
    }

    /// Pairwise combine: sum counts for shared keys, union the rest.
    ///
    /// Folds the smaller table into the larger one, so reduction cost is
    /// proportional to the smaller side.
    pub fn merge(mut self, mut other: NGramTally) -> NGramTally {
        if other.counts.len() > self.counts.len() {
            std::mem::swap(&mut self, &mut other);
        }
        for (ngram, count) in other.counts {
            self.observe_count(ngram, count);
        }
        self
    }

    /// Count for `ngram`; zero when unseen.
    pub fn count(&self, ngram: &str) -> u64 {
        self.counts.get(ngram).copied().unwrap_or(0)
    }

    /// Number of distinct n-grams.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total occurrences across all distinct n-grams.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(n-gram, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&NGram, u64)> {
        self.counts.iter().map(|(ngram, &count)| (ngram, count))
    }

    /// Consume the table into count entries, in unspecified order.
    pub fn into_entries(self) -> impl Iterator<Item = CountEntry> {
        self.counts
            .into_iter()
            .map(|(ngram, count)| CountEntry { ngram, count })
    }
}

/// The counting reduction: fold n-grams into a tally, merge tallies pairwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountCombiner;

impl Combiner for CountCombiner {
    type Item = NGram;
    type Acc = NGramTally;
    type Output = NGramTally;

    fn identity(&self) -> NGramTally {
        NGramTally::new()
    }

    fn observe(&self, acc: &mut NGramTally, item: NGram) {
        acc.observe(item);
    }

    fn combine(&self, a: NGramTally, b: NGramTally) -> NGramTally {
        a.merge(b)
    }

    fn finalize(&self, acc: NGramTally) -> NGramTally {
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(ngrams: &[&str]) -> NGramTally {
        let mut tally = NGramTally::new();
        for &ngram in ngrams {
            tally.observe(NGram::from(ngram));
        }
        tally
    }

    #[test]
    fn test_observe_accumulates() {
        let tally = tally_of(&["a\tb", "b\ta", "a\tb"]);
        assert_eq!(tally.count("a\tb"), 2);
        assert_eq!(tally.count("b\ta"), 1);
        assert_eq!(tally.distinct(), 2);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_unseen_ngrams_are_implicitly_zero() {
        let tally = tally_of(&["a\tb"]);
        assert_eq!(tally.count("never\tseen"), 0);
        assert_eq!(tally.distinct(), 1);
    }

    #[test]
    fn test_merge_sums_shared_keys_and_unions_rest() {
        let left = tally_of(&["a\tb", "a\tb", "b\tc"]);
        let right = tally_of(&["a\tb", "c\td"]);

        let merged = left.merge(right);
        assert_eq!(merged.count("a\tb"), 3);
        assert_eq!(merged.count("b\tc"), 1);
        assert_eq!(merged.count("c\td"), 1);
        assert_eq!(merged.distinct(), 3);
        assert_eq!(merged.total(), 5);
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = tally_of(&["x", "y", "x"]);
        let b = tally_of(&["y", "z"]);

        let ab = a.clone().merge(b.clone());
        let ba = b.merge(a);
        for (ngram, count) in ab.iter() {
            assert_eq!(ba.count(ngram.as_str()), count);
        }
        assert_eq!(ab.distinct(), ba.distinct());
    }

    #[test]
    fn test_merge_tree_shapes_agree() {
        let parts = [
            tally_of(&["a", "b"]),
            tally_of(&["a"]),
            tally_of(&["b", "c"]),
        ];

        let left_fold = parts[0]
            .clone()
            .merge(parts[1].clone())
            .merge(parts[2].clone());
        let right_fold = parts[0]
            .clone()
            .merge(parts[1].clone().merge(parts[2].clone()));

        assert_eq!(left_fold.count("a"), right_fold.count("a"));
        assert_eq!(left_fold.count("b"), right_fold.count("b"));
        assert_eq!(left_fold.count("c"), right_fold.count("c"));
        assert_eq!(left_fold.total(), right_fold.total());
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let tally = tally_of(&["a\tb"]);
        let merged = tally.merge(NGramTally::new());
        assert_eq!(merged.count("a\tb"), 1);
        assert_eq!(merged.distinct(), 1);
    }

    #[test]
    fn test_observe_count_zero_stores_nothing() {
        let mut tally = NGramTally::new();
        tally.observe_count(NGram::from("a"), 0);
        assert!(tally.is_empty());
    }

    #[test]
    fn test_into_entries_carry_positive_counts() {
        let tally = tally_of(&["a", "b", "a"]);
        let entries: Vec<CountEntry> = tally.into_entries().collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.count > 0));
    }

    #[test]
    fn test_count_combiner_matches_manual_tally() {
        let c = CountCombiner;
        let mut acc = c.identity();
        for ngram in ["a", "b", "a"] {
            c.observe(&mut acc, NGram::from(ngram));
        }
        let out = c.finalize(acc);
        assert_eq!(out.count("a"), 2);
        assert_eq!(out.count("b"), 1);
    }
}
