//! Bounded top-K accumulation and pairwise merging.

use super::ordering::TieBreak;
use crate::pipeline::traits::Combiner;
use crate::types::CountEntry;

/// Keeps the K highest-ranked entries seen so far in O(K) memory.
///
/// The buffer may grow to `2K` entries between prunes, so an insertion costs
/// one push plus an O(K) prune every K insertions. A partition therefore
/// needs memory proportional to K regardless of how many distinct n-grams it
/// observes.
#[derive(Debug, Clone)]
pub struct TopK {
    k: usize,
    tie_break: TieBreak,
    entries: Vec<CountEntry>,
}

impl TopK {
    /// Accumulator for the `k` highest-count entries, arbitrary tie order.
    pub fn new(k: usize) -> Self {
        Self::with_tie_break(k, TieBreak::default())
    }

    /// Accumulator with an explicit tie-break policy.
    pub fn with_tie_break(k: usize, tie_break: TieBreak) -> Self {
        Self {
            k,
            tie_break,
            entries: Vec::with_capacity(if k == 0 { 0 } else { k * 2 }),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Offer one entry.
    ///
    /// With `k == 0` nothing is ever retained; the result stays empty rather
    /// than holding placeholder entries.
    pub fn insert(&mut self, entry: CountEntry) {
        if self.k == 0 {
            return;
        }
        self.entries.push(entry);
        if self.entries.len() >= self.k * 2 {
            self.prune();
        }
    }

    /// Union with another accumulator, then re-select the top K.
    ///
    /// Associative: any merge tree over the same inputs selects the same
    /// multiset of counts. Both sides must agree on K and tie-break policy.
    pub fn merge(mut self, mut other: TopK) -> TopK {
        debug_assert_eq!(self.k, other.k);
        debug_assert_eq!(self.tie_break, other.tie_break);
        self.entries.append(&mut other.entries);
        self.prune();
        self
    }

    /// Drop everything ranked below the K-th place.
    fn prune(&mut self) {
        if self.entries.len() <= self.k {
            return;
        }
        let tie_break = self.tie_break;
        // Partition so the K highest-ranked entries occupy the front.
        self.entries
            .select_nth_unstable_by(self.k - 1, |a, b| tie_break.compare(b, a));
        self.entries.truncate(self.k);
    }

    /// Finish: the retained entries sorted descending by rank.
    ///
    /// Length is `min(K, entries offered)` — an empty input or `K == 0`
    /// yields an empty list, never padded with synthetic entries.
    pub fn into_sorted(mut self) -> Vec<CountEntry> {
        self.prune();
        let tie_break = self.tie_break;
        self.entries
            .sort_unstable_by(|a, b| tie_break.compare(b, a));
        self.entries
    }
}

/// The selection reduction: fold entries into a bounded accumulator, merge
/// accumulators pairwise, finish by sorting descending.
#[derive(Debug, Clone, Copy)]
pub struct TopKCombiner {
    k: usize,
    tie_break: TieBreak,
}

impl TopKCombiner {
    pub fn new(k: usize) -> Self {
        Self::with_tie_break(k, TieBreak::default())
    }

    pub fn with_tie_break(k: usize, tie_break: TieBreak) -> Self {
        Self { k, tie_break }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }
}

impl Combiner for TopKCombiner {
    type Item = CountEntry;
    type Acc = TopK;
    type Output = Vec<CountEntry>;

    fn identity(&self) -> TopK {
        TopK::with_tie_break(self.k, self.tie_break)
    }

    fn observe(&self, acc: &mut TopK, item: CountEntry) {
        acc.insert(item);
    }

    fn combine(&self, a: TopK, b: TopK) -> TopK {
        a.merge(b)
    }

    fn finalize(&self, acc: TopK) -> Vec<CountEntry> {
        acc.into_sorted()
    }
}
