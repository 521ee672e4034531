//! Ordering policy for ranking count entries.
//!
//! The ranking comparator examines the numeric count; what happens between
//! equal counts is a named, injectable policy rather than an accident of the
//! selection algorithm, so the tie-break behavior is explicit and testable.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NGramError;
use crate::types::CountEntry;

/// How equal-count entries relate when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Rank by count alone. Equal-count entries have no defined relative
    /// order; which of them survives at the K-th place may vary by run or by
    /// partitioning. The multiset of selected counts is unaffected.
    #[default]
    Arbitrary,
    /// Rank by count, then by n-gram text ascending. Output is identical
    /// across runs and partitionings.
    Lexicographic,
}

impl TieBreak {
    /// Compare two entries by rank: `Greater` means `a` outranks `b`.
    pub fn compare(self, a: &CountEntry, b: &CountEntry) -> Ordering {
        match self {
            TieBreak::Arbitrary => a.count.cmp(&b.count),
            TieBreak::Lexicographic => {
                // The lexicographically smaller n-gram ranks higher.
                a.count.cmp(&b.count).then_with(|| b.ngram.cmp(&a.ngram))
            }
        }
    }

    /// `true` when `a` strictly outranks `b`.
    pub fn outranks(self, a: &CountEntry, b: &CountEntry) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    /// The user-facing name used in flags and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::Arbitrary => "arbitrary",
            TieBreak::Lexicographic => "lexicographic",
        }
    }
}

impl FromStr for TieBreak {
    type Err = NGramError;

    fn from_str(value: &str) -> Result<Self, NGramError> {
        match value {
            "arbitrary" => Ok(TieBreak::Arbitrary),
            "lexicographic" => Ok(TieBreak::Lexicographic),
            other => Err(NGramError::InvalidTieBreak(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_count_outranks() {
        let high = CountEntry::new("b", 5);
        let low = CountEntry::new("a", 2);
        for policy in [TieBreak::Arbitrary, TieBreak::Lexicographic] {
            assert!(policy.outranks(&high, &low));
            assert!(!policy.outranks(&low, &high));
        }
    }

    #[test]
    fn test_arbitrary_treats_equal_counts_as_equal() {
        let a = CountEntry::new("a", 3);
        let b = CountEntry::new("b", 3);
        assert_eq!(TieBreak::Arbitrary.compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_lexicographic_breaks_ties_ascending() {
        let a = CountEntry::new("apple", 3);
        let b = CountEntry::new("banana", 3);
        assert!(TieBreak::Lexicographic.outranks(&a, &b));
        assert!(!TieBreak::Lexicographic.outranks(&b, &a));
    }

    #[test]
    fn test_parse_policy_names() {
        assert_eq!("arbitrary".parse::<TieBreak>().ok(), Some(TieBreak::Arbitrary));
        assert_eq!(
            "lexicographic".parse::<TieBreak>().ok(),
            Some(TieBreak::Lexicographic)
        );
        assert!("count".parse::<TieBreak>().is_err());
    }

    #[test]
    fn test_as_str_round_trips() {
        for policy in [TieBreak::Arbitrary, TieBreak::Lexicographic] {
            assert_eq!(policy.as_str().parse::<TieBreak>().ok(), Some(policy));
        }
    }
}
