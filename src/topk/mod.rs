//! Bounded top-K selection.
//!
//! This module keeps the K highest-count entries of a (possibly partitioned)
//! entry stream without sorting the full table: each partition feeds a
//! size-bounded [`TopK`] accumulator, accumulators merge pairwise (union,
//! re-select), and the survivor is sorted descending only at the end.

pub mod ordering;
pub mod selector;

pub use ordering::TieBreak;
pub use selector::{TopK, TopKCombiner};
