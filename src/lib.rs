//! Exact n-gram frequency counting with bounded top-K selection.
//!
//! `ngram-tally` computes the global frequency distribution of contiguous
//! n-token sequences over a corpus of text lines and extracts the K
//! highest-count n-grams. The work is structured as a data-parallel batch
//! pipeline: every stage is either a per-element map or an associative
//! reduction, so corpus partitions are processed independently and merged
//! through a combiner tree with no shared mutable state.
//!
//! # Pipeline
//!
//! lines → [`extract`] → n-gram stream → [`count`] → count table →
//! [`topk`] → top-K list → [`format`] → output lines
//!
//! # Quick start
//!
//! ```
//! use ngram_tally::pipeline::observer::NoopObserver;
//! use ngram_tally::pipeline::{NGramPipeline, PipelineConfig};
//!
//! let lines = vec!["a b a b"];
//! let pipeline = NGramPipeline::new(PipelineConfig::default());
//! let output = pipeline.run(&lines, &mut NoopObserver);
//! assert_eq!(output, ["a\tb\t2", "b\ta\t1"]);
//! ```
//!
//! # Tie order
//!
//! Entries with equal counts have no defined relative order by default,
//! mirroring a count-only comparator; pass
//! [`TieBreak::Lexicographic`](topk::TieBreak) for fully deterministic
//! output.

pub mod config;
pub mod count;
pub mod error;
pub mod extract;
pub mod format;
pub mod io;
pub mod pipeline;
pub mod topk;
pub mod types;

pub use error::NGramError;
pub use pipeline::{NGramPipeline, PipelineConfig};
pub use topk::TieBreak;
pub use types::{CountEntry, NGram};
