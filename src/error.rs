//! Crate error type.
//!
//! Errors arise only at the configuration and I/O boundaries. The pipeline
//! stages themselves are total: extraction, counting, selection, and
//! formatting cannot fail on any input line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NGramError {
    /// The job spec failed validation; the message aggregates every
    /// diagnostic found in one pass.
    #[error("invalid job spec: {0}")]
    InvalidSpec(String),

    /// Neither an explicit output nor a staging location was supplied.
    #[error("no resolvable output destination: set `output` or `staging_location`")]
    MissingOutput,

    /// Unknown tie-break policy name.
    #[error("unknown tie-break policy `{0}` (expected `arbitrary` or `lexicographic`)")]
    InvalidTieBreak(String),

    /// Input or output failure in the external collaborators.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
