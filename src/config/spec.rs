//! Job specification — raw options as parsed from flags or a JSON document.
//!
//! A [`JobSpec`] carries the options exactly as supplied, including values
//! that are out of range. Validation and resolution happen in one explicit
//! step ([`JobSpec::resolve`]) before any line is read.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "n": 2,
//!   "top": 100,
//!   "input": "corpus.txt",
//!   "staging_location": "/tmp/stage",
//!   "tie_break": "lexicographic"
//! }
//! ```

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::validation::ValidationEngine;
use crate::error::NGramError;
use crate::pipeline::PipelineConfig;
use crate::topk::TieBreak;

/// Raw, unvalidated job options.
///
/// Numeric fields are signed so out-of-range values (e.g. `--n 0`) survive
/// parsing and reach validation, which reports every problem at once instead
/// of failing on the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    /// Window width in tokens. Defaults to 2 (bigrams).
    #[serde(default = "default_n")]
    pub n: i64,

    /// Number of highest-count n-grams to return. Defaults to 100.
    #[serde(default = "default_top")]
    pub top: i64,

    /// Path of the file to read; stdin when omitted.
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Path of the file to write.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Directory used to derive `<staging_location>/counts.txt` when
    /// `output` is omitted.
    #[serde(default)]
    pub staging_location: Option<PathBuf>,

    /// Ordering among equal-count entries.
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Captures any fields not recognized by the schema; reported as
    /// warnings by validation.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

fn default_n() -> i64 {
    2
}

fn default_top() -> i64 {
    100
}

impl Default for JobSpec {
    fn default() -> Self {
        Self {
            n: default_n(),
            top: default_top(),
            input: None,
            output: None,
            staging_location: None,
            tie_break: TieBreak::default(),
            unknown_fields: HashMap::new(),
        }
    }
}

/// A fully validated job: pipeline parameters plus resolved I/O locations.
#[derive(Debug, Clone)]
pub struct ResolvedJob {
    pub pipeline: PipelineConfig,
    /// Input path; stdin when `None`.
    pub input: Option<PathBuf>,
    /// Resolved output path.
    pub output: PathBuf,
}

impl JobSpec {
    /// Validate and resolve this spec.
    ///
    /// Runs every validation rule and aggregates all errors into a single
    /// [`NGramError::InvalidSpec`]; nothing is read or written before this
    /// succeeds.
    pub fn resolve(&self) -> Result<ResolvedJob, NGramError> {
        let report = ValidationEngine::with_defaults().validate(self);
        if report.has_errors() {
            let joined = report
                .errors()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(NGramError::InvalidSpec(joined));
        }

        // The rules above guarantee both conversions.
        let n = NonZeroUsize::new(self.n as usize)
            .ok_or_else(|| NGramError::InvalidSpec(format!("n must be at least 1, got {}", self.n)))?;
        let output = match (&self.output, &self.staging_location) {
            (Some(output), _) => output.clone(),
            (None, Some(staging)) => staging.join("counts.txt"),
            (None, None) => return Err(NGramError::MissingOutput),
        };

        Ok(ResolvedJob {
            pipeline: PipelineConfig {
                n,
                top: self.top as usize,
                tie_break: self.tie_break,
            },
            input: self.input.clone(),
            output,
        })
    }
}
