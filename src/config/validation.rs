//! Validation engine for job specifications.
//!
//! The engine runs every registered [`ValidationRule`] against a [`JobSpec`]
//! and collects all findings into a [`ValidationReport`] — it never
//! short-circuits on the first error, so users see every problem at once.

use std::fmt;

use serde::Serialize;

use super::spec::JobSpec;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding attached to a spec field.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    /// Stable machine-readable code, e.g. `"window_not_positive"`.
    pub code: &'static str,
    /// Spec field the finding is attached to.
    pub path: &'static str,
    pub message: String,
}

impl ValidationDiagnostic {
    pub fn error(code: &'static str, path: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            path,
            message: message.into(),
        }
    }

    pub fn warning(code: &'static str, path: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.path, self.message, self.code)
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Total number of diagnostics (errors + warnings).
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if there are no diagnostics at all.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a [`JobSpec`] and returns zero or
/// more diagnostics.
///
/// Rules are stateless and `Send + Sync` so one engine can be shared across
/// threads.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule.
    fn name(&self) -> &str;

    /// Inspect `spec` and return any findings.
    fn validate(&self, spec: &JobSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Built-in rules ─────────────────────────────────────────────────────────

/// `n` must be at least 1; a window of width zero has no meaning.
struct WindowPositive;

impl ValidationRule for WindowPositive {
    fn name(&self) -> &str {
        "window_positive"
    }

    fn validate(&self, spec: &JobSpec) -> Vec<ValidationDiagnostic> {
        if spec.n < 1 {
            vec![ValidationDiagnostic::error(
                "window_not_positive",
                "n",
                format!("n must be at least 1, got {}", spec.n),
            )]
        } else {
            Vec::new()
        }
    }
}

/// `top` may be zero (empty output) but never negative.
struct TopNonNegative;

impl ValidationRule for TopNonNegative {
    fn name(&self) -> &str {
        "top_non_negative"
    }

    fn validate(&self, spec: &JobSpec) -> Vec<ValidationDiagnostic> {
        if spec.top < 0 {
            vec![ValidationDiagnostic::error(
                "top_negative",
                "top",
                format!("top must be non-negative, got {}", spec.top),
            )]
        } else {
            Vec::new()
        }
    }
}

/// An output destination must be resolvable before the pipeline runs.
struct OutputResolvable;

impl ValidationRule for OutputResolvable {
    fn name(&self) -> &str {
        "output_resolvable"
    }

    fn validate(&self, spec: &JobSpec) -> Vec<ValidationDiagnostic> {
        if spec.output.is_none() && spec.staging_location.is_none() {
            vec![ValidationDiagnostic::error(
                "output_unresolvable",
                "output",
                "set `output` or `staging_location`",
            )]
        } else {
            Vec::new()
        }
    }
}

/// Fields the schema does not recognize are reported as warnings.
struct NoUnknownFields;

impl ValidationRule for NoUnknownFields {
    fn name(&self) -> &str {
        "no_unknown_fields"
    }

    fn validate(&self, spec: &JobSpec) -> Vec<ValidationDiagnostic> {
        spec.unknown_fields
            .keys()
            .map(|key| {
                ValidationDiagnostic::warning(
                    "unknown_field",
                    "spec",
                    format!("unrecognized field `{key}`"),
                )
            })
            .collect()
    }
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a [`JobSpec`] and collects
/// their findings.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Engine with every built-in rule registered.
    pub fn with_defaults() -> Self {
        Self {
            rules: vec![
                Box::new(WindowPositive),
                Box::new(TopNonNegative),
                Box::new(OutputResolvable),
                Box::new(NoUnknownFields),
            ],
        }
    }

    /// Register an additional rule.
    pub fn with_rule(mut self, rule: Box<dyn ValidationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Run every rule, collecting all diagnostics.
    pub fn validate(&self, spec: &JobSpec) -> ValidationReport {
        let diagnostics = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(spec))
            .collect();
        ValidationReport { diagnostics }
    }
}
