//! Pipeline observer — hooks for timing, logging, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. [`NoopObserver`] costs nothing; [`StageTimingObserver`]
//! collects one [`StageReport`] per stage in execution order.

use std::time::{Duration, Instant};

use crate::count::NGramTally;
use crate::types::CountEntry;

/// Stage names reported by the runner.
///
/// Extraction is fused into the counting fold, so the runner reports three
/// stages.
pub const STAGE_COUNT: &str = "count";
pub const STAGE_TOP_K: &str = "top_k";
pub const STAGE_FORMAT: &str = "format";

// ─── Clock and report ───────────────────────────────────────────────────────

/// Wall-clock timer for one stage.
#[derive(Debug)]
pub struct StageClock {
    start: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Metrics reported at a stage boundary.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    elapsed: Duration,
    items: Option<u64>,
    distinct: Option<u64>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            items: None,
            distinct: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elements the stage produced, when the stage counts them.
    pub fn items(&self) -> Option<u64> {
        self.items
    }

    /// Distinct keys the stage produced, when the stage tracks them.
    pub fn distinct(&self) -> Option<u64> {
        self.distinct
    }
}

/// Builder for reports carrying optional per-stage metrics.
#[derive(Debug)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn items(mut self, items: u64) -> Self {
        self.report.items = Some(items);
        self
    }

    pub fn distinct(mut self, distinct: u64) -> Self {
        self.report.distinct = Some(distinct);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

// ─── Observer trait and built-ins ───────────────────────────────────────────

/// Callbacks fired by the runner at stage boundaries.
///
/// All methods default to no-ops; implement only what you need. Artifact
/// callbacks receive borrows of intermediate results before the next stage
/// consumes them.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// The completed global count table, before selection consumes it.
    fn on_counts(&mut self, _tally: &NGramTally) {}

    /// The final top-K list, before formatting.
    fn on_top_k(&mut self, _entries: &[CountEntry]) {}
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Collects `(stage, report)` pairs in execution order.
#[derive(Debug, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_builder_sets_optional_metrics() {
        let report = StageReportBuilder::new(Duration::from_millis(5))
            .items(42)
            .distinct(7)
            .build();
        assert_eq!(report.elapsed(), Duration::from_millis(5));
        assert_eq!(report.items(), Some(42));
        assert_eq!(report.distinct(), Some(7));
    }

    #[test]
    fn test_plain_report_has_no_metrics() {
        let report = StageReport::new(Duration::ZERO);
        assert_eq!(report.items(), None);
        assert_eq!(report.distinct(), None);
    }

    #[test]
    fn test_timing_observer_collects_in_order() {
        let mut obs = StageTimingObserver::new();
        obs.on_stage_end(STAGE_COUNT, &StageReport::new(Duration::ZERO));
        obs.on_stage_end(STAGE_TOP_K, &StageReport::new(Duration::ZERO));

        let stages: Vec<&str> = obs.reports().iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, vec![STAGE_COUNT, STAGE_TOP_K]);
    }

    #[test]
    fn test_noop_observer_is_usable_as_trait_object() {
        let mut obs: Box<dyn PipelineObserver> = Box::new(NoopObserver);
        obs.on_stage_start(STAGE_COUNT);
    }
}
