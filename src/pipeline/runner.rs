//! Pipeline runner — partitioned execution and combiner-tree reduction.
//!
//! [`NGramPipeline::run`] executes: lines → extraction (fused into the
//! counting fold) → global count table → bounded top-K selection → formatted
//! output lines.
//!
//! Parallel execution sits on rayon's `fold`/`reduce`, which is exactly a
//! combiner tree: each worker folds its partition into a private accumulator,
//! and completed accumulators merge pairwise in whatever tree shape the
//! scheduler produces. Workers share no mutable state and synchronize only at
//! those merge points. The count table is complete before selection begins;
//! selection then partitions the table's entries the same way.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use tracing::debug;

use crate::count::{CountCombiner, NGramTally};
use crate::error::NGramError;
use crate::extract::NGramExtractor;
use crate::format::TabSeparatedFormatter;
use crate::pipeline::observer::{
    PipelineObserver, StageClock, StageReportBuilder, STAGE_COUNT, STAGE_FORMAT, STAGE_TOP_K,
};
use crate::pipeline::traits::{Combiner, MapStage};
use crate::topk::{TieBreak, TopKCombiner};
use crate::types::CountEntry;

const DEFAULT_N: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(n) => n,
    None => panic!("default window width is non-zero"),
};

/// Validated pipeline parameters.
///
/// `n` is non-zero by construction: the configuration layer rejects `n ≤ 0`
/// before a value of this type can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Window width in tokens.
    pub n: NonZeroUsize,
    /// Number of highest-count entries to keep.
    pub top: usize,
    /// Ordering among equal-count entries.
    pub tie_break: TieBreak,
}

impl Default for PipelineConfig {
    /// Bigrams, top 100, arbitrary tie order.
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            top: 100,
            tie_break: TieBreak::default(),
        }
    }
}

impl PipelineConfig {
    /// Build a config, rejecting `n == 0`.
    pub fn new(n: usize, top: usize) -> Result<Self, NGramError> {
        let n = NonZeroUsize::new(n)
            .ok_or_else(|| NGramError::InvalidSpec("n must be at least 1, got 0".into()))?;
        Ok(Self {
            n,
            top,
            tie_break: TieBreak::default(),
        })
    }

    /// Override the tie-break policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

/// Executes the n-gram counting pipeline over in-memory lines.
///
/// The pipeline holds no per-run state besides the extractor's emitted-n-gram
/// metric; one instance can run any number of corpora.
#[derive(Debug, Clone)]
pub struct NGramPipeline {
    extractor: NGramExtractor,
    counter: CountCombiner,
    selector: TopKCombiner,
    formatter: TabSeparatedFormatter,
}

impl NGramPipeline {
    /// Build a pipeline from validated parameters.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            extractor: NGramExtractor::new(config.n),
            counter: CountCombiner,
            selector: TopKCombiner::with_tie_break(config.top, config.tie_break),
            formatter: TabSeparatedFormatter,
        }
    }

    /// Total n-grams the extractor has emitted (observability only).
    pub fn ngrams_emitted(&self) -> u64 {
        self.extractor.emitted()
    }

    /// Run the full pipeline, producing formatted output lines in
    /// descending-count order.
    pub fn run<L>(&self, lines: &[L], observer: &mut impl PipelineObserver) -> Vec<String>
    where
        L: AsRef<str> + Sync,
    {
        let top = self.run_entries(lines, observer);

        observer.on_stage_start(STAGE_FORMAT);
        let clock = StageClock::start();
        let output = self.formatter.lines(&top);
        let report = StageReportBuilder::new(clock.elapsed())
            .items(output.len() as u64)
            .build();
        observer.on_stage_end(STAGE_FORMAT, &report);

        output
    }

    /// Run extraction, counting, and selection, returning the top-K list
    /// sorted descending by count.
    pub fn run_entries<L>(
        &self,
        lines: &[L],
        observer: &mut impl PipelineObserver,
    ) -> Vec<CountEntry>
    where
        L: AsRef<str> + Sync,
    {
        // Stage 1: tally. Extraction is fused into the per-partition fold, so
        // the n-gram stream is never materialized globally.
        observer.on_stage_start(STAGE_COUNT);
        let clock = StageClock::start();
        let tally = self.tally(lines);
        let report = StageReportBuilder::new(clock.elapsed())
            .items(tally.total())
            .distinct(tally.distinct() as u64)
            .build();
        debug!(
            occurrences = tally.total(),
            distinct = tally.distinct(),
            "count stage complete"
        );
        observer.on_stage_end(STAGE_COUNT, &report);
        observer.on_counts(&tally);

        // Stage 2: bounded selection over the completed table's entries.
        observer.on_stage_start(STAGE_TOP_K);
        let clock = StageClock::start();
        let entries: Vec<CountEntry> = tally.into_entries().collect();
        let top = reduce_parallel(&self.selector, entries);
        let report = StageReportBuilder::new(clock.elapsed())
            .items(top.len() as u64)
            .build();
        debug!(selected = top.len(), "top-k stage complete");
        observer.on_stage_end(STAGE_TOP_K, &report);
        observer.on_top_k(&top);

        top
    }

    /// Produce the global count table for `lines`.
    pub fn tally<L>(&self, lines: &[L]) -> NGramTally
    where
        L: AsRef<str> + Sync,
    {
        lines
            .par_iter()
            .fold(
                || self.counter.identity(),
                |mut acc, line| {
                    self.extractor
                        .process(line.as_ref(), &mut |ngram| self.counter.observe(&mut acc, ngram));
                    acc
                },
            )
            .reduce(|| self.counter.identity(), |a, b| self.counter.combine(a, b))
    }
}

// ============================================================================
// Combiner executors
// ============================================================================

/// Reduce `items` with `combiner` under rayon's combiner tree.
pub fn reduce_parallel<C>(
    combiner: &C,
    items: impl IntoParallelIterator<Item = C::Item>,
) -> C::Output
where
    C: Combiner,
{
    let acc = items
        .into_par_iter()
        .fold(
            || combiner.identity(),
            |mut acc, item| {
                combiner.observe(&mut acc, item);
                acc
            },
        )
        .reduce(|| combiner.identity(), |a, b| combiner.combine(a, b));
    combiner.finalize(acc)
}

/// Reduce `items` with `combiner` as one sequential fold.
///
/// Produces output equivalent to [`reduce_parallel`] for any input; the only
/// difference is the shape of the combine tree.
pub fn reduce_sequential<C>(combiner: &C, items: impl IntoIterator<Item = C::Item>) -> C::Output
where
    C: Combiner,
{
    let mut acc = combiner.identity();
    for item in items {
        combiner.observe(&mut acc, item);
    }
    combiner.finalize(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observer::{NoopObserver, StageTimingObserver};
    use crate::types::NGram;

    fn pipeline(n: usize, top: usize) -> NGramPipeline {
        NGramPipeline::new(PipelineConfig::new(n, top).expect("valid config"))
    }

    #[test]
    fn test_bigram_scenario() {
        let lines = vec!["a b a b"];
        let output = pipeline(2, 10).run(&lines, &mut NoopObserver);
        assert_eq!(output, ["a\tb\t2", "b\ta\t1"]);
    }

    #[test]
    fn test_unigram_scenario() {
        let lines = vec!["the the the"];
        let output = pipeline(1, 5).run(&lines, &mut NoopObserver);
        assert_eq!(output, ["the\t3"]);
    }

    #[test]
    fn test_window_larger_than_line_yields_empty_output() {
        let lines = vec!["x y"];
        let output = pipeline(3, 10).run(&lines, &mut NoopObserver);
        assert!(output.is_empty());
    }

    #[test]
    fn test_empty_corpus_yields_empty_output() {
        let lines: Vec<&str> = Vec::new();
        let output = pipeline(2, 10).run(&lines, &mut NoopObserver);
        assert!(output.is_empty());
    }

    #[test]
    fn test_tie_at_k_keeps_one_entry_with_correct_count() {
        let lines = vec!["a b", "b a"];
        let top = pipeline(2, 1).run_entries(&lines, &mut NoopObserver);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 1);
        let kept = top[0].ngram.as_str();
        assert!(kept == "a\tb" || kept == "b\ta");
    }

    #[test]
    fn test_ngrams_never_cross_line_boundaries() {
        let lines = vec!["a b", "c d"];
        let tally = pipeline(2, 10).tally(&lines);
        assert_eq!(tally.count("b\tc"), 0);
        assert_eq!(tally.count("a\tb"), 1);
        assert_eq!(tally.count("c\td"), 1);
    }

    #[test]
    fn test_total_occurrences_match_window_arithmetic() {
        let lines = vec!["one two three four", "five six", "seven"];
        let n = 2;
        let expected: u64 = lines
            .iter()
            .map(|l| (l.split_whitespace().count() + 1).saturating_sub(n) as u64)
            .sum();

        let pipeline = pipeline(n, 100);
        let tally = pipeline.tally(&lines);
        assert_eq!(tally.total(), expected);
        assert_eq!(pipeline.ngrams_emitted(), expected);
    }

    #[test]
    fn test_observer_sees_three_stages_in_order() {
        let lines = vec!["a b c"];
        let mut obs = StageTimingObserver::new();
        pipeline(2, 10).run(&lines, &mut obs);

        let stages: Vec<&str> = obs.reports().iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, vec![STAGE_COUNT, STAGE_TOP_K, STAGE_FORMAT]);
    }

    #[test]
    fn test_observer_receives_count_metrics() {
        let lines = vec!["a b a b"];
        let mut obs = StageTimingObserver::new();
        pipeline(2, 10).run(&lines, &mut obs);

        let (_, count_report) = &obs.reports()[0];
        assert_eq!(count_report.items(), Some(3));
        assert_eq!(count_report.distinct(), Some(2));
    }

    /// Observer that captures artifact snapshots.
    #[derive(Default)]
    struct ArtifactObserver {
        distinct_seen: Option<usize>,
        top_k_len: Option<usize>,
    }

    impl PipelineObserver for ArtifactObserver {
        fn on_counts(&mut self, tally: &NGramTally) {
            self.distinct_seen = Some(tally.distinct());
        }

        fn on_top_k(&mut self, entries: &[CountEntry]) {
            self.top_k_len = Some(entries.len());
        }
    }

    #[test]
    fn test_observer_receives_artifacts() {
        let lines = vec!["a b a b"];
        let mut obs = ArtifactObserver::default();
        pipeline(2, 1).run(&lines, &mut obs);

        assert_eq!(obs.distinct_seen, Some(2));
        assert_eq!(obs.top_k_len, Some(1));
    }

    #[test]
    fn test_parallel_and_sequential_reductions_agree() {
        let combiner = CountCombiner;
        let items: Vec<NGram> = ["a", "b", "a", "c", "a"]
            .iter()
            .map(|&s| NGram::from(s))
            .collect();

        let parallel = reduce_parallel(&combiner, items.clone());
        let sequential = reduce_sequential(&combiner, items);

        assert_eq!(parallel.count("a"), sequential.count("a"));
        assert_eq!(parallel.count("b"), sequential.count("b"));
        assert_eq!(parallel.distinct(), sequential.distinct());
    }

    #[test]
    fn test_config_rejects_zero_n() {
        assert!(PipelineConfig::new(0, 10).is_err());
    }

    #[test]
    fn test_default_config_is_bigrams_top_100() {
        let config = PipelineConfig::default();
        assert_eq!(config.n.get(), 2);
        assert_eq!(config.top, 100);
        assert_eq!(config.tie_break, TieBreak::Arbitrary);
    }

    #[test]
    fn test_deterministic_output_with_lexicographic_ties() {
        let config = PipelineConfig::new(1, 2)
            .expect("valid config")
            .with_tie_break(TieBreak::Lexicographic);
        let lines = vec!["pear apple quince"];

        let output = NGramPipeline::new(config).run(&lines, &mut NoopObserver);
        assert_eq!(output, ["apple\t1", "pear\t1"]);
    }
}
