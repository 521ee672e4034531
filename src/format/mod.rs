//! Output rendering.
//!
//! One output line per entry: `ngram<TAB>count`. The formatter preserves the
//! order delivered by the selector (descending by count, tie order inherited)
//! and performs no filtering, sorting, or validation beyond text rendering.

use crate::pipeline::traits::MapStage;
use crate::types::CountEntry;

/// Renders count entries as tab-separated text lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabSeparatedFormatter;

impl TabSeparatedFormatter {
    /// Render one entry.
    pub fn line(&self, entry: &CountEntry) -> String {
        format!("{}\t{}", entry.ngram, entry.count)
    }

    /// Render a list of entries, one line per entry, order preserved.
    pub fn lines(&self, entries: &[CountEntry]) -> Vec<String> {
        entries.iter().map(|entry| self.line(entry)).collect()
    }
}

impl MapStage for TabSeparatedFormatter {
    type In = CountEntry;
    type Out = String;

    fn process(&self, input: &CountEntry, emit: &mut dyn FnMut(String)) {
        emit(self.line(input));
    }
}
