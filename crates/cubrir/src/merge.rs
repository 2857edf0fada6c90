//! The coverage merge engine.
//!
//! Reduces many independent signals about the same line into one boolean
//! verdict. The accumulated state is monotonic: a verdict only ever flips
//! false→true, so one nonzero-count contribution from any source covers a
//! line permanently for the query, and the final state is independent of
//! the order signals are applied.

use crate::export::ExportDocument;
use std::collections::BTreeMap;
use std::path::Path;

/// Accumulated per-line verdicts for one query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCoverageState {
    lines: BTreeMap<u32, bool>,
}

impl LineCoverageState {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// OR-combine one signal into the accumulator
    pub fn mark(&mut self, line: u32, executed: bool) {
        let verdict = self.lines.entry(line).or_insert(false);
        *verdict = *verdict || executed;
    }

    /// Fold one export document's qualifying signals for `target`.
    ///
    /// Segment channel: a segment contributes only when it marks a genuine,
    /// non-gap, count-bearing region start, and then asserts
    /// `count != 0` for its exact line. Region channel: a function region
    /// contributes only when `target` is among the function's filenames,
    /// and then asserts `count != 0` for every line in
    /// `[start_line, end_line)`. Neither channel takes precedence; both
    /// land in the same OR-reduce.
    pub fn absorb_document(&mut self, doc: &ExportDocument, target: &Path) {
        for dataset in &doc.data {
            for file in &dataset.files {
                if Path::new(&file.filename) != target {
                    continue;
                }
                for segment in &file.segments {
                    if segment.qualifies() {
                        self.mark(segment.line(), segment.count() != 0);
                    }
                }
            }
            for function in &dataset.functions {
                if !function.filenames.iter().any(|f| Path::new(f) == target) {
                    continue;
                }
                for region in &function.regions {
                    for line in region.start_line()..region.end_line() {
                        self.mark(line, region.count() != 0);
                    }
                }
            }
        }
    }

    /// Combine two partial accumulators; the reduce step of the
    /// isolated-partials pattern
    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        for (line, executed) in other.lines {
            self.mark(line, executed);
        }
        self
    }

    /// Whether no signal touched any line
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of touched lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Verdict for one line, if any signal touched it
    #[must_use]
    pub fn verdict(&self, line: u32) -> Option<bool> {
        self.lines.get(&line).copied()
    }

    /// Iterate touched lines in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        self.lines.iter().map(|(&line, &executed)| (line, executed))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::export::{ExportDataset, FileRecord, FunctionRecord, Region, Segment};

    fn doc_with_region(file: &str, start: u32, end: u32, count: u64) -> ExportDocument {
        ExportDocument {
            data: vec![ExportDataset {
                files: Vec::new(),
                functions: vec![FunctionRecord {
                    name: "f".to_string(),
                    regions: vec![Region::new(start, end, count, 0)],
                    filenames: vec![file.to_string()],
                }],
            }],
        }
    }

    fn doc_with_segments(file: &str, segments: Vec<Segment>) -> ExportDocument {
        ExportDocument {
            data: vec![ExportDataset {
                files: vec![FileRecord {
                    filename: file.to_string(),
                    segments,
                }],
                functions: Vec::new(),
            }],
        }
    }

    mod mark_tests {
        use super::*;

        #[test]
        fn test_mark_is_monotonic() {
            let mut state = LineCoverageState::new();
            state.mark(10, true);
            state.mark(10, false);
            assert_eq!(state.verdict(10), Some(true));
        }

        #[test]
        fn test_zero_only_contributions_stay_uncovered() {
            let mut state = LineCoverageState::new();
            state.mark(10, false);
            state.mark(10, false);
            assert_eq!(state.verdict(10), Some(false));
        }

        #[test]
        fn test_untouched_line_has_no_verdict() {
            let state = LineCoverageState::new();
            assert_eq!(state.verdict(1), None);
            assert!(state.is_empty());
        }
    }

    mod segment_channel_tests {
        use super::*;

        #[test]
        fn test_qualifying_segment_asserts_verdict() {
            let mut state = LineCoverageState::new();
            let doc = doc_with_segments("a.rs", vec![Segment(10, 1, 5, true, true, false)]);
            state.absorb_document(&doc, Path::new("a.rs"));
            assert_eq!(state.verdict(10), Some(true));
        }

        #[test]
        fn test_segment_without_count_contributes_nothing() {
            let mut state = LineCoverageState::new();
            let doc = doc_with_segments("a.rs", vec![Segment(10, 1, 5, false, true, false)]);
            state.absorb_document(&doc, Path::new("a.rs"));
            assert_eq!(state.verdict(10), None);
        }

        #[test]
        fn test_gap_segment_contributes_nothing() {
            let mut state = LineCoverageState::new();
            let doc = doc_with_segments("a.rs", vec![Segment(10, 1, 5, true, true, true)]);
            state.absorb_document(&doc, Path::new("a.rs"));
            assert!(state.is_empty());
        }

        #[test]
        fn test_zero_count_segment_asserts_uncovered() {
            let mut state = LineCoverageState::new();
            let doc = doc_with_segments("a.rs", vec![Segment(10, 1, 0, true, true, false)]);
            state.absorb_document(&doc, Path::new("a.rs"));
            assert_eq!(state.verdict(10), Some(false));
        }

        #[test]
        fn test_other_files_segments_are_ignored() {
            let mut state = LineCoverageState::new();
            let doc = doc_with_segments("b.rs", vec![Segment(10, 1, 5, true, true, false)]);
            state.absorb_document(&doc, Path::new("a.rs"));
            assert!(state.is_empty());
        }
    }

    mod region_channel_tests {
        use super::*;

        #[test]
        fn test_region_expands_half_open_interval() {
            let mut state = LineCoverageState::new();
            state.absorb_document(&doc_with_region("a.rs", 4, 7, 2), Path::new("a.rs"));
            assert_eq!(state.verdict(4), Some(true));
            assert_eq!(state.verdict(5), Some(true));
            assert_eq!(state.verdict(6), Some(true));
            assert_eq!(state.verdict(7), None);
        }

        #[test]
        fn test_zero_count_region_leaves_lines_uncovered() {
            let mut state = LineCoverageState::new();
            state.absorb_document(&doc_with_region("a.rs", 4, 7, 0), Path::new("a.rs"));
            assert_eq!(state.verdict(4), Some(false));
            assert_eq!(state.verdict(6), Some(false));
        }

        #[test]
        fn test_foreign_function_regions_are_ignored() {
            let mut state = LineCoverageState::new();
            state.absorb_document(&doc_with_region("other.rs", 4, 7, 2), Path::new("a.rs"));
            assert!(state.is_empty());
        }
    }

    mod merge_law_tests {
        use super::*;

        #[test]
        fn test_two_documents_or_combine() {
            // executable A saw the region run; executable B did not
            let mut state = LineCoverageState::new();
            state.absorb_document(&doc_with_region("a.rs", 4, 7, 1), Path::new("a.rs"));
            state.absorb_document(&doc_with_region("a.rs", 4, 7, 0), Path::new("a.rs"));
            for line in 4..7 {
                assert_eq!(state.verdict(line), Some(true), "line {line}");
            }
        }

        #[test]
        fn test_document_order_is_irrelevant() {
            let covered = doc_with_region("a.rs", 4, 7, 1);
            let uncovered = doc_with_region("a.rs", 4, 7, 0);

            let mut ab = LineCoverageState::new();
            ab.absorb_document(&covered, Path::new("a.rs"));
            ab.absorb_document(&uncovered, Path::new("a.rs"));

            let mut ba = LineCoverageState::new();
            ba.absorb_document(&uncovered, Path::new("a.rs"));
            ba.absorb_document(&covered, Path::new("a.rs"));

            assert_eq!(ab, ba);
        }

        #[test]
        fn test_channels_have_no_precedence() {
            // zero-count segment plus nonzero region on the same line
            let mut state = LineCoverageState::new();
            let doc = ExportDocument {
                data: vec![ExportDataset {
                    files: vec![FileRecord {
                        filename: "a.rs".to_string(),
                        segments: vec![Segment(5, 1, 0, true, true, false)],
                    }],
                    functions: vec![FunctionRecord {
                        name: "f".to_string(),
                        regions: vec![Region::new(5, 6, 3, 0)],
                        filenames: vec!["a.rs".to_string()],
                    }],
                }],
            };
            state.absorb_document(&doc, Path::new("a.rs"));
            assert_eq!(state.verdict(5), Some(true));
        }

        #[test]
        fn test_union_combines_partials() {
            let mut a = LineCoverageState::new();
            a.mark(1, true);
            a.mark(2, false);
            let mut b = LineCoverageState::new();
            b.mark(2, true);
            b.mark(3, false);

            let merged = a.union(b);
            assert_eq!(merged.verdict(1), Some(true));
            assert_eq!(merged.verdict(2), Some(true));
            assert_eq!(merged.verdict(3), Some(false));
            assert_eq!(merged.len(), 3);
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn apply(signals: &[(u32, bool)]) -> LineCoverageState {
            let mut state = LineCoverageState::new();
            for &(line, executed) in signals {
                state.mark(line, executed);
            }
            state
        }

        proptest! {
            /// Applying signals in any order yields the same final state
            #[test]
            fn prop_merge_commutative(
                signals in proptest::collection::vec((1u32..100, any::<bool>()), 0..64)
            ) {
                let forward = apply(&signals);
                let reversed: Vec<_> = signals.iter().rev().copied().collect();
                let mut sorted = signals.clone();
                sorted.sort_unstable();
                prop_assert_eq!(&forward, &apply(&reversed));
                prop_assert_eq!(&forward, &apply(&sorted));
            }

            /// Partitioning signals into partial maps and OR-reducing them
            /// yields the same state as applying them all in one pass
            #[test]
            fn prop_merge_associative(
                signals in proptest::collection::vec((1u32..100, any::<bool>()), 0..64),
                split in 0usize..64
            ) {
                let split = split.min(signals.len());
                let (left, right) = signals.split_at(split);
                let reduced = apply(left).union(apply(right));
                prop_assert_eq!(reduced, apply(&signals));
            }

            /// The verdict is monotonic: once covered, always covered
            #[test]
            fn prop_merge_monotonic(
                signals in proptest::collection::vec((1u32..100, any::<bool>()), 1..64),
                extra in proptest::collection::vec((1u32..100, any::<bool>()), 0..16)
            ) {
                let base = apply(&signals);
                let mut extended = base.clone();
                for &(line, executed) in &extra {
                    extended.mark(line, executed);
                }
                for (line, executed) in base.iter() {
                    if executed {
                        prop_assert_eq!(extended.verdict(line), Some(true));
                    }
                }
            }
        }
    }
}
