//! Result materialization: splitting accumulated verdicts into the
//! covered/uncovered partition handed back to the caller.

use crate::merge::LineCoverageState;
use serde::Serialize;

/// Final per-file coverage partition
///
/// The two sequences are ascending and disjoint; their union is exactly
/// the set of lines touched by any contributing signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Lines with at least one nonzero-count signal
    pub covered: Vec<u32>,
    /// Touched lines with only zero-count signals
    pub uncovered: Vec<u32>,
}

impl CoverageReport {
    /// Materialize the final accumulator state
    #[must_use]
    pub fn from_state(state: &LineCoverageState) -> Self {
        let mut covered = Vec::new();
        let mut uncovered = Vec::new();
        for (line, executed) in state.iter() {
            if executed {
                covered.push(line);
            } else {
                uncovered.push(line);
            }
        }
        Self { covered, uncovered }
    }

    /// Materialize a decoded block record of (line, unexecuted flag) pairs.
    ///
    /// The block path needs no multi-source merge, but its record goes
    /// through the same split logic as the profile path.
    #[must_use]
    pub fn from_block_record(record: &[(u32, bool)]) -> Self {
        let mut state = LineCoverageState::new();
        for &(line, unexecuted) in record {
            state.mark(line, !unexecuted);
        }
        Self::from_state(&state)
    }

    /// Number of covered lines
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.covered.len()
    }

    /// Number of uncovered lines
    #[must_use]
    pub fn uncovered_count(&self) -> usize {
        self.uncovered.len()
    }

    /// Whether no signal touched the file at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.covered.is_empty() && self.uncovered.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_block_record_split() {
        let record = vec![(1, false), (2, true), (3, false), (4, true)];
        let report = CoverageReport::from_block_record(&record);
        assert_eq!(report.covered, vec![1, 3]);
        assert_eq!(report.uncovered, vec![2, 4]);
    }

    #[test]
    fn test_sequences_are_ascending() {
        let record = vec![(9, false), (2, true), (7, true), (1, false)];
        let report = CoverageReport::from_block_record(&record);
        assert_eq!(report.covered, vec![1, 9]);
        assert_eq!(report.uncovered, vec![2, 7]);
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let mut state = LineCoverageState::new();
        for line in 1..=20 {
            state.mark(line, line % 3 == 0);
        }
        let report = CoverageReport::from_state(&state);

        assert_eq!(report.covered_count() + report.uncovered_count(), state.len());
        for line in report.covered.iter() {
            assert!(!report.uncovered.contains(line));
        }
        let mut all: Vec<u32> = report
            .covered
            .iter()
            .chain(report.uncovered.iter())
            .copied()
            .collect();
        all.sort_unstable();
        let touched: Vec<u32> = state.iter().map(|(line, _)| line).collect();
        assert_eq!(all, touched);
    }

    #[test]
    fn test_empty_state_yields_empty_report() {
        let report = CoverageReport::from_state(&LineCoverageState::new());
        assert!(report.is_empty());
    }

    #[test]
    fn test_serialize_to_json() {
        let report = CoverageReport {
            covered: vec![1, 3],
            uncovered: vec![2],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"covered\":[1,3]"));
        assert!(json.contains("\"uncovered\":[2]"));
    }
}
