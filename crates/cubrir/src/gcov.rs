//! Typed model of the gcov `--json-format` output.
//!
//! One document is produced per block-graph file. The same source line can
//! appear in many documents (and many times within one); a line counts as
//! unexecuted only if every observation agrees and no observation carries a
//! nonzero count.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Per-file unexecuted flags, ascending by line number
pub type LineFlags = BTreeMap<u32, bool>;

/// One gcov JSON document
#[derive(Debug, Clone, Deserialize)]
pub struct GcovDocument {
    /// Per-source-file line records
    #[serde(default)]
    pub files: Vec<GcovFile>,
}

/// Line records for one source file
#[derive(Debug, Clone, Deserialize)]
pub struct GcovFile {
    /// Source file path as reported by gcov
    pub file: String,
    /// Per-line execution records
    #[serde(default)]
    pub lines: Vec<GcovLine>,
}

/// One line record
#[derive(Debug, Clone, Deserialize)]
pub struct GcovLine {
    /// 1-indexed source line
    pub line_number: u32,
    /// Execution count
    #[serde(default)]
    pub count: u64,
    /// Whether the line's block was never executed
    pub unexecuted_block: bool,
}

impl GcovDocument {
    /// Decode one gcov JSON document
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error; callers treat it as a per-unit
    /// recoverable condition.
    pub fn from_json(buf: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(buf)
    }

    /// Fold this document into an accumulated per-file mapping.
    ///
    /// A nonzero count forces the line executed regardless of the reported
    /// flag; across observations the unexecuted flag is AND-combined, so a
    /// single executed observation wins permanently.
    pub fn fold_into(&self, acc: &mut HashMap<PathBuf, LineFlags>) {
        for file in &self.files {
            let lines = acc.entry(PathBuf::from(&file.file)).or_default();
            for line in &file.lines {
                let unexecuted = line.unexecuted_block && line.count == 0;
                lines
                    .entry(line.line_number)
                    .and_modify(|flag| *flag = *flag && unexecuted)
                    .or_insert(unexecuted);
            }
        }
    }
}

/// Combine two partial per-file mappings, AND-combining unexecuted flags
#[must_use]
pub fn merge_file_maps(
    mut left: HashMap<PathBuf, LineFlags>,
    right: HashMap<PathBuf, LineFlags>,
) -> HashMap<PathBuf, LineFlags> {
    for (file, lines) in right {
        let target = left.entry(file).or_default();
        for (line, unexecuted) in lines {
            target
                .entry(line)
                .and_modify(|flag| *flag = *flag && unexecuted)
                .or_insert(unexecuted);
        }
    }
    left
}
