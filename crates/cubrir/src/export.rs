//! Typed model of the `llvm-cov export` JSON document.
//!
//! Only the pieces the merge engine consumes are modelled: per-file segment
//! lists and per-function region lists with their owning filenames. Every
//! other field (summaries, branches, expansions) is ignored on decode.

use serde::{Deserialize, Serialize};

/// One export document, produced per candidate executable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Export datasets (llvm-cov emits one)
    #[serde(default)]
    pub data: Vec<ExportDataset>,
}

/// One dataset inside an export document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportDataset {
    /// Per-file coverage records
    #[serde(default)]
    pub files: Vec<FileRecord>,
    /// Per-function coverage records
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
}

/// Coverage record for one source file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileRecord {
    /// Source file path as reported by the export tool
    pub filename: String,
    /// Coverage-state transition markers
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Coverage record for one function
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Mangled function name
    #[serde(default)]
    pub name: String,
    /// Function-scoped line ranges with execution counts
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Files this function belongs to
    #[serde(default)]
    pub filenames: Vec<String>,
}

/// A segment marker: `[line, col, count, hasCount, isRegionEntry, isGapRegion]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment(pub u32, pub u32, pub u64, pub bool, pub bool, pub bool);

impl Segment {
    /// Line the transition occurs on
    #[must_use]
    pub fn line(&self) -> u32 {
        self.0
    }

    /// Execution count at the transition
    #[must_use]
    pub fn count(&self) -> u64 {
        self.2
    }

    /// Whether the segment carries a real count
    #[must_use]
    pub fn has_count(&self) -> bool {
        self.3
    }

    /// Whether the segment starts a region
    #[must_use]
    pub fn is_region_entry(&self) -> bool {
        self.4
    }

    /// Whether the segment covers a gap (whitespace between statements)
    #[must_use]
    pub fn is_gap_region(&self) -> bool {
        self.5
    }

    /// A segment contributes a verdict only when it marks a genuine,
    /// non-gap, count-bearing region start.
    #[must_use]
    pub fn qualifies(&self) -> bool {
        self.has_count() && self.is_region_entry() && !self.is_gap_region()
    }
}

/// A function region:
/// `[startLine, startCol, endLine, endCol, count, fileId, expandedFileId, kind]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region(
    pub u32,
    pub u32,
    pub u32,
    pub u32,
    pub u64,
    pub u32,
    pub u32,
    pub u32,
);

impl Region {
    /// Build a region from the fields the merge law consults
    #[must_use]
    pub fn new(start_line: u32, end_line: u32, count: u64, kind: u32) -> Self {
        Self(start_line, 1, end_line, 1, count, 0, 0, kind)
    }

    /// First line of the region (inclusive)
    #[must_use]
    pub fn start_line(&self) -> u32 {
        self.0
    }

    /// Past-the-end line of the region (exclusive)
    #[must_use]
    pub fn end_line(&self) -> u32 {
        self.2
    }

    /// Execution count
    #[must_use]
    pub fn count(&self) -> u64 {
        self.4
    }

    /// Region kind tag
    #[must_use]
    pub fn kind(&self) -> u32 {
        self.7
    }
}

impl ExportDocument {
    /// Decode one export document
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error; callers treat it as a per-unit
    /// recoverable condition, since unrelated executables produce no valid
    /// export output.
    pub fn from_json(buf: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(buf)
    }
}
