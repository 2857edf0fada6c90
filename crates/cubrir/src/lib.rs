//! Cubrir: per-line test-coverage aggregation for one source file.
//!
//! Cubrir (Spanish: "to cover") answers one question: which lines of a
//! requested source file were exercised during test execution, and which
//! were not. Signals may come from many independently compiled artifacts
//! and from two coverage data formats — gcov block-coverage graphs and
//! LLVM instrumentation profiles — and are reconciled into one canonical
//! per-line verdict by an order-independent, monotonic OR-merge.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      CUBRIR Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  Query ──► Dispatcher ──► { Block Collector │ Profile Collector }│
//! │                                   │                  │           │
//! │                             gcov engine        profdata merge    │
//! │                                   │            llvm-cov export   │
//! │                                   ▼                  ▼           │
//! │                            Merge Engine (per-line OR-reduce)     │
//! │                                   ▼                              │
//! │                      covered / uncovered partition               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use cubrir::{line_coverage, CoverageConfig};
//!
//! let report = line_coverage("src/main.c")?;
//! println!("covered: {:?}", report.covered);
//! println!("uncovered: {:?}", report.uncovered);
//!
//! let config = CoverageConfig::new().with_workers(4);
//! let report = cubrir::line_coverage_with(&config, "src/lib.rs")?;
//! println!("{} lines covered", report.covered_count());
//! # Ok::<(), cubrir::CubrirError>(())
//! ```

#![warn(missing_docs)]

pub mod block;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod gcov;
pub mod merge;
pub mod profile;
pub mod query;
pub mod report;

mod pool;

pub use block::{BlockGraphEngine, GcovEngine, RawBlockRecord};
pub use config::CoverageConfig;
pub use error::{CubrirError, CubrirResult};
pub use export::ExportDocument;
pub use merge::LineCoverageState;
pub use query::{CoverageFormat, CoverageQuery};
pub use report::CoverageReport;

use std::path::Path;

/// Compute the covered/uncovered line partition for one source file using
/// the default configuration
///
/// # Errors
///
/// See [`line_coverage_with`].
pub fn line_coverage(path: impl AsRef<Path>) -> CubrirResult<CoverageReport> {
    line_coverage_with(&CoverageConfig::default(), path)
}

/// Compute the covered/uncovered line partition for one source file.
///
/// The target is validated before any discovery or subprocess work; its
/// suffix selects the collection strategy exactly once. Rust sources go
/// through the instrumentation-profile path, everything else through the
/// block-graph path.
///
/// # Errors
///
/// [`CubrirError::FileNotFound`] when the target does not exist;
/// otherwise the terminal errors of the selected collector
/// ([`CubrirError::NoBuildArtifacts`], [`CubrirError::MergeFailed`],
/// [`CubrirError::CoverageDataMissing`]).
pub fn line_coverage_with(
    config: &CoverageConfig,
    path: impl AsRef<Path>,
) -> CubrirResult<CoverageReport> {
    let query = CoverageQuery::resolve(path.as_ref())?;
    match query.format() {
        CoverageFormat::BlockGraph => {
            let engine = GcovEngine::new(config.gcov_tool());
            block::collect(&query, config, &engine)
        }
        CoverageFormat::InstrProfile => profile::collect(&query, config),
    }
}
