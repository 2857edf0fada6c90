//! Block-coverage collection.
//!
//! Graph files are decoded wholesale by a [`BlockGraphEngine`] in one
//! batched call; the engine resolves conflicting block information to one
//! flag per line, so no merge step happens on this path.

use crate::config::CoverageConfig;
use crate::discovery;
use crate::error::{CubrirError, CubrirResult};
use crate::gcov::{self, GcovDocument};
use crate::query::CoverageQuery;
use crate::report::CoverageReport;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Ordered (line number, unexecuted flag) pairs for one source file
pub type RawBlockRecord = Vec<(u32, bool)>;

/// Decode-and-map capability over block-graph files
pub trait BlockGraphEngine {
    /// Decode every graph file and return per-line unexecuted flags keyed
    /// by source file, partitioned internally across `workers` parallel
    /// workers. An empty `graphs` slice is valid input and yields an empty
    /// mapping.
    fn parse_block_graphs(
        &self,
        graphs: &[PathBuf],
        workers: usize,
    ) -> CubrirResult<HashMap<PathBuf, RawBlockRecord>>;
}

/// Production engine shelling out to gcov in JSON mode
#[derive(Debug, Clone)]
pub struct GcovEngine {
    tool: String,
}

impl GcovEngine {
    /// Create an engine invoking the given gcov tool
    #[must_use]
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// Decode one graph file. Any failure here excludes the unit's
    /// contribution but never fails the query.
    fn decode_one(&self, graph: &Path) -> Option<GcovDocument> {
        let output = Command::new(&self.tool)
            .args(["--stdout", "--json-format"])
            .arg(graph)
            .output();
        let output = match output {
            Ok(output) => output,
            Err(err) => {
                warn!(graph = %graph.display(), %err, "failed to spawn gcov; skipping graph");
                return None;
            }
        };
        if !output.status.success() {
            warn!(
                graph = %graph.display(),
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "gcov exited nonzero; skipping graph"
            );
            return None;
        }
        let buf = String::from_utf8_lossy(&output.stdout);
        match GcovDocument::from_json(&buf) {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!(graph = %graph.display(), %err, "undecodable gcov output; skipping graph");
                None
            }
        }
    }
}

impl BlockGraphEngine for GcovEngine {
    fn parse_block_graphs(
        &self,
        graphs: &[PathBuf],
        workers: usize,
    ) -> CubrirResult<HashMap<PathBuf, RawBlockRecord>> {
        if graphs.is_empty() {
            return Ok(HashMap::new());
        }
        debug!(graphs = graphs.len(), workers, "decoding block graphs");
        let pool = crate::pool::build(workers)?;
        let merged = pool.install(|| {
            graphs
                .par_iter()
                .map(|graph| self.decode_one(graph))
                .fold(HashMap::new, |mut acc, doc| {
                    if let Some(doc) = doc {
                        doc.fold_into(&mut acc);
                    }
                    acc
                })
                .reduce(HashMap::new, gcov::merge_file_maps)
        });
        Ok(merged
            .into_iter()
            .map(|(file, lines)| (file, lines.into_iter().collect()))
            .collect())
    }
}

/// Collect block coverage for one query using the given engine
///
/// # Errors
///
/// Returns [`CubrirError::CoverageDataMissing`] when the decoded mapping
/// has no entry for the requested file (including the zero-graphs case).
pub fn collect(
    query: &CoverageQuery,
    config: &CoverageConfig,
    engine: &dyn BlockGraphEngine,
) -> CubrirResult<CoverageReport> {
    let graphs = discovery::block_graphs(config.search_root());
    let files = engine.parse_block_graphs(&graphs, config.workers())?;
    let record = files
        .get(query.path())
        .ok_or_else(|| CubrirError::coverage_data_missing(query.path()))?;
    Ok(CoverageReport::from_block_record(record))
}
