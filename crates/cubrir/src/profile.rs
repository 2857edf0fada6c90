//! Instrumentation-profile collection.
//!
//! Raw fragments are consolidated once by the external merge tool, then
//! each candidate executable is exported independently. Every worker folds
//! its documents into an isolated partial accumulator and a single
//! OR-reduce combines the partials, so the outcome is independent of the
//! order executables are processed.

use crate::config::CoverageConfig;
use crate::discovery;
use crate::error::{CubrirError, CubrirResult};
use crate::export::ExportDocument;
use crate::merge::LineCoverageState;
use crate::query::CoverageQuery;
use crate::report::CoverageReport;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Collect instrumentation-profile coverage for one query
///
/// # Errors
///
/// [`CubrirError::NoBuildArtifacts`] if the artifacts directory is absent,
/// [`CubrirError::MergeFailed`] if the merge tool exits nonzero, and
/// [`CubrirError::CoverageDataMissing`] when no decoded document mentions
/// the requested file.
pub fn collect(query: &CoverageQuery, config: &CoverageConfig) -> CubrirResult<CoverageReport> {
    let artifacts_dir = config.artifacts_dir();
    if !artifacts_dir.is_dir() {
        return Err(CubrirError::no_build_artifacts(artifacts_dir));
    }

    let fragments = discovery::profile_fragments(config.search_root());

    // Scoped consolidated-profile location; the directory is removed on
    // every exit path when `scratch` drops.
    let scratch = tempfile::tempdir()?;
    let consolidated = scratch.path().join("consolidated.profdata");
    merge_fragments(config.merge_tool(), &fragments, &consolidated)?;

    let executables = discovery::candidate_executables(&artifacts_dir)?;
    debug!(
        executables = executables.len(),
        workers = config.workers(),
        "exporting per-executable documents"
    );

    let target = query.path();
    let pool = crate::pool::build(config.workers())?;
    let state = pool.install(|| {
        executables
            .par_iter()
            .filter_map(|exe| export_document(config.export_tool(), exe, &consolidated, target))
            .fold(LineCoverageState::new, |mut acc, doc| {
                acc.absorb_document(&doc, target);
                acc
            })
            .reduce(LineCoverageState::new, LineCoverageState::union)
    });

    if state.is_empty() {
        return Err(CubrirError::coverage_data_missing(target));
    }
    Ok(CoverageReport::from_state(&state))
}

/// Consolidate raw fragments into one profile database
fn merge_fragments(tool: &str, fragments: &[PathBuf], out: &Path) -> CubrirResult<()> {
    debug!(fragments = fragments.len(), tool, "consolidating raw profiles");
    let mut cmd = Command::new(tool);
    cmd.arg("merge").arg("-sparse");
    for fragment in fragments {
        cmd.arg(fragment);
    }
    cmd.arg("-o").arg(out);

    let output = cmd.output()?;
    if !output.status.success() {
        let diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(CubrirError::merge_failed(diagnostics));
    }
    Ok(())
}

/// Obtain one executable's export document, scoped to the requested file.
/// Any failure excludes the unit's contribution but never fails the query;
/// unrelated non-coverage executables are expected in the artifacts
/// directory.
fn export_document(
    tool: &str,
    executable: &Path,
    consolidated: &Path,
    target: &Path,
) -> Option<ExportDocument> {
    let output = Command::new(tool)
        .arg("export")
        .arg(executable)
        .arg("-instr-profile")
        .arg(consolidated)
        .arg("-format=text")
        .arg(target)
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => {
            warn!(executable = %executable.display(), %err, "failed to spawn export tool; skipping executable");
            return None;
        }
    };
    if !output.status.success() {
        warn!(
            executable = %executable.display(),
            status = %output.status,
            "export tool exited nonzero; skipping executable"
        );
        return None;
    }
    let buf = String::from_utf8_lossy(&output.stdout);
    match ExportDocument::from_json(&buf) {
        Ok(doc) => Some(doc),
        Err(err) => {
            warn!(executable = %executable.display(), %err, "undecodable export output; skipping executable");
            None
        }
    }
}
