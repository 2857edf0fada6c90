//! Filesystem discovery of coverage artifacts.
//!
//! Block-graph files and raw profile fragments are matched by suffix
//! anywhere under the search root; candidate executables are regular,
//! executable files directly inside the build-artifacts directory.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Recursively find all block-graph (`.gcno`) files under `root`.
///
/// An empty result is valid input for the block collector, not an error.
#[must_use]
pub fn block_graphs(root: &Path) -> Vec<PathBuf> {
    files_with_extension(root, "gcno")
}

/// Recursively find all raw profile fragments (`.profraw`) under `root`.
#[must_use]
pub fn profile_fragments(root: &Path) -> Vec<PathBuf> {
    files_with_extension(root, "profraw")
}

fn files_with_extension(root: &Path, ext: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|x| x == ext)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    // Deterministic order keeps tool invocations reproducible across runs
    found.sort();
    debug!(count = found.len(), ext, root = %root.display(), "artifact discovery");
    found
}

/// Enumerate candidate executables: regular, executable files directly
/// inside `artifacts_dir` (non-recursive). Unrelated non-coverage binaries
/// are expected here; filtering their output is the export step's job.
pub fn candidate_executables(artifacts_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(artifacts_dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        if metadata.is_file() && is_executable(&metadata) {
            found.push(path);
        }
    }
    found.sort();
    debug!(count = found.len(), dir = %artifacts_dir.display(), "candidate executables");
    Ok(found)
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}
