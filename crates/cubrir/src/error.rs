//! Result and error types for Cubrir.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for coverage operations
pub type CubrirResult<T> = Result<T, CubrirError>;

/// Errors that can occur while collecting coverage
#[derive(Debug, Error)]
pub enum CubrirError {
    /// The requested source file does not exist
    #[error("File {path} not found")]
    FileNotFound {
        /// Path that was queried
        path: PathBuf,
    },

    /// The build-artifacts directory does not exist
    #[error("Build artifacts directory {dir} not found")]
    NoBuildArtifacts {
        /// Directory that was expected
        dir: PathBuf,
    },

    /// No collected signal mentions the requested file
    #[error("Coverage data for file {path} not found")]
    CoverageDataMissing {
        /// Path that was queried
        path: PathBuf,
    },

    /// The profile merge tool exited with a nonzero status
    #[error("Profile merge failed: {diagnostics}")]
    MergeFailed {
        /// Captured diagnostic output of the merge tool
        diagnostics: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CubrirError {
    /// Create a `FileNotFound` error
    #[must_use]
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a `NoBuildArtifacts` error
    #[must_use]
    pub fn no_build_artifacts(dir: impl Into<PathBuf>) -> Self {
        Self::NoBuildArtifacts { dir: dir.into() }
    }

    /// Create a `CoverageDataMissing` error
    #[must_use]
    pub fn coverage_data_missing(path: impl Into<PathBuf>) -> Self {
        Self::CoverageDataMissing { path: path.into() }
    }

    /// Create a `MergeFailed` error
    #[must_use]
    pub fn merge_failed(diagnostics: impl Into<String>) -> Self {
        Self::MergeFailed {
            diagnostics: diagnostics.into(),
        }
    }
}
