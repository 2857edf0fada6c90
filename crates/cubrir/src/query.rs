//! Query resolution: target validation and format dispatch.
//!
//! The coverage format is decided exactly once, from the requested file's
//! suffix, before any discovery or subprocess work happens.

use crate::error::{CubrirError, CubrirResult};
use std::path::{Path, PathBuf};

/// Coverage data format backing a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageFormat {
    /// Compiler-emitted block-coverage graphs (`.gcno`)
    BlockGraph,
    /// Instrumentation profiles (`.profraw` fragments + export documents)
    InstrProfile,
}

impl CoverageFormat {
    /// Classify a source path by suffix. Rust sources take the
    /// instrumentation-profile path; every other source goes through the
    /// block-graph path.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(std::ffi::OsStr::to_str) {
            Some("rs") => Self::InstrProfile,
            _ => Self::BlockGraph,
        }
    }
}

/// A validated coverage query for one source file
#[derive(Debug, Clone)]
pub struct CoverageQuery {
    path: PathBuf,
    format: CoverageFormat,
}

impl CoverageQuery {
    /// Validate the target path and resolve its coverage format
    ///
    /// # Errors
    ///
    /// Returns [`CubrirError::FileNotFound`] if the path is not an existing
    /// regular file.
    pub fn resolve(path: impl Into<PathBuf>) -> CubrirResult<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(CubrirError::file_not_found(path));
        }
        let format = CoverageFormat::for_path(&path);
        Ok(Self { path, format })
    }

    /// The requested source file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The resolved coverage format
    #[must_use]
    pub fn format(&self) -> CoverageFormat {
        self.format
    }
}
