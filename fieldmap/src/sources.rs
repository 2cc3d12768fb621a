//! Resolution of input selectors into an ordered list of files.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::errors::{FieldMapError, Result};

/// The ways input files can be selected.
///
/// Files are resolved in a fixed order: glob matches (lexical order), then
/// the explicit list (as given), then directory scans (sorted by path).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSources {
    pub pattern: Option<String>,
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

impl InputSources {
    pub fn is_empty(&self) -> bool {
        self.pattern.as_deref().is_none_or(str::is_empty) && self.files.is_empty() && self.dirs.is_empty()
    }

    /// Expand every selector into concrete paths.
    ///
    /// Fails with [`FieldMapError::MissingInput`] when nothing is selected.
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        if self.is_empty() {
            return Err(FieldMapError::MissingInput);
        }

        let mut paths = Vec::new();
        if let Some(pattern) = self.pattern.as_deref().filter(|p| !p.is_empty()) {
            paths.extend(glob_files(pattern)?);
        }
        paths.extend(self.files.iter().cloned());
        for dir in &self.dirs {
            paths.extend(scan_dir(dir)?);
        }

        debug!("resolved {} input files", paths.len());
        Ok(paths)
    }
}

/// Split a comma-separated path list, trimming whitespace and dropping empty entries.
pub fn parse_file_list(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Files matching a glob pattern, in lexical order.
fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|source| FieldMapError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_dir() => debug!("skipping directory match {}", path.display()),
            Ok(path) => files.push(path),
            // Unreadable directories are skipped, matching filesystem glob conventions.
            Err(err) => warn!("skipping unreadable path {}: {}", err.path().display(), err.error()),
        }
    }
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "vendor" || name == "testdata"
}

fn is_go_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
        && !path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with("_test.go"))
}

/// Go source files below `dir`, excluding tests, hidden entries, `vendor` and `testdata`.
fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry.map_err(|err| FieldMapError::Resolve {
            message: format!("failed to scan {}: {err}", dir.display()),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && is_go_source(path) && !entry.file_name().to_string_lossy().starts_with('.')
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
