//! Build-time helper for regenerating a field mapping from Go sources.
//!
//! Wraps [`fieldmap::MappingGenerator`] and tells Cargo to rerun the build
//! script whenever a scanned file or directory changes.
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     fieldmap_build::generate_mapping()
//!         .scan_dir("../api/graph/model")
//!         .output_file("src/generated/field_mapping.rs")
//!         .run()
//!         .expect("Failed to generate field mapping");
//! }
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use fieldmap::{GenerationReport, MappingGenerator, OutputFormat};

/// Create a new mapping build with default settings.
///
/// # Example
///
/// ```ignore
/// fieldmap_build::generate_mapping()
///     .pattern("../api/graph/model/*.go")
///     .output_file("src/generated/field_mapping.rs")
///     .run()
///     .expect("Failed to generate field mapping");
/// ```
pub fn generate_mapping() -> MappingBuild {
    MappingBuild::new()
}

/// Builder mirroring [`MappingGenerator`] for use from `build.rs`.
#[derive(Debug, Clone, Default)]
pub struct MappingBuild {
    generator: MappingGenerator,
}

impl MappingBuild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.generator = self.generator.pattern(pattern);
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.generator = self.generator.file(path);
        self
    }

    pub fn file_list(mut self, list: &str) -> Self {
        self.generator = self.generator.file_list(list);
        self
    }

    /// Add a directory to scan. Cargo also watches the directory itself so
    /// that added files trigger a rebuild.
    pub fn scan_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.generator = self.generator.scan_dir(path);
        self
    }

    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.generator = self.generator.output_file(path);
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.generator = self.generator.format(format);
        self
    }

    pub fn package(mut self, name: impl Into<String>) -> Self {
        self.generator = self.generator.package(name);
        self
    }

    pub fn var_name(mut self, name: impl Into<String>) -> Self {
        self.generator = self.generator.var_name(name);
        self
    }

    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.generator = self.generator.tag_key(key);
        self
    }

    pub fn strip_options(mut self, strip: bool) -> Self {
        self.generator = self.generator.strip_options(strip);
        self
    }

    /// Generate the mapping and print `cargo:rerun-if-changed` directives.
    pub fn run(self) -> Result<GenerationReport> {
        let dirs = self.generator.sources().dirs.clone();
        let report = self.generator.run().context("Failed to generate field mapping")?;

        for directive in rerun_directives(&dirs, &report) {
            println!("{directive}");
        }
        log::debug!("{} watched paths", dirs.len() + report.files.len());

        Ok(report)
    }
}

/// The `cargo:rerun-if-changed` lines for a finished run: scan directories first, then every input file.
pub fn rerun_directives(dirs: &[PathBuf], report: &GenerationReport) -> Vec<String> {
    dirs.iter()
        .chain(&report.files)
        .map(|path| format!("cargo:rerun-if-changed={}", path.display()))
        .collect()
}
