//! End-to-end mapping generation: resolve inputs, extract, render, write.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::extractor::{ExtractOptions, extract_file};
use crate::mapping::FieldMapping;
use crate::render::{OutputFormat, RenderOptions, render};
use crate::sources::{InputSources, parse_file_list};

pub const DEFAULT_OUTPUT: &str = "./generate/mapping/field_and_json_mapping.go";

/// Builder for configuring and running the mapping generator.
#[derive(Debug, Clone)]
pub struct MappingGenerator {
    sources: InputSources,
    output_file: PathBuf,
    format: Option<OutputFormat>,
    render: RenderOptions,
    extract: ExtractOptions,
}

/// A rendered mapping that has not been written anywhere yet.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Input files in the order they were processed.
    pub files: Vec<PathBuf>,
    pub mapping: FieldMapping,
    pub format: OutputFormat,
    pub content: String,
}

/// Outcome of [`MappingGenerator::run`].
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub files: Vec<PathBuf>,
    pub entries: usize,
    pub output_file: PathBuf,
    /// False when the existing file already had identical content.
    pub written: bool,
}

impl MappingGenerator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            sources: InputSources::default(),
            output_file: PathBuf::from(DEFAULT_OUTPUT),
            format: None,
            render: RenderOptions::default(),
            extract: ExtractOptions::default(),
        }
    }

    /// Select input files with a glob pattern, e.g. `./graph/model/*.go`.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.sources.pattern = Some(pattern.into());
        self
    }

    /// Add one input file. Can be called multiple times.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.files.push(path.into());
        self
    }

    /// Add input files from a comma-separated list.
    pub fn file_list(mut self, list: &str) -> Self {
        self.sources.files.extend(parse_file_list(list));
        self
    }

    /// Add a directory to scan recursively for `.go` files.
    pub fn scan_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.dirs.push(path.into());
        self
    }

    /// Set the output file path for the generated code.
    ///
    /// Default: `./generate/mapping/field_and_json_mapping.go`
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    /// Set the output format. Inferred from the output extension when unset.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the Go package name of the generated file.
    ///
    /// Default: `mapping`
    pub fn package(mut self, name: impl Into<String>) -> Self {
        self.render.package = name.into();
        self
    }

    /// Set the name of the generated variable.
    ///
    /// Default: `AllMappings`
    pub fn var_name(mut self, name: impl Into<String>) -> Self {
        self.render.var_name = name.into();
        self
    }

    /// Set the tag key whose value is recorded.
    ///
    /// Default: `json`
    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.extract.tag_key = key.into();
        self
    }

    /// Record only the name part of tag values, skipping `-` fields.
    pub fn strip_options(mut self, strip: bool) -> Self {
        self.extract.strip_options = strip;
        self
    }

    pub fn sources(&self) -> &InputSources {
        &self.sources
    }

    pub fn output_path(&self) -> &Path {
        &self.output_file
    }

    /// The effective output format.
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| OutputFormat::from_path(&self.output_file))
    }

    /// Resolve the inputs and fold every file into one mapping.
    ///
    /// Stops at the first file that cannot be read or parsed.
    pub fn collect(&self) -> Result<(Vec<PathBuf>, FieldMapping)> {
        let files = self.sources.resolve()?;
        let mut mapping = FieldMapping::new();
        for path in &files {
            extract_file(path, &mut mapping, &self.extract)?;
        }
        Ok((files, mapping))
    }

    /// Collect and render without touching the output file.
    pub fn generate(&self) -> Result<Generated> {
        let (files, mapping) = self.collect()?;
        let format = self.output_format();
        let options = RenderOptions {
            format,
            ..self.render.clone()
        };
        let content = render(&mapping, &options)?;
        Ok(Generated {
            files,
            mapping,
            format,
            content,
        })
    }

    /// Run the generator.
    ///
    /// This resolves all configured inputs, extracts the mapping, and writes
    /// the rendered output. Nothing is written if any step fails.
    pub fn run(self) -> Result<GenerationReport> {
        let generated = self.generate()?;

        // Ensure output directory exists
        if let Some(parent) = self.output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        // Only write if content has changed (avoids unnecessary rebuilds downstream)
        let should_write = match fs::read_to_string(&self.output_file) {
            Ok(existing) => existing != generated.content,
            Err(_) => true,
        };

        if should_write {
            fs::write(&self.output_file, &generated.content)
                .with_context(|| format!("Failed to write {}", self.output_file.display()))?;
            info!(
                "generated {} with {} entries from {} files",
                self.output_file.display(),
                generated.mapping.len(),
                generated.files.len()
            );
        } else {
            info!("{} is up to date", self.output_file.display());
        }

        Ok(GenerationReport {
            entries: generated.mapping.len(),
            files: generated.files,
            output_file: self.output_file,
            written: should_write,
        })
    }
}

impl Default for MappingGenerator {
    fn default() -> Self {
        Self::new()
    }
}
