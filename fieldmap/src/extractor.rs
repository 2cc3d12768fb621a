//! Struct tag extraction.
//!
//! Walks a parsed source file and folds every tagged field of every struct
//! type declaration into a [`FieldMapping`].

use std::fs;
use std::path::Path;

use log::{debug, trace};

use crate::errors::{FieldMapError, ParseError, Result};
use crate::mapping::{FieldMapping, mapping_key};
use crate::scanner::{SourceFile, StructType, TypeSpec, Visitor, parse_source, walk_file};
use crate::tag::{StructTag, tag_name};

pub const DEFAULT_TAG_KEY: &str = "json";

/// Which tag sub-key to read and how to post-process its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Tag key whose value becomes the mapping value (default `json`).
    pub tag_key: String,
    /// Keep only the name before the first comma and skip `-` fields.
    pub strip_options: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tag_key: DEFAULT_TAG_KEY.to_string(),
            strip_options: false,
        }
    }
}

impl ExtractOptions {
    /// The mapping value for a decoded tag, if the field contributes one.
    fn value_for(&self, tag: &str) -> Option<String> {
        let value = StructTag::new(tag).lookup(&self.tag_key)?;
        let value = if self.strip_options {
            if value == "-" {
                return None;
            }
            tag_name(&value).to_string()
        } else {
            value
        };
        (!value.is_empty()).then_some(value)
    }
}

/// One tagged field identifier found during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub ident: String,
    pub tag_value: String,
    pub line: usize,
}

struct TagCollector<'a> {
    options: &'a ExtractOptions,
    records: Vec<FieldRecord>,
    error: Option<ParseError>,
}

impl TagCollector<'_> {
    fn collect_struct(&mut self, st: &StructType<'_>) -> std::result::Result<(), ParseError> {
        for field in st.fields() {
            let Some(tag) = field.tag() else {
                continue;
            };
            let Some(value) = self.options.value_for(&tag.value()?) else {
                continue;
            };
            for name in field.names() {
                self.records.push(FieldRecord {
                    ident: name.name.to_string(),
                    tag_value: value.clone(),
                    line: name.line,
                });
            }
        }
        Ok(())
    }
}

impl Visitor for TagCollector<'_> {
    fn visit_type_spec(&mut self, spec: &TypeSpec<'_>) -> bool {
        if self.error.is_some() {
            return false;
        }
        let Some(st) = spec.struct_type() else {
            return true;
        };
        if let Err(err) = self.collect_struct(&st) {
            self.error = Some(err);
        }

        // The struct's own field list is all that counts; nested struct types are not folded in.
        false
    }
}

/// Collect the tagged fields of every struct declaration in `file`, in source order.
///
/// Fails if a tag literal contains an invalid escape sequence.
pub fn collect_records(
    file: &SourceFile<'_>,
    options: &ExtractOptions,
) -> std::result::Result<Vec<FieldRecord>, ParseError> {
    let mut collector = TagCollector {
        options,
        records: Vec::new(),
        error: None,
    };
    walk_file(&mut collector, file);
    match collector.error {
        Some(err) => Err(err),
        None => Ok(collector.records),
    }
}

/// Parse `src` and fold its tagged fields into `mapping`.
///
/// Returns the number of entries newly inserted.
pub fn extract_source(
    src: &str,
    mapping: &mut FieldMapping,
    options: &ExtractOptions,
) -> std::result::Result<usize, ParseError> {
    let file = parse_source(src)?;
    let mut inserted = 0;
    for record in collect_records(&file, options)? {
        let key = mapping_key(&record.ident);
        if mapping.insert_if_absent(key.as_str(), record.tag_value.as_str()) {
            inserted += 1;
        } else {
            trace!("line {}: `{key}` already mapped, ignoring `{}`", record.line, record.tag_value);
        }
    }
    Ok(inserted)
}

/// Read and extract a single file.
pub fn extract_file(path: &Path, mapping: &mut FieldMapping, options: &ExtractOptions) -> Result<usize> {
    let content = fs::read_to_string(path).map_err(|source| FieldMapError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let inserted = extract_source(&content, mapping, options).map_err(|source| FieldMapError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("{}: {inserted} new entries", path.display());
    Ok(inserted)
}
