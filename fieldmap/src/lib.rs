//! Field-name to serialization-key mapping generator for Go sources.
//!
//! This crate scans Go files for struct type declarations, reads the `json`
//! tag (or another configured tag key) of every named field and folds the
//! results into a single [`FieldMapping`]. Keys are the field identifier with
//! only its first character lowercased; the first value seen for a key wins.
//! The mapping is then rendered as Go, Rust or JSON source.
//!
//! # Example
//!
//! ```ignore
//! fieldmap::MappingGenerator::new()
//!     .pattern("./graph/model/*.go")
//!     .file_list("./db/models.go,./graph/auth.go")
//!     .output_file("./generate/mapping/field_and_json_mapping.go")
//!     .run()?;
//! ```

pub mod errors;
pub mod extractor;
pub mod generator;
pub mod mapping;
pub mod render;
pub mod scanner;
pub mod sources;
pub mod tag;

pub use errors::{FieldMapError, ParseError, Result};
pub use extractor::{DEFAULT_TAG_KEY, ExtractOptions, FieldRecord, collect_records, extract_file, extract_source};
pub use generator::{DEFAULT_OUTPUT, GenerationReport, Generated, MappingGenerator};
pub use mapping::{FieldMapping, mapping_key};
pub use render::{DEFAULT_PACKAGE, DEFAULT_VAR_NAME, OutputFormat, RenderOptions, render};
pub use sources::{InputSources, parse_file_list};
pub use tag::{StructTag, tag_name};
