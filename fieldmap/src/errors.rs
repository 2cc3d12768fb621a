use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type returned by the scanning and generation pipeline.
#[derive(Debug, Error)]
pub enum FieldMapError {
    /// No input source (pattern, file list or scan directory) was configured.
    #[error("you must provide a file pattern, a list of individual file paths, or a scan directory")]
    MissingInput,

    /// The glob pattern could not be compiled.
    #[error("failed to match file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A path produced by the glob pattern or directory walk could not be read.
    #[error("failed to resolve input files: {message}")]
    Resolve { message: String },

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid Go source.
    #[error("failed to parse file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The rendered output could not be produced.
    #[error("failed to render output: {message}")]
    Render { message: String },
}

/// A syntax error located in a single source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

pub type Result<T, E = FieldMapError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_position() {
        let err = ParseError::new(3, 14, "expected '}'");
        assert_eq!(err.to_string(), "3:14: expected '}'");
    }

    #[test]
    fn wrapped_parse_error_names_the_file() {
        let err = FieldMapError::Parse {
            path: PathBuf::from("model/user.go"),
            source: ParseError::new(1, 1, "expected 'package'"),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse file model/user.go: 1:1: expected 'package'"
        );
    }
}
