//! Rendering of a [`FieldMapping`] into a generated source artifact.

use std::fmt::Write;
use std::path::Path;

use proc_macro2::TokenStream;
use quote::quote;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldMapError, Result};
use crate::mapping::FieldMapping;

pub const DEFAULT_PACKAGE: &str = "mapping";
pub const DEFAULT_VAR_NAME: &str = "AllMappings";

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough", "for", "func", "go", "goto",
    "if", "import", "interface", "map", "package", "range", "return", "select", "struct", "switch", "type", "var",
];

/// Target language of the generated artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Go source declaring a `map[string]string` variable
    #[default]
    Go,
    /// Rust source declaring a sorted static table and a lookup function
    Rust,
    /// A JSON object
    Json,
}

impl OutputFormat {
    /// Infer the format from an output path's extension, defaulting to Go.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("rs") => OutputFormat::Rust,
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Go,
        }
    }
}

/// Names used in the generated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Go package clause name.
    pub package: String,
    /// Go variable name; converted to SCREAMING_SNAKE_CASE for Rust.
    pub var_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Go,
            package: DEFAULT_PACKAGE.to_string(),
            var_name: DEFAULT_VAR_NAME.to_string(),
        }
    }
}

/// Render `mapping` in the configured format. Entries appear in ascending key order.
pub fn render(mapping: &FieldMapping, options: &RenderOptions) -> Result<String> {
    match options.format {
        OutputFormat::Go => render_go(mapping, &options.package, &options.var_name),
        OutputFormat::Rust => render_rust(mapping, &to_screaming_snake_case(&options.var_name)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(mapping).map_err(|err| FieldMapError::Render {
                message: err.to_string(),
            })?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn render_go(mapping: &FieldMapping, package: &str, var_name: &str) -> Result<String> {
    for name in [package, var_name] {
        if !is_go_identifier(name) {
            return Err(FieldMapError::Render {
                message: format!("`{name}` is not a valid Go identifier"),
            });
        }
    }

    let mut content = String::new();
    let _ = writeln!(content, "// Code generated by fieldmap. DO NOT EDIT.");
    let _ = writeln!(content);
    let _ = writeln!(content, "package {package}");
    let _ = writeln!(content);
    let _ = writeln!(content, "var {var_name} = map[string]string{{");
    for (key, value) in mapping.iter() {
        let _ = writeln!(content, "\t{}: {},", go_quote(key), go_quote(value));
    }
    let _ = writeln!(content, "}}");
    Ok(content)
}

fn render_rust(mapping: &FieldMapping, const_name: &str) -> Result<String> {
    let table: syn::Ident = syn::parse_str(const_name).map_err(|_| FieldMapError::Render {
        message: format!("`{const_name}` is not a valid Rust identifier"),
    })?;

    let entries: Vec<TokenStream> = mapping
        .iter()
        .map(|(key, value)| quote! { (#key, #value) })
        .collect();

    let output = quote! {
        //! Auto-generated field mapping. Do not edit manually.
        //!
        //! Generated by fieldmap.

        /// Field identifier to serialization key, sorted by field identifier.
        pub static #table: &[(&str, &str)] = &[#(#entries),*];

        /// Look up the serialization key for a field identifier.
        pub fn lookup(field: &str) -> Option<&'static str> {
            #table
                .binary_search_by(|(key, _)| (*key).cmp(field))
                .ok()
                .map(|index| #table[index].1)
        }
    };

    let syntax_tree = syn::parse2(output).map_err(|err| FieldMapError::Render {
        message: format!("failed to parse generated code: {err}"),
    })?;
    Ok(prettyplease::unparse(&syntax_tree))
}

fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && !GO_KEYWORDS.contains(&name)
}

/// Quote `s` as a Go interpreted string literal.
fn go_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(quoted, "\\u{:04x}", c as u32);
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Convert PascalCase to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_uppercase());
        } else {
            result.extend(ch.to_uppercase());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FieldMapping {
        let mut mapping = FieldMapping::new();
        mapping.insert_if_absent("name", "name");
        mapping.insert_if_absent("id", "identifier");
        mapping
    }

    #[test]
    fn test_render_go() {
        let out = render(&sample(), &RenderOptions::default()).unwrap();
        assert_eq!(
            out,
            "// Code generated by fieldmap. DO NOT EDIT.\n\npackage mapping\n\nvar AllMappings = map[string]string{\n\t\"id\": \"identifier\",\n\t\"name\": \"name\",\n}\n"
        );
    }

    #[test]
    fn test_render_go_empty_map() {
        let out = render(&FieldMapping::new(), &RenderOptions::default()).unwrap();
        assert!(out.ends_with("var AllMappings = map[string]string{\n}\n"));
    }

    #[test]
    fn test_render_go_escapes_values() {
        let mut mapping = FieldMapping::new();
        mapping.insert_if_absent("quote", "say \"hi\"\\");
        let out = render(&mapping, &RenderOptions::default()).unwrap();
        assert!(out.contains("\t\"quote\": \"say \\\"hi\\\"\\\\\",\n"));
    }

    #[test]
    fn test_render_go_rejects_bad_names() {
        let options = RenderOptions {
            package: "type".to_string(),
            ..Default::default()
        };
        assert!(matches!(render(&sample(), &options), Err(FieldMapError::Render { .. })));

        let options = RenderOptions {
            var_name: "1st".to_string(),
            ..Default::default()
        };
        assert!(render(&sample(), &options).is_err());
    }

    #[test]
    fn test_render_rust() {
        let options = RenderOptions {
            format: OutputFormat::Rust,
            ..Default::default()
        };
        let out = render(&sample(), &options).unwrap();
        assert!(out.contains("pub static ALL_MAPPINGS: &[(&str, &str)]"));
        assert!(out.contains("(\"id\", \"identifier\")"));
        assert!(out.contains("pub fn lookup(field: &str) -> Option<&'static str>"));
        let id = out.find("\"id\"").unwrap();
        let name = out.find("\"name\"").unwrap();
        assert!(id < name);
        // The output must itself be valid Rust.
        assert!(syn::parse_file(&out).is_ok());
    }

    #[test]
    fn test_render_json() {
        let options = RenderOptions {
            format: OutputFormat::Json,
            ..Default::default()
        };
        let out = render(&sample(), &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["id"], "identifier");
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("gen/mapping.rs")), OutputFormat::Rust);
        assert_eq!(OutputFormat::from_path(Path::new("gen/mapping.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("gen/mapping.go")), OutputFormat::Go);
        assert_eq!(OutputFormat::from_path(Path::new("gen/mapping")), OutputFormat::Go);
    }

    #[test]
    fn test_to_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("AllMappings"), "ALL_MAPPINGS");
        assert_eq!(to_screaming_snake_case("fieldMap"), "FIELD_MAP");
        assert_eq!(to_screaming_snake_case("Field_Map"), "FIELD_MAP");
    }
}
