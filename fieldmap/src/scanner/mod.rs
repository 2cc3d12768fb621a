//! Go source scanning.
//!
//! This module provides functionality to:
//! - Parse Go source text with the tree-sitter Go grammar
//! - Reject files with syntax errors or statements outside function bodies
//! - Walk type declarations at any depth with a descent-controlling [`Visitor`]

mod literal;
mod syntax;

use tree_sitter::{Node, Parser};

use crate::errors::ParseError;

pub use literal::unquote;
pub use syntax::{FieldDecl, Ident, SourceFile, StructType, TagLiteral, TypeSpec};

use syntax::position;

/// Callbacks for [`walk_file`].
pub trait Visitor {
    /// Called for every type spec, including those local to function bodies and
    /// function literals. Returning `false` skips everything nested inside the spec.
    fn visit_type_spec(&mut self, spec: &TypeSpec<'_>) -> bool;
}

/// Parse `src` as a Go source file.
pub fn parse_source(src: &str) -> Result<SourceFile<'_>, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|err| ParseError::new(1, 1, format!("failed to load Go grammar: {err}")))?;
    let tree = parser
        .parse(src, None)
        .ok_or_else(|| ParseError::new(1, 1, "parser produced no syntax tree"))?;

    let root = tree.root_node();
    if let Some(node) = first_error(root) {
        return Err(syntax_error(node, src));
    }
    check_top_level(root, src)?;

    Ok(SourceFile { tree, source: src })
}

/// Depth-first walk over every type spec in `file`, in source order.
pub fn walk_file<V: Visitor + ?Sized>(visitor: &mut V, file: &SourceFile<'_>) {
    let mut cursor = file.tree.walk();
    loop {
        let node = cursor.node();
        let descend = match node.kind() {
            "type_spec" | "type_alias" => visitor.visit_type_spec(&TypeSpec {
                node,
                source: file.source,
            }),
            _ => true,
        };
        if descend && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn syntax_error(node: Node<'_>, src: &str) -> ParseError {
    let (line, column) = position(node);
    let message = if node.is_missing() {
        format!("expected '{}'", node.kind())
    } else {
        match leading_text(node, src) {
            Some(text) => format!("unexpected '{text}'"),
            None => "unexpected EOF".to_string(),
        }
    };
    ParseError::new(line, column, message)
}

/// The first word of a node's text, shortened for messages.
fn leading_text<'s>(node: Node<'_>, src: &'s str) -> Option<&'s str> {
    let word = src[node.byte_range()].split_whitespace().next()?;
    Some(match word.char_indices().nth(24) {
        Some((end, _)) => &word[..end],
        None => word,
    })
}

/// Go files start with a package clause, followed by imports, followed by declarations.
fn check_top_level(root: Node<'_>, src: &str) -> Result<(), ParseError> {
    let mut seen_package = false;
    let mut seen_decl = false;
    let mut cursor = root.walk();

    for node in root.named_children(&mut cursor) {
        let (line, column) = position(node);
        let found = leading_text(node, src).unwrap_or_default();
        match node.kind() {
            "comment" => {}
            "package_clause" if !seen_package => seen_package = true,
            _ if !seen_package => {
                return Err(ParseError::new(line, column, format!("expected 'package', found '{found}'")));
            }
            "import_declaration" if seen_decl => {
                return Err(ParseError::new(line, column, "imports must appear before other declarations"));
            }
            "import_declaration" => {}
            "function_declaration" | "method_declaration" | "type_declaration" | "var_declaration"
            | "const_declaration" => seen_decl = true,
            _ => {
                return Err(ParseError::new(
                    line,
                    column,
                    format!("non-declaration statement outside function body: '{found}'"),
                ));
            }
        }
    }

    if !seen_package {
        return Err(ParseError::new(1, 1, "expected 'package', found EOF"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Specs(Vec<String>);

    impl Visitor for Specs {
        fn visit_type_spec(&mut self, spec: &TypeSpec<'_>) -> bool {
            if let Some(name) = spec.name() {
                self.0.push(name.name.to_string());
            }
            true
        }
    }

    fn spec_names(src: &str) -> Vec<String> {
        let file = parse_source(src).unwrap();
        let mut specs = Specs(Vec::new());
        walk_file(&mut specs, &file);
        specs.0
    }

    struct StructNames(Vec<String>);

    impl Visitor for StructNames {
        fn visit_type_spec(&mut self, spec: &TypeSpec<'_>) -> bool {
            if spec.struct_type().is_some()
                && let Some(name) = spec.name()
            {
                self.0.push(name.name.to_string());
            }
            true
        }
    }

    fn struct_names(src: &str) -> Vec<String> {
        let file = parse_source(src).unwrap();
        let mut names = StructNames(Vec::new());
        walk_file(&mut names, &file);
        names.0
    }

    fn first_struct_fields(src: &str, check: impl FnOnce(&[FieldDecl<'_>])) {
        struct First<F>(Option<F>);
        impl<F: FnOnce(&[FieldDecl<'_>])> Visitor for First<F> {
            fn visit_type_spec(&mut self, spec: &TypeSpec<'_>) -> bool {
                if let Some(st) = spec.struct_type()
                    && let Some(check) = self.0.take()
                {
                    check(&st.fields());
                }
                true
            }
        }

        let file = parse_source(src).unwrap();
        let mut first = First(Some(check));
        walk_file(&mut first, &file);
        assert!(first.0.is_none(), "no struct found");
    }

    #[test]
    fn test_parse_package() {
        let file = parse_source(
            "package model\n\nimport (\n\t\"time\"\n\tdb \"example.com/db\"\n)\nimport _ \"embed\"\n",
        )
        .unwrap();
        assert_eq!(file.package(), Some("model"));
    }

    #[test]
    fn test_parse_struct_fields_and_tags() {
        first_struct_fields(
            "package model\n\ntype User struct {\n\tName string `json:\"name\"`\n\tFirst, Last string \"json:\\\"n\\\"\"\n\tInternal string\n\t*Base\n\ttime.Time `json:\"t\"`\n}\n",
            |fields| {
                assert_eq!(fields.len(), 5);
                assert_eq!(fields[0].names()[0].name, "Name");
                assert_eq!(fields[0].names()[0].line, 4);
                assert_eq!(fields[0].tag().unwrap().value().unwrap(), "json:\"name\"");
                let names: Vec<_> = fields[1].names().iter().map(|n| n.name).collect();
                assert_eq!(names, vec!["First", "Last"]);
                assert_eq!(fields[1].tag().unwrap().value().unwrap(), "json:\"n\"");
                assert!(fields[2].tag().is_none());
                assert!(fields[3].is_embedded());
                assert!(fields[4].is_embedded());
                assert_eq!(fields[4].line(), 8);
            },
        );
    }

    #[test]
    fn test_parse_type_params_versus_array() {
        let src = "package p\n\nconst Size = 8\n\ntype Pair[K comparable, V any] struct{ Key K; Val V }\ntype Box[T any] struct{ V T }\ntype Buf [Size * 2]byte\ntype Fixed [8 * 2]byte\ntype Rows [len(x)]struct{ Cell string }\ntype Ext [pkg.N]struct{ V int }\ntype Num interface{ ~int | ~float64 }\ntype Alias = Pair[string, int]\n";
        assert_eq!(
            spec_names(src),
            vec!["Pair", "Box", "Buf", "Fixed", "Rows", "Ext", "Num", "Alias"]
        );
        assert_eq!(struct_names(src), vec!["Pair", "Box"]);
    }

    #[test]
    fn test_alias_spec() {
        let file = parse_source("package p\ntype B = struct{ Two int }\n").unwrap();
        struct Alias(bool);
        impl Visitor for Alias {
            fn visit_type_spec(&mut self, spec: &TypeSpec<'_>) -> bool {
                self.0 = spec.is_alias() && spec.struct_type().is_some();
                true
            }
        }
        let mut alias = Alias(false);
        walk_file(&mut alias, &file);
        assert!(alias.0);
    }

    #[test]
    fn test_walk_reaches_local_types() {
        let names = spec_names(
            "package p\n\nfunc (s *Server[T]) Handle(w http.ResponseWriter, r *http.Request) {\n\ttype payload struct {\n\t\tID string `json:\"id\"`\n\t}\n\tswitch v := x.(type) {\n\tcase int:\n\t\t_ = v\n\t}\n\t_ = func() { type inner struct{ A int } }\n}\n\nvar handler = func() { type local struct{} }\n",
        );
        assert_eq!(names, vec!["payload", "inner", "local"]);
    }

    #[test]
    fn test_walk_continues_after_declined_spec() {
        struct Outer(Vec<String>);
        impl Visitor for Outer {
            fn visit_type_spec(&mut self, spec: &TypeSpec<'_>) -> bool {
                if let Some(name) = spec.name() {
                    self.0.push(name.name.to_string());
                }
                false
            }
        }
        let file = parse_source("package p\ntype F func() struct{ A int }\nfunc f() { type G struct{} }\n").unwrap();
        let mut outer = Outer(Vec::new());
        walk_file(&mut outer, &file);
        assert_eq!(outer.0, vec!["F", "G"]);
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse_source("type T struct{}\n").unwrap_err();
        assert_eq!((err.line, err.column), (1, 1));
        assert_eq!(err.message, "expected 'package', found 'type'");

        let err = parse_source("").unwrap_err();
        assert_eq!(err.message, "expected 'package', found EOF");
    }

    #[test]
    fn test_syntax_errors_fail() {
        assert!(parse_source("package p\nfunc f() {\n\tif x {\n}\n").is_err());
        assert!(parse_source("package p\nvar x = f(1, g(2)\n").is_err());
        assert!(parse_source("package p\ntype T struct {\n\tName string `json:\"name\"`\n").is_err());
    }

    #[test]
    fn test_statement_at_top_level_fails() {
        let err = parse_source("package p\nx := 1\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_import_after_declaration_fails() {
        let err = parse_source("package p\nvar x = 1\nimport \"fmt\"\n").unwrap_err();
        assert_eq!(err.message, "imports must appear before other declarations");
    }

    #[test]
    fn test_invalid_tag_escape_reported_at_tag() {
        first_struct_fields("package p\ntype T struct {\n\tA int \"json:\\400\"\n}\n", |fields| {
            let err = fields[0].tag().unwrap().value().unwrap_err();
            assert_eq!((err.line, err.column), (3, 8));
            assert_eq!(err.message, "octal escape value > 255");
        });
    }
}
