//! Typed views over the tree-sitter Go syntax tree.

use tree_sitter::{Node, Tree};

use super::literal::unquote;
use crate::errors::ParseError;

/// A parsed Go source file.
#[derive(Debug)]
pub struct SourceFile<'src> {
    pub(super) tree: Tree,
    pub(super) source: &'src str,
}

impl<'src> SourceFile<'src> {
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// The name in the package clause.
    pub fn package(&self) -> Option<&str> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        let clause = root.named_children(&mut cursor).find(|n| n.kind() == "package_clause")?;
        let mut cursor = clause.walk();
        let name = clause
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_identifier")?;
        Some(&self.source[name.byte_range()])
    }
}

/// An identifier with its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'a> {
    pub name: &'a str,
    pub line: usize,
    pub column: usize,
}

impl<'a> Ident<'a> {
    fn new(node: Node<'_>, source: &'a str) -> Self {
        let (line, column) = position(node);
        Self {
            name: &source[node.byte_range()],
            line,
            column,
        }
    }
}

/// One `Name [TypeParams] Type` or `Name = Type` spec of a type declaration.
#[derive(Clone, Copy)]
pub struct TypeSpec<'a> {
    pub(super) node: Node<'a>,
    pub(super) source: &'a str,
}

impl<'a> TypeSpec<'a> {
    pub fn name(&self) -> Option<Ident<'a>> {
        self.node
            .child_by_field_name("name")
            .map(|node| Ident::new(node, self.source))
    }

    pub fn is_alias(&self) -> bool {
        self.node.kind() == "type_alias"
    }

    /// The struct this spec declares, if its type is directly a struct type.
    pub fn struct_type(&self) -> Option<StructType<'a>> {
        let ty = self.node.child_by_field_name("type")?;
        if ty.kind() != "struct_type" || self.declares_array() {
            return None;
        }
        Some(StructType {
            node: ty,
            source: self.source,
        })
    }

    /// `type T[P *C] ...` and `type T[P (C)] ...` declare arrays whose length is an
    /// expression; only a trailing comma makes the brackets a type parameter list.
    fn declares_array(&self) -> bool {
        let Some(params) = self.node.child_by_field_name("type_parameters") else {
            return false;
        };

        let mut cursor = params.walk();
        let decls: Vec<Node<'a>> = params
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect();
        let [decl] = decls.as_slice() else {
            return false;
        };

        let mut cursor = params.walk();
        if params.children(&mut cursor).any(|n| n.kind() == ",") {
            return false;
        }
        let mut cursor = decl.walk();
        if decl.children_by_field_name("name", &mut cursor).count() != 1 {
            return false;
        }

        let Some(mut constraint) = decl.child_by_field_name("type") else {
            return false;
        };
        while matches!(constraint.kind(), "type_constraint" | "type_elem") && constraint.named_child_count() == 1 {
            match constraint.named_child(0) {
                Some(inner) => constraint = inner,
                None => break,
            }
        }
        matches!(constraint.kind(), "pointer_type" | "parenthesized_type")
    }
}

/// A `struct { ... }` type.
#[derive(Clone, Copy)]
pub struct StructType<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> StructType<'a> {
    /// Field declarations in source order.
    pub fn fields(&self) -> Vec<FieldDecl<'a>> {
        let mut cursor = self.node.walk();
        let Some(list) = self
            .node
            .named_children(&mut cursor)
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return Vec::new();
        };

        let mut cursor = list.walk();
        list.named_children(&mut cursor)
            .filter(|n| n.kind() == "field_declaration")
            .map(|node| FieldDecl {
                node,
                source: self.source,
            })
            .collect()
    }
}

#[derive(Clone, Copy)]
pub struct FieldDecl<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> FieldDecl<'a> {
    /// Identifiers sharing this declaration's type and tag. Empty for embedded fields.
    pub fn names(&self) -> Vec<Ident<'a>> {
        let mut cursor = self.node.walk();
        self.node
            .children_by_field_name("name", &mut cursor)
            .map(|node| Ident::new(node, self.source))
            .collect()
    }

    pub fn is_embedded(&self) -> bool {
        self.node.child_by_field_name("name").is_none()
    }

    pub fn tag(&self) -> Option<TagLiteral<'a>> {
        let node = self.node.child_by_field_name("tag")?;
        let (line, column) = position(node);
        Some(TagLiteral {
            literal: &self.source[node.byte_range()],
            line,
            column,
        })
    }

    pub fn line(&self) -> usize {
        position(self.node).0
    }
}

/// The string literal following a field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagLiteral<'a> {
    pub literal: &'a str,
    pub line: usize,
    pub column: usize,
}

impl TagLiteral<'_> {
    /// The decoded tag text.
    pub fn value(&self) -> Result<String, ParseError> {
        unquote(self.literal).map_err(|message| ParseError::new(self.line, self.column, message))
    }
}

/// 1-based line and column of a node's start.
pub(super) fn position(node: Node<'_>) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}
