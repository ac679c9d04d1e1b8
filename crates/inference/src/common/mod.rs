//! Tree-sitter helpers shared by the walker and the classifiers

use stepdefs_core::error::{Error, Result};
use tree_sitter::Node;

/// Node kinds that introduce their own `return` scope
pub(crate) const FUNCTION_KINDS: &[&str] = &[
    "function_expression",
    "function_declaration",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
    "class",
    "class_declaration",
];

/// Convert tree-sitter node to text
pub fn node_to_text(node: Node, source: &str) -> Result<String> {
    node_text(node, source).map(str::to_string)
}

/// Borrow the source text of a node
pub fn node_text<'s>(node: Node, source: &'s str) -> Result<&'s str> {
    node.utf8_text(source.as_bytes())
        .map_err(|e| Error::assertion(format!("Failed to convert node to text: {e}")))
}

/// Named children of a node, without comments
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// First named, non-comment child
pub fn first_named_child<'t>(node: Node<'t>) -> Option<Node<'t>> {
    named_children(node).into_iter().next()
}

/// Unwraps any number of parentheses around an expression
pub fn unparenthesize(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match first_named_child(node) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Value of a string literal, without its quotes
///
/// Returns `None` when the node is not a plain string literal.
pub fn string_literal_value(node: Node, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let text = node_text(node, source).ok()?;
    if text.len() < 2 {
        return None;
    }
    Some(text[1..text.len() - 1].to_string())
}

/// Name of an object literal key (`foo`, `"foo"`, `0`, `#foo`)
pub fn property_key(node: Node, source: &str) -> Result<String> {
    match string_literal_value(node, source) {
        Some(value) => Ok(value),
        None => node_to_text(node, source),
    }
}

/// True for nodes that evaluate to a function value
pub fn is_function_value(node: Node) -> bool {
    matches!(
        node.kind(),
        "function_expression" | "arrow_function" | "generator_function" | "method_definition"
    )
}

/// True for an identifier or a dotted `a.b.c` path made only of identifiers
pub fn is_property_path(node: Node) -> bool {
    match node.kind() {
        "identifier" => true,
        "member_expression" => {
            let object = node.child_by_field_name("object");
            let property = node.child_by_field_name("property");
            match (object, property) {
                (Some(object), Some(property)) => {
                    property.kind() == "property_identifier" && is_property_path(object)
                }
                _ => false,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tree_sitter::{Parser, Tree};

    /// Parse JavaScript source for unit tests
    pub fn parse(source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    /// Depth-first search for the first node of `kind`
    pub fn find_kind<'t>(node: tree_sitter::Node<'t>, kind: &str) -> Option<tree_sitter::Node<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().find_map(|child| find_kind(child, kind))
    }
}
