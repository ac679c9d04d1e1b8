//! Signatures of function-valued members

use crate::common::{named_children, node_to_text, FUNCTION_KINDS};
use stepdefs_core::catalog::{FunctionArg, FunctionSig};
use stepdefs_core::error::{Error, Result};
use stepdefs_core::{UNKNOWN_TYPE, VOID_TYPE};
use tree_sitter::Node;

/// Derives the signature of a function expression, arrow function or method
///
/// Parameters are always `unknown` and required, behind a leading receiver.
pub fn method_signature(node: Node, source: &str) -> Result<FunctionSig> {
    let mut args = vec![FunctionArg::receiver()];
    args.extend(
        parameter_names(node, source)?
            .into_iter()
            .map(FunctionArg::unknown),
    );

    Ok(FunctionSig {
        return_type: return_type(node).to_string(),
        args,
    })
}

/// Names of the declared parameters, in order
pub fn parameter_names(node: Node, source: &str) -> Result<Vec<String>> {
    // `x => ...` has a single bare parameter
    if let Some(single) = node.child_by_field_name("parameter") {
        return Ok(vec![node_to_text(single, source)?]);
    }

    let Some(params) = node.child_by_field_name("parameters") else {
        return Err(Error::assertion(format!(
            "{} without a parameter list",
            node.kind()
        )));
    };

    let mut names = Vec::new();
    for param in named_children(params) {
        let name_node = match param.kind() {
            "assignment_pattern" => param.child_by_field_name("left").unwrap_or(param),
            "rest_pattern" => param.named_child(0).unwrap_or(param),
            _ => param,
        };
        names.push(node_to_text(name_node, source)?);
    }
    Ok(names)
}

/// `void` when every `return` in the body is bare, `unknown` otherwise
///
/// Returns inside nested functions belong to those functions and are ignored.
/// An arrow function with an expression body always yields a value.
pub fn return_type(node: Node) -> &'static str {
    let Some(body) = node.child_by_field_name("body") else {
        return VOID_TYPE;
    };
    if body.kind() != "statement_block" {
        return UNKNOWN_TYPE;
    }
    if returns_value(body) {
        UNKNOWN_TYPE
    } else {
        VOID_TYPE
    }
}

fn returns_value(node: Node) -> bool {
    named_children(node).into_iter().any(|child| {
        if child.kind() == "return_statement" {
            !named_children(child).is_empty()
        } else if FUNCTION_KINDS.contains(&child.kind()) {
            false
        } else {
            returns_value(child)
        }
    })
}
