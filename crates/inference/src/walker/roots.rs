//! Root phase: locating module registrations

use super::{Scope, Walker};
use crate::common::{named_children, node_text, string_literal_value};
use stepdefs_core::error::{ensure, Error, Result};
use tracing::debug;
use tree_sitter::Node;

/// A module registration and the statement block passed to `defines`
struct Registration<'t> {
    module: String,
    body: Node<'t>,
}

impl<'c, 't> Walker<'c, 't> {
    pub(super) fn scan_program(&mut self, program: Node<'t>) -> Result<()> {
        for child in named_children(program) {
            self.scan_roots(child, 0)?;
        }
        Ok(())
    }

    /// Looks for registrations no deeper than `root_scan_depth` below the top level
    fn scan_roots(&mut self, node: Node<'t>, depth: usize) -> Result<()> {
        if let Some(registration) = self.registration(node)? {
            self.visit_module(registration)?;
        }
        if depth < self.config.root_scan_depth {
            for child in named_children(node) {
                self.scan_roots(child, depth + 1)?;
            }
        }
        Ok(())
    }

    fn visit_module(&mut self, registration: Registration<'t>) -> Result<()> {
        debug!(module = %registration.module, "Scanning module body");
        self.diagnostics.modules_scanned += 1;

        for statement in named_children(registration.body) {
            self.visit(statement, &registration.module, Scope::default())?;
        }
        self.refine_pending_inits()
    }

    /// Recognizes `ig.module("name")[.requires(...)...].defines(function () {...})`
    fn registration(&self, node: Node<'t>) -> Result<Option<Registration<'t>>> {
        if node.kind() != "call_expression" {
            return Ok(None);
        }
        let Some(callee) = node.child_by_field_name("function") else {
            return Ok(None);
        };
        let marker = format!("{}(", self.config.module_marker);
        if callee.kind() != "member_expression"
            || !node_text(callee, self.source)?.starts_with(&marker)
        {
            return Ok(None);
        }
        let is_defines = match callee.child_by_field_name("property") {
            Some(property) => node_text(property, self.source)? == self.config.defines_marker,
            None => false,
        };
        if !is_defines {
            return Ok(None);
        }

        let module = self.module_name(callee)?;
        let body = defines_body(node)?;
        Ok(Some(Registration { module, body }))
    }

    /// Unwraps chained calls down to the base registration call and reads its name
    fn module_name(&self, callee: Node<'t>) -> Result<String> {
        let mut current = callee
            .child_by_field_name("object")
            .ok_or_else(|| Error::assertion("registration callee has no object"))?;

        loop {
            match current.kind() {
                "call_expression" => {
                    let function = current
                        .child_by_field_name("function")
                        .ok_or_else(|| Error::assertion("call without a callee"))?;
                    if node_text(function, self.source)? == self.config.module_marker {
                        break;
                    }
                    current = function;
                }
                "member_expression" => {
                    current = current
                        .child_by_field_name("object")
                        .ok_or_else(|| Error::assertion("member access without an object"))?;
                }
                other => {
                    return Err(Error::assertion(format!(
                        "unexpected {other} in module registration chain"
                    )))
                }
            }
        }

        let name = current
            .child_by_field_name("arguments")
            .and_then(|args| named_children(args).into_iter().next())
            .ok_or_else(|| Error::assertion("module registration without a name"))?;
        string_literal_value(name, self.source).ok_or_else(|| {
            Error::assertion(format!(
                "module name is a {} instead of a string literal",
                name.kind()
            ))
        })
    }
}

/// The statement block of the function passed to `defines`
fn defines_body(call: Node) -> Result<Node> {
    let function = call
        .child_by_field_name("arguments")
        .and_then(|args| named_children(args).into_iter().next())
        .ok_or_else(|| Error::assertion("defines call without a module body"))?;
    ensure(
        matches!(function.kind(), "function_expression" | "arrow_function"),
        || format!("defines argument is a {}", function.kind()),
    )?;

    let body = function
        .child_by_field_name("body")
        .ok_or_else(|| Error::assertion("module body function has no body"))?;
    ensure(body.kind() == "statement_block", || {
        format!("module body is a {}", body.kind())
    })?;
    Ok(body)
}
