//! Two-phase traversal of the compiled script
//!
//! The root phase ([`roots`]) finds `ig.module(...).defines(function () {...})`
//! registrations near the top of the tree. The member phase ([`members`])
//! walks each module body, tracks which class is being extended and visits
//! the members of every class that extends a recognized base family.

mod members;
mod roots;

use crate::diagnostics::Diagnostics;
use crate::resolver::InheritanceResolver;
use stepdefs_core::catalog::{BaseFamily, Catalog, CatalogExtension};
use stepdefs_core::config::InferenceConfig;
use stepdefs_core::error::Result;
use tree_sitter::Node;

/// Traversal state threaded by value into every child
///
/// `im::Vector` makes the per-branch copy of the namespace stack cheap, so a
/// push inside one branch is never seen by its siblings.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    pub namespace: im::Vector<String>,
    pub family: Option<BaseFamily>,
}

impl Scope {
    /// Dot-joined member path of the class being defined
    pub fn member_path(&self) -> String {
        self.namespace
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// An `init` method whose body is inspected once the module is fully visited
#[derive(Debug, Clone)]
pub(crate) struct PendingInit<'t> {
    pub module: String,
    pub path: String,
    pub family: BaseFamily,
    pub method: Node<'t>,
}

pub(crate) struct Walker<'c, 't> {
    source: &'t str,
    catalog: &'c Catalog,
    config: &'c InferenceConfig,
    resolver: InheritanceResolver<'c>,
    extension: CatalogExtension,
    diagnostics: Diagnostics,
    pending_inits: Vec<PendingInit<'t>>,
}

impl<'c, 't> Walker<'c, 't> {
    pub fn new(catalog: &'c Catalog, config: &'c InferenceConfig, source: &'t str) -> Self {
        Self {
            source,
            catalog,
            config,
            resolver: InheritanceResolver::with_max_depth(catalog, config.max_parent_depth),
            extension: CatalogExtension::new(),
            diagnostics: Diagnostics::default(),
            pending_inits: Vec::new(),
        }
    }

    /// Runs both phases over a parsed program
    pub fn walk(&mut self, program: Node<'t>) -> Result<()> {
        self.diagnostics.syntax_errors = program.has_error();
        self.scan_program(program)
    }

    pub fn finish(self) -> (CatalogExtension, Diagnostics) {
        (self.extension, self.diagnostics)
    }
}
