//! Entry point tying the parser, the walker and the catalog together

use crate::diagnostics::Diagnostics;
use crate::walker::Walker;
use serde::Serialize;
use std::path::Path;
use stepdefs_core::catalog::{Catalog, CatalogExtension};
use stepdefs_core::config::InferenceConfig;
use stepdefs_core::error::{Error, Result};
use tracing::{debug, warn};
use tree_sitter::{Parser, Tree};

/// Result of one inference run
#[derive(Debug, Clone, Default, Serialize)]
pub struct InferenceOutput {
    /// Member paths that were not in the catalog
    pub extension: CatalogExtension,
    pub diagnostics: Diagnostics,
}

/// Parses a JavaScript program
pub fn parse_script(source: &str, file: &Path) -> Result<Tree> {
    let file = file.display().to_string();
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| Error::parse(&file, format!("Failed to set JavaScript language: {e}")))?;

    parser
        .parse(source, None)
        .ok_or_else(|| Error::parse(&file, "Failed to parse source code"))
}

/// Infers step definitions missing from a catalog
pub struct InferenceEngine<'c> {
    catalog: &'c Catalog,
    config: InferenceConfig,
}

impl<'c> InferenceEngine<'c> {
    pub fn new(catalog: &'c Catalog, config: InferenceConfig) -> Self {
        Self { catalog, config }
    }

    /// Scans `source` and returns the entries the catalog is missing
    ///
    /// `file` only labels errors and log lines. The catalog is never modified;
    /// merge the returned extension with [`CatalogExtension::merge_into`].
    pub fn infer(&self, source: &str, file: &Path) -> Result<InferenceOutput> {
        self.config.validate()?;
        let tree = parse_script(source, file)?;
        let program = tree.root_node();
        if program.has_error() {
            warn!(file = %file.display(), "Script contains syntax errors; continuing with the recovered tree");
        }

        let mut walker = Walker::new(self.catalog, &self.config, source);
        walker.walk(program)?;
        let (extension, diagnostics) = walker.finish();

        debug!(
            file = %file.display(),
            entries = extension.len(),
            "Walk complete"
        );
        diagnostics.log_summary();

        Ok(InferenceOutput {
            extension,
            diagnostics,
        })
    }

    /// [`infer`](Self::infer) for sources without a file name
    pub fn infer_source(&self, source: &str) -> Result<InferenceOutput> {
        self.infer(source, Path::new("<memory>"))
    }
}
