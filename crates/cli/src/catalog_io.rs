//! Reading the inputs of a run from disk

use anyhow::{Context, Result};
use std::path::Path;
use stepdefs_core::catalog::Catalog;
use tracing::info;

/// Loads the curated catalog from its JSON dump
pub async fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

    info!(
        path = %path.display(),
        modules = catalog.modules().count(),
        members = catalog.len(),
        "Loaded catalog"
    );
    Ok(catalog)
}

/// Reads the compiled game script
pub async fn load_script(path: &Path) -> Result<String> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    info!(path = %path.display(), bytes = source.len(), "Loaded script");
    Ok(source)
}
