//! The `infer` and `generate` runs, shared by the binary and the tests

use crate::catalog_io::{load_catalog, load_script};
use crate::writer::{write_extension, WriteSummary};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stepdefs_core::config::Config;
use stepdefs_inference::{InferenceEngine, InferenceOutput};
use tracing::{info, warn};

/// Runs the engine over the configured script and catalog
pub async fn run_inference(config: &Config) -> Result<InferenceOutput> {
    let paths = &config.paths;
    let catalog = load_catalog(Path::new(&paths.typedefs)).await?;
    let script_path = PathBuf::from(&paths.game_compiled);
    let source = load_script(&script_path).await?;

    let engine = InferenceEngine::new(&catalog, config.inference.clone());
    let output = engine
        .infer(&source, &script_path)
        .with_context(|| format!("Inference failed for {}", script_path.display()))?;

    if output.diagnostics.syntax_errors {
        warn!(
            path = %script_path.display(),
            "Results may be incomplete because the script has syntax errors"
        );
    }
    info!(
        modules = output.extension.modules().count(),
        steps = output.extension.len(),
        "Inferred new step definitions"
    );
    Ok(output)
}

/// Full pipeline: inference followed by writing declaration modules
pub async fn generate(config: &Config) -> Result<(InferenceOutput, WriteSummary)> {
    let output = run_inference(config).await?;
    let summary = write_extension(
        &output.extension,
        Path::new(&config.paths.out_dir),
        Path::new(&config.paths.ultimate_typedefs),
        config.output.concurrent_writes,
    )
    .await?;
    Ok((output, summary))
}

/// Serializes an extension the way `infer` prints it
pub fn extension_json(output: &InferenceOutput) -> Result<String> {
    serde_json::to_string_pretty(&output.extension).context("Failed to serialize extension")
}
