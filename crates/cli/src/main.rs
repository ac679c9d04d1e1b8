//! stepdefs CLI - step definition inference for compiled game scripts
//!
//! This binary provides the command-line interface for inferring missing step
//! definitions and writing them out as declaration modules.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use stepdefs::pipeline::{extension_json, generate, run_inference};
use stepdefs_core::config::{Config, PathsConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "stepdefs")]
#[command(about = "Infer step definitions missing from a type catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer new step definitions and write declaration modules
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Directory the declaration modules are written to
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Infer new step definitions and print them as JSON
    Infer {
        #[command(flatten)]
        inputs: InputArgs,

        /// Write the JSON to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        json_out: Option<PathBuf>,
    },
}

/// Input locations overriding the configuration file
#[derive(Args)]
struct InputArgs {
    /// Compiled game script
    #[arg(long, value_name = "FILE")]
    game: Option<PathBuf>,

    /// Catalog JSON dump
    #[arg(long, value_name = "FILE")]
    typedefs: Option<PathBuf>,

    /// Existing declaration tree to take module headers from
    #[arg(long, value_name = "DIR")]
    ultimate: Option<PathBuf>,
}

impl InputArgs {
    fn apply(self, paths: &mut PathsConfig) {
        if let Some(game) = self.game {
            paths.game_compiled = game.display().to_string();
        }
        if let Some(typedefs) = self.typedefs {
            paths.typedefs = typedefs.display().to_string();
        }
        if let Some(ultimate) = self.ultimate {
            paths.ultimate_typedefs = ultimate.display().to_string();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { inputs, out } => {
            inputs.apply(&mut config.paths);
            if let Some(out) = out {
                config.paths.out_dir = out.display().to_string();
            }
            config.validate()?;

            let (_, summary) = generate(&config).await?;
            info!(
                modules = summary.modules_written(),
                with_declarations = summary.with_declarations,
                without_declarations = summary.without_declarations,
                "Done"
            );
            Ok(())
        }
        Commands::Infer { inputs, json_out } => {
            inputs.apply(&mut config.paths);
            config.validate()?;

            let output = run_inference(&config).await?;
            let json = extension_json(&output)?;
            match json_out {
                Some(path) => tokio::fs::write(&path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "stepdefs_core={level},stepdefs_inference={level},{}={level}",
            env!("CARGO_PKG_NAME")
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
