//! Declaration module writer
//!
//! Every module of a [`CatalogExtension`] becomes one `<module>.d.ts` file that
//! declares the inferred steps inside `declare global { namespace ig { ... } }`.
//! The prose at the top of the matching module in the existing declaration
//! tree is carried over as the file header.

use anyhow::{ensure, Context, Result};
use futures::stream::{self, StreamExt};
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::Path;
use stepdefs_core::catalog::{CatalogExtension, MemberList, PathMap};
use tracing::{debug, info};

/// Directory of per-module declarations inside a declaration tree
pub const MODULES_DIR: &str = "modules";

/// File extension of a declaration module
pub const DECLARATION_EXTENSION: &str = "d.ts";

/// How many written modules had existing declarations to take a header from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Header taken from the prose before the first `export`
    pub with_declarations: usize,
    /// Header is the whole existing file, or empty when there was none
    pub without_declarations: usize,
}

impl WriteSummary {
    pub fn modules_written(&self) -> usize {
        self.with_declarations + self.without_declarations
    }
}

/// Splits existing module text into its header prose
///
/// Returns the trimmed text before the first `export` and `true`, or the whole
/// trimmed text and `false` when the module declares nothing.
pub fn header_prose(contents: &str) -> (String, bool) {
    match contents.find("export") {
        Some(index) => (contents[..index].trim().to_string(), true),
        None => (contents.trim().to_string(), false),
    }
}

fn declaration_file(dir: &Path, module: &str) -> std::path::PathBuf {
    dir.join(format!("{module}.{DECLARATION_EXTENSION}"))
}

async fn read_header(ultimate_dir: &Path, module: &str) -> Result<(String, bool)> {
    let path = declaration_file(&ultimate_dir.join(MODULES_DIR), module);
    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => Ok(header_prose(&contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(module = %module, "No existing declarations, writing without a header");
            Ok((String::new(), false))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Renders one declaration module
pub fn render_module(header: &str, entries: &PathMap) -> Result<String> {
    let mut out = String::new();
    out.push_str(header);
    out.push_str("\n\nexport {};\n\ndeclare global {\n  namespace ig {\n");

    let mut current_namespace: Option<&str> = None;
    for (index, (path, list)) in entries.iter().enumerate() {
        let segments: Vec<&str> = path.split('.').collect();
        ensure!(
            segments.len() == 3,
            "Assertion error: member path {path} does not have three segments"
        );
        ensure!(
            !list.parents.is_empty(),
            "Assertion error: member path {path} has no parents"
        );
        let (namespace, step) = (segments[1], segments[2]);

        if current_namespace != Some(namespace) {
            if current_namespace.is_some() {
                out.push_str("    }\n");
            }
            writeln!(out, "    namespace {namespace} {{")?;
            current_namespace = Some(namespace);
        }

        render_step(&mut out, path, step, list)?;
        if index + 1 != entries.len() {
            out.push_str("      \n");
        }
    }
    if current_namespace.is_some() {
        out.push_str("    }\n");
    }

    out.push_str("  }\n}");
    Ok(out)
}

fn render_step(out: &mut String, path: &str, step: &str, list: &MemberList) -> Result<()> {
    writeln!(out, "      namespace {step} {{")?;
    writeln!(out, "        interface Settings {{")?;
    for (name, option) in list.settings.iter().flatten() {
        writeln!(
            out,
            "          {name}{}: {};",
            optional_marker(option.is_optional),
            option.ty
        )?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "      }}")?;

    writeln!(
        out,
        "      interface {step} extends {} {{",
        list.parents.join(", ")
    )?;
    for (name, field) in &list.fields {
        writeln!(
            out,
            "        {name}{}: {};",
            optional_marker(field.is_optional),
            field.ty
        )?;
    }
    if !list.fields.is_empty() && !list.functions.is_empty() {
        out.push_str("        \n");
    }
    for (name, function) in &list.functions {
        let args = function
            .args
            .iter()
            .map(|arg| format!("{}{}: {}", arg.name, optional_marker(arg.is_optional), arg.ty))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "        {name}({args}): {};", function.return_type)?;
    }
    writeln!(out, "      }}")?;

    let sheet = if list.is_effect() {
        "sheet: ig.EffectSheet, "
    } else {
        ""
    };
    writeln!(
        out,
        "      interface {step}_CONSTRUCTOR extends ImpactClass<{step}> {{"
    )?;
    writeln!(out, "          new ({sheet}settings: {path}.Settings): {step};")?;
    writeln!(out, "      }}")?;
    writeln!(out, "      var {step}: {step}_CONSTRUCTOR;")?;
    Ok(())
}

fn optional_marker(is_optional: bool) -> &'static str {
    if is_optional {
        "?"
    } else {
        ""
    }
}

async fn write_module(
    module: &str,
    entries: &PathMap,
    out_dir: &Path,
    ultimate_dir: &Path,
) -> Result<bool> {
    let (header, has_declarations) = read_header(ultimate_dir, module).await?;
    let text = render_module(&header, entries)
        .with_context(|| format!("Failed to render module {module}"))?;

    let path = declaration_file(out_dir, module);
    tokio::fs::write(&path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(module = %module, steps = entries.len(), "Wrote declaration module");
    Ok(has_declarations)
}

/// Writes every module of `extension` into `out_dir`
///
/// At most `concurrency` modules are in flight at once. The first failing
/// module fails the whole write.
pub async fn write_extension(
    extension: &CatalogExtension,
    out_dir: &Path,
    ultimate_dir: &Path,
    concurrency: usize,
) -> Result<WriteSummary> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let results = stream::iter(extension.modules())
        .map(|(module, entries)| write_module(module, entries, out_dir, ultimate_dir))
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut summary = WriteSummary::default();
    for result in results {
        if result? {
            summary.with_declarations += 1;
        } else {
            summary.without_declarations += 1;
        }
    }

    info!(
        out_dir = %out_dir.display(),
        with_declarations = summary.with_declarations,
        without_declarations = summary.without_declarations,
        "Wrote declaration modules"
    );
    Ok(summary)
}
