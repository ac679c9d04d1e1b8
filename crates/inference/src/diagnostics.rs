//! Counters and soft misses collected during one inference run

use serde::Serialize;
use tracing::info;

/// An option whose `_type` tag matched no heuristic rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedTag {
    pub path: String,
    pub setting: String,
    pub tag: String,
}

/// Accumulates what the walker saw, threaded through the run instead of globals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Module registrations whose body was scanned
    pub modules_scanned: usize,
    /// Class definitions extending a recognized base family
    pub classes_recognized: usize,
    /// Members skipped because the catalog already describes their path
    pub known_path_members: usize,
    /// Members skipped because an ancestor already declares them
    pub inherited_members: usize,
    /// Object literal members whose value is itself an object literal
    pub nested_objects: usize,
    /// Fields recorded from `init` assignments
    pub init_fields: usize,
    /// `init` assignments whose right-hand side matched no rule
    pub unmatched_init_assignments: usize,
    /// Option tags without a heuristic rule
    pub unrecognized_tags: Vec<UnrecognizedTag>,
    /// True when the parse tree contained syntax errors
    pub syntax_errors: bool,
}

impl Diagnostics {
    pub fn record_unrecognized_tag(&mut self, path: &str, setting: &str, tag: &str) {
        self.unrecognized_tags.push(UnrecognizedTag {
            path: path.to_string(),
            setting: setting.to_string(),
            tag: tag.to_string(),
        });
    }

    /// Writes a one-line summary to the log
    pub fn log_summary(&self) {
        info!(
            modules = self.modules_scanned,
            classes = self.classes_recognized,
            known_path_members = self.known_path_members,
            inherited_members = self.inherited_members,
            init_fields = self.init_fields,
            unmatched_init_assignments = self.unmatched_init_assignments,
            unrecognized_tags = self.unrecognized_tags.len(),
            "Inference finished"
        );
    }
}
