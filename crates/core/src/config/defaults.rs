//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_GAME_COMPILED: &str = "game.compiled.js";
pub(crate) const DEFAULT_TYPEDEFS: &str = "typedefs.json";
pub(crate) const DEFAULT_ULTIMATE_TYPEDEFS: &str = "ultimate-crosscode-typedefs";
pub(crate) const DEFAULT_OUT_DIR: &str = "../out";
pub(crate) const DEFAULT_MODULE_MARKER: &str = "ig.module";
pub(crate) const DEFAULT_DEFINES_MARKER: &str = "defines";

pub(crate) fn default_game_compiled() -> String {
    DEFAULT_GAME_COMPILED.to_string()
}

pub(crate) fn default_typedefs() -> String {
    DEFAULT_TYPEDEFS.to_string()
}

pub(crate) fn default_ultimate_typedefs() -> String {
    DEFAULT_ULTIMATE_TYPEDEFS.to_string()
}

pub(crate) fn default_out_dir() -> String {
    DEFAULT_OUT_DIR.to_string()
}

pub(crate) fn default_init_field_inference() -> bool {
    true
}

pub(crate) fn default_default_implies_optional() -> bool {
    true
}

pub(crate) fn default_module_marker() -> String {
    DEFAULT_MODULE_MARKER.to_string()
}

pub(crate) fn default_defines_marker() -> String {
    DEFAULT_DEFINES_MARKER.to_string()
}

pub(crate) fn default_root_scan_depth() -> usize {
    6
}

pub(crate) fn default_max_parent_depth() -> usize {
    100
}

pub(crate) fn default_concurrent_writes() -> usize {
    16
}
