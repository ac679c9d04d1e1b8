//! Core types for stepdefs
//!
//! This crate provides the foundational pieces shared by the inference engine
//! and the command-line front end:
//!
//! - **Catalog**: curated type information and the additive extension produced by inference
//! - **Configuration**: layered TOML/environment configuration
//! - **Error handling**: unified error types

pub mod catalog;
pub mod config;
pub mod error;

// Re-export main types for convenience
pub use catalog::{
    BaseFamily, Catalog, CatalogExtension, FieldType, FunctionArg, FunctionSig, MemberList,
    ModuleMap, OptionType, PathMap, IGNORED_PARENTS, UNKNOWN_TYPE, VOID_TYPE,
};
pub use config::{Config, InferenceConfig, OutputConfig, PathsConfig};
pub use error::{ensure, Error, Result, ResultExt};
