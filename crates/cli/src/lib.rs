//! Library interface for the stepdefs CLI
//!
//! This module exposes the pipeline for integration testing while keeping the
//! argument handling in main.rs.

pub mod catalog_io;
pub mod pipeline;
pub mod writer;

// Re-export commonly needed types for tests
pub use anyhow::Result;
pub use stepdefs_core::config::Config;
pub use writer::{render_module, write_extension, WriteSummary};
