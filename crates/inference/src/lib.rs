//! Step definition inference over compiled game scripts
//!
//! Scans a compiled JavaScript bundle for classes extending one of the step
//! base families and infers field, method and option types for the ones the
//! curated catalog does not describe yet.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod walker;

pub mod classifier;
pub mod common;
pub mod diagnostics;
pub mod engine;
pub mod heuristics;
pub mod resolver;

pub use diagnostics::{Diagnostics, UnrecognizedTag};
pub use engine::{parse_script, InferenceEngine, InferenceOutput};
pub use resolver::{InheritanceResolver, Member, MemberKind};
