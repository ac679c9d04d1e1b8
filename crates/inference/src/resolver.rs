//! Inheritance-aware member lookup over the catalog
//!
//! Member lists name their parents by path. A lookup starts from a synthetic
//! list whose only parent is the starting path and searches depth-first,
//! left to right, returning the first match. A parent with no owning module
//! ends the search of its list; parents after it are not visited.

use stepdefs_core::catalog::{Catalog, FieldType, FunctionSig, MemberList, IGNORED_PARENTS};
use stepdefs_core::error::{Error, Result};
use tracing::debug;

/// Longest parent chain followed before giving up
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Which member table a lookup searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Function,
}

/// A member found somewhere up the parent chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Member<'c> {
    Field(&'c FieldType),
    Function(&'c FunctionSig),
}

pub struct InheritanceResolver<'c> {
    catalog: &'c Catalog,
    max_depth: usize,
}

impl<'c> InheritanceResolver<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_max_depth(catalog, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(catalog: &'c Catalog, max_depth: usize) -> Self {
        Self { catalog, max_depth }
    }

    /// Looks `name` up starting from `start` (a base family or member path)
    ///
    /// Fails with [`Error::DepthLimit`] when the parent chain is deeper than
    /// the configured cap, which also catches cycles.
    pub fn resolve(&self, start: &str, kind: MemberKind, name: &str) -> Result<Option<Member<'c>>> {
        let synthetic = [start.to_string()];
        self.search_parents(&synthetic, kind, name, 1, start)
    }

    pub fn find_field(&self, start: &str, name: &str) -> Result<Option<&'c FieldType>> {
        Ok(match self.resolve(start, MemberKind::Field, name)? {
            Some(Member::Field(field)) => Some(field),
            _ => None,
        })
    }

    pub fn find_function(&self, start: &str, name: &str) -> Result<Option<&'c FunctionSig>> {
        Ok(match self.resolve(start, MemberKind::Function, name)? {
            Some(Member::Function(function)) => Some(function),
            _ => None,
        })
    }

    fn search_list(
        &self,
        list: &'c MemberList,
        kind: MemberKind,
        name: &str,
        depth: usize,
        origin: &str,
    ) -> Result<Option<Member<'c>>> {
        if depth >= self.max_depth {
            return Err(Error::depth_limit(origin, self.max_depth));
        }

        let own = match kind {
            MemberKind::Field => list.fields.get(name).map(Member::Field),
            MemberKind::Function => list.functions.get(name).map(Member::Function),
        };
        if own.is_some() {
            return Ok(own);
        }

        self.search_parents(&list.parents, kind, name, depth + 1, origin)
    }

    fn search_parents(
        &self,
        parents: &[String],
        kind: MemberKind,
        name: &str,
        depth: usize,
        origin: &str,
    ) -> Result<Option<Member<'c>>> {
        for parent in parents {
            if parent.is_empty() || IGNORED_PARENTS.contains(&parent.as_str()) {
                continue;
            }
            let Some(list) = self.catalog.member(parent) else {
                debug!(parent = %parent, origin = %origin, "Parent has no owning module");
                break;
            };
            if let Some(found) = self.search_list(list, kind, name, depth, origin)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
