//! Query IR: validated queries grouped by the file they came from.
//!
//! Built in full on every run by [`builder`] and never mutated afterwards.
//! Ranges inside a [`Query`] are relative to its body.

mod builder;
mod segments;
mod types;


use std::ops::Range;

use serde::Serialize;

use crate::SourceId;
use crate::cardinality::Cardinality;
use crate::engine::Engine;

pub(crate) use builder::{build_catalog, build_file};
pub use segments::Segment;
pub use types::ParamType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    pub description: String,
}

/// `:name` occurrence in a query body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub range: Range<usize>,
}

/// Body span included only when `gate` is true at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalFragment {
    pub gate: String,
    /// Everything removed when the fragment is excluded.
    pub span: Range<usize>,
    /// Whitespace kept in front of `content` when included.
    pub leading: Range<usize>,
    pub content: Range<usize>,
}

impl ConditionalFragment {
    pub fn contains(&self, offset: usize) -> bool {
        self.span.contains(&offset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub(crate) name: String,
    pub(crate) cardinality: Cardinality,
    pub(crate) description: Option<String>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) body: String,
    pub(crate) placeholders: Vec<Placeholder>,
    pub(crate) fragments: Vec<ConditionalFragment>,
    pub(crate) source: SourceId,
}

impl Query {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Placeholders in textual order, one entry per occurrence.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Fragments ordered by start offset. Never overlapping.
    pub fn fragments(&self) -> &[ConditionalFragment] {
        &self.fragments
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn is_gate(&self, name: &str) -> bool {
        self.fragments.iter().any(|f| f.gate == name)
    }

    /// Referenced as a placeholder only inside fragments, so it is bound
    /// only when one of those fragments is included.
    ///
    /// Gates are never conditionally live, even when they also appear as
    /// placeholders inside fragments: the caller always supplies them.
    pub fn is_conditionally_live(&self, name: &str) -> bool {
        if self.is_gate(name) {
            return false;
        }
        let mut uses = self.placeholders.iter().filter(|p| p.name == name).peekable();
        uses.peek().is_some()
            && uses.all(|p| self.fragments.iter().any(|f| f.contains(p.range.start)))
    }

    /// Lower the body for resolvers and backends.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        segments::lower(self)
    }
}

/// Valid queries of one file, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFile {
    pub(crate) source: SourceId,
    pub(crate) path: Option<String>,
    pub(crate) module: String,
    pub(crate) queries: Vec<Query>,
}

impl QueryFile {
    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Identifier-safe module name derived from the file stem.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn query(&self, name: &str) -> Option<&Query> {
        self.queries.iter().find(|q| q.name == name)
    }
}

/// Every file of one query group, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub(crate) engine: Engine,
    pub(crate) files: Vec<QueryFile>,
}

impl Catalog {
    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn files(&self) -> &[QueryFile] {
        &self.files
    }

    pub fn queries(&self) -> impl Iterator<Item = &Query> {
        self.files.iter().flat_map(|f| f.queries.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.queries().next().is_none()
    }
}
