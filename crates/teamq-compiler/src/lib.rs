//! teamq compiler: turns annotated SQL files into typed query functions.
//!
//! This crate provides the compilation pipeline:
//! - `scanner` - directive scanning, placeholder and fragment markers
//! - `model` - validated query IR and its lowering into segments
//! - `resolve` - the call-time fragment resolver
//! - `backend` - backend registry, dispatch, and the built-in generators
//! - `compile` - the entry operation tying it all together
//!
//! # Example
//!
//! ```
//! use teamq_compiler::{CatalogBuilder, SourceMap};
//!
//! let sources = SourceMap::inline("-- name: GetAuthor :one\n-- param: id int\nSELECT * FROM authors WHERE id = :id");
//! let analyzed = CatalogBuilder::new(&sources).scan().analyze();
//! assert!(analyzed.is_valid(), "{}", analyzed.diagnostics().render(&sources));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod backend;
pub mod cardinality;
pub mod compile;
pub mod diagnostics;
pub mod engine;
pub mod model;
pub mod resolve;
pub mod scanner;
pub mod schema;
mod source_map;
mod stages;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod cardinality_tests;

pub use backend::{BackendFailures, BackendRegistry, Target};
pub use cardinality::Cardinality;
pub use compile::{CompileReport, QueryGroup, compile};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use engine::Engine;
pub use model::{Catalog, Query};
pub use source_map::{Source, SourceId, SourceKind, SourceMap};
pub use stages::{CatalogAnalyzed, CatalogBuilder, CatalogScanned};

/// Errors that stop a compilation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("query validation failed with {} errors", .0.error_count())]
    InvalidQueries(Diagnostics),

    #[error(transparent)]
    Backends(#[from] BackendFailures),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
