//! The compiler's entry operation: validate every query group, then run
//! each group's targets.

use std::path::PathBuf;

use crate::backend::{BackendFailures, BackendRegistry, OutputClaims, Target, dispatch_claimed};
use crate::diagnostics::Diagnostics;
use crate::engine::Engine;
use crate::schema::SchemaLookup;
use crate::stages::CatalogBuilder;
use crate::{Error, Result, SourceId, SourceMap};

/// Query files that share an engine and a set of generation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryGroup {
    pub engine: Engine,
    pub sources: Vec<SourceId>,
    pub targets: Vec<Target>,
}

impl QueryGroup {
    pub fn new(engine: Engine, sources: impl IntoIterator<Item = SourceId>) -> Self {
        Self {
            engine,
            sources: sources.into_iter().collect(),
            targets: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Default)]
pub struct CompileReport {
    /// Advisory diagnostics (unknown parameter types).
    pub warnings: Diagnostics,
    /// Every file written, in target order.
    pub written: Vec<PathBuf>,
}

/// Compile every group and run its targets.
///
/// All groups are scanned and validated before any backend runs; if any
/// reports an error, nothing is written and every diagnostic is returned.
/// Backend failures are collected across groups. Output directories are
/// claimed across groups too: a target whose directory equals, contains, or
/// sits inside an earlier target's fails with `OutputConflict`.
pub fn compile(
    sources: &SourceMap,
    groups: &[QueryGroup],
    registry: &BackendRegistry,
    schema: &dyn SchemaLookup,
) -> Result<CompileReport> {
    let mut diag = Diagnostics::new();
    let mut catalogs = Vec::with_capacity(groups.len());

    for group in groups {
        let analyzed = CatalogBuilder::new(sources)
            .with_engine(group.engine)
            .with_sources(group.sources.iter().copied())
            .scan()
            .analyze();
        diag.extend(analyzed.diagnostics().clone());
        catalogs.push(analyzed.catalog().clone());
    }

    if diag.has_errors() {
        tracing::warn!(errors = diag.error_count(), "queries are invalid, nothing generated");
        return Err(Error::InvalidQueries(diag));
    }

    let mut report = CompileReport {
        warnings: diag,
        written: Vec::new(),
    };
    let mut failures = BackendFailures::default();
    // Shared by every group: two groups must not write into one directory.
    let mut claims = OutputClaims::new();

    for (group, catalog) in groups.iter().zip(&catalogs) {
        tracing::debug!(
            engine = %group.engine,
            queries = catalog.queries().count(),
            targets = group.targets.len(),
            "dispatching group"
        );
        match dispatch_claimed(catalog, &group.targets, registry, schema, &mut claims) {
            Ok(written) => report.written.extend(written),
            Err(group_failures) => failures.extend(group_failures),
        }
    }

    if !failures.is_empty() {
        return Err(Error::Backends(failures));
    }
    Ok(report)
}
