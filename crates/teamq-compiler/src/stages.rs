//! Staged construction of a [`Catalog`]: scan every file, then build and
//! validate queries.

use crate::diagnostics::Diagnostics;
use crate::engine::Engine;
use crate::model::{Catalog, build_catalog, build_file};
use crate::scanner::{ScannedFile, scan};
use crate::{Error, Result, SourceId, SourceMap};

pub struct CatalogBuilder<'s> {
    sources: &'s SourceMap,
    ids: Vec<SourceId>,
    engine: Engine,
}

impl<'s> CatalogBuilder<'s> {
    /// Builder over every source in `sources`.
    pub fn new(sources: &'s SourceMap) -> Self {
        Self {
            sources,
            ids: sources.ids().collect(),
            engine: Engine::default(),
        }
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Restrict the catalog to `ids`, in the given order.
    pub fn with_sources(mut self, ids: impl IntoIterator<Item = SourceId>) -> Self {
        self.ids = ids.into_iter().collect();
        self
    }

    pub fn scan(self) -> CatalogScanned<'s> {
        let mut diag = Diagnostics::new();
        let files = self
            .ids
            .iter()
            .map(|&id| scan(self.sources.get(id), &mut diag))
            .collect();

        CatalogScanned {
            sources: self.sources,
            engine: self.engine,
            files,
            diag,
        }
    }
}

#[derive(Debug)]
pub struct CatalogScanned<'s> {
    sources: &'s SourceMap,
    engine: Engine,
    files: Vec<ScannedFile>,
    diag: Diagnostics,
}

impl<'s> CatalogScanned<'s> {
    pub fn is_valid(&self) -> bool {
        !self.diag.has_errors()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    pub fn files(&self) -> &[ScannedFile] {
        &self.files
    }

    /// Build queries from every file that scanned cleanly.
    pub fn analyze(mut self) -> CatalogAnalyzed {
        let mut built = Vec::with_capacity(self.files.len());
        for file in self.files {
            if file.aborted {
                continue;
            }
            let source = self.sources.get(file.source);
            built.push(build_file(source, file, &mut self.diag));
        }
        let catalog = build_catalog(self.engine, built, &mut self.diag);

        CatalogAnalyzed {
            catalog,
            diag: self.diag,
        }
    }
}

#[derive(Debug)]
pub struct CatalogAnalyzed {
    catalog: Catalog,
    diag: Diagnostics,
}

impl CatalogAnalyzed {
    pub fn is_valid(&self) -> bool {
        !self.diag.has_errors()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Errors and warnings from both stages.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    /// The catalog, or every diagnostic if any stage reported an error.
    ///
    /// Warnings are dropped on success; read them through
    /// [`diagnostics`](Self::diagnostics) first.
    pub fn into_catalog(self) -> Result<Catalog> {
        if self.diag.has_errors() {
            return Err(Error::InvalidQueries(self.diag));
        }
        Ok(self.catalog)
    }
}
