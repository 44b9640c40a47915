//! Test utilities.

use crate::model::{Catalog, Query};
use crate::{CatalogBuilder, SourceMap};

impl Catalog {
    /// Build from one inline source, panicking with rendered diagnostics on error.
    pub fn expect_valid(src: &str) -> Catalog {
        let sources = SourceMap::inline(src);
        let analyzed = CatalogBuilder::new(&sources).scan().analyze();
        if !analyzed.is_valid() {
            panic!(
                "expected valid queries, got:\n{}",
                analyzed.diagnostics().render(&sources)
            );
        }
        analyzed.catalog().clone()
    }

    /// Build from one inline source, returning rendered diagnostics.
    pub fn expect_invalid(src: &str) -> String {
        let sources = SourceMap::inline(src);
        let analyzed = CatalogBuilder::new(&sources).scan().analyze();
        if analyzed.is_valid() {
            panic!("expected invalid queries, got a valid catalog");
        }
        analyzed.diagnostics().render(&sources)
    }
}

impl Query {
    /// The first query of a valid inline source.
    pub fn expect(src: &str) -> Query {
        let catalog = Catalog::expect_valid(src);
        catalog
            .queries()
            .next()
            .cloned()
            .expect("source has no queries")
    }
}
