//! Source storage for query compilation.
//!
//! Stores sources as owned strings, providing a simple interface for
//! multi-file compilation runs.

use std::path::Path;

/// Lightweight handle to a source in a compilation run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct SourceId(pub(crate) u32);

/// Describes the origin of a source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceKind {
    /// Query text passed directly (tests, `resolve` one-offs).
    Inline,
    /// A query file with its path.
    File(String),
}

impl SourceKind {
    /// Returns the display name for diagnostics.
    pub fn display_name(&self) -> &str {
        match self {
            SourceKind::Inline => "<inline>",
            SourceKind::File(path) => path,
        }
    }
}

/// A borrowed view of a source: id, kind, and content.
#[derive(Clone, Copy, Debug)]
pub struct Source<'s> {
    pub id: SourceId,
    pub kind: &'s SourceKind,
    pub content: &'s str,
}

impl<'s> Source<'s> {
    pub fn as_str(&self) -> &'s str {
        self.content
    }

    /// Module name derived from the file stem (`queries/blog-posts.sql` → `blog-posts`).
    ///
    /// Inline sources are named `queries`.
    pub fn stem(&self) -> &'s str {
        match self.kind {
            SourceKind::Inline => "queries",
            SourceKind::File(path) => Path::new(path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("queries"),
        }
    }
}

#[derive(Clone, Debug)]
struct SourceEntry {
    kind: SourceKind,
    content: String,
}

/// Registry of all sources.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    entries: Vec<SourceEntry>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inline source.
    pub fn add_inline(&mut self, content: &str) -> SourceId {
        self.push_entry(SourceKind::Inline, content)
    }

    /// Add a file source with its path.
    pub fn add_file(&mut self, path: &str, content: &str) -> SourceId {
        self.push_entry(SourceKind::File(path.to_owned()), content)
    }

    /// Create a SourceMap with a single inline source.
    pub fn inline(content: &str) -> Self {
        let mut map = Self::new();
        map.add_inline(content);
        map
    }

    pub fn content(&self, id: SourceId) -> &str {
        &self.entry(id).content
    }

    pub fn kind(&self, id: SourceId) -> &SourceKind {
        &self.entry(id).kind
    }

    /// Get the file path if this source is a file, None otherwise.
    pub fn path(&self, id: SourceId) -> Option<&str> {
        match &self.entry(id).kind {
            SourceKind::File(path) => Some(path),
            SourceKind::Inline => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: SourceId) -> Source<'_> {
        let entry = self.entry(id);
        Source {
            id,
            kind: &entry.kind,
            content: &entry.content,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        (0..self.entries.len()).map(|idx| SourceId(idx as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = Source<'_>> {
        self.entries.iter().enumerate().map(|(idx, entry)| Source {
            id: SourceId(idx as u32),
            kind: &entry.kind,
            content: &entry.content,
        })
    }

    fn entry(&self, id: SourceId) -> &SourceEntry {
        self.entries
            .get(id.0 as usize)
            .unwrap_or_else(|| panic!("SourceMap: {id:?} was not issued by this map"))
    }

    fn push_entry(&mut self, kind: SourceKind, content: &str) -> SourceId {
        let id = SourceId(self.entries.len() as u32);
        self.entries.push(SourceEntry {
            kind,
            content: content.to_owned(),
        });
        id
    }
}
