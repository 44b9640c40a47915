//! Code generation backends and the table that selects them.
//!
//! A backend is a pure function from the validated catalog to a set of
//! files. Writing them out is [`dispatch`]'s job, so a backend never touches
//! the filesystem and never sees another backend's output.

mod dispatch;
mod json;
mod python;
mod typescript;


use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::model::{Catalog, Query};
use crate::schema::{Column, SchemaLookup, infer_columns};

pub use dispatch::{BackendFailures, OutputClaims, TargetFailure, dispatch, dispatch_claimed};
pub use json::JsonBackend;
pub use python::PythonBackend;
pub use typescript::TypeScriptBackend;

/// First line of every generated file, in the target's comment syntax.
pub const GENERATED_NOTICE: &str = "Code generated by teamq. DO NOT EDIT.";

/// Built-in backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    TypeScript,
    Python,
    Json,
}

impl BackendId {
    pub const ALL: [BackendId; 3] = [BackendId::TypeScript, BackendId::Python, BackendId::Json];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "typescript" | "ts" => Ok(Self::TypeScript),
            "python" | "py" => Ok(Self::Python),
            "json" => Ok(Self::Json),
            _ => Err(BackendError::UnknownBackend {
                name: s.to_string(),
            }),
        }
    }
}

/// Everything a backend sees.
#[derive(Clone, Copy)]
pub struct GenContext<'a> {
    pub catalog: &'a Catalog,
    pub schema: &'a dyn SchemaLookup,
}

impl<'a> GenContext<'a> {
    pub fn new(catalog: &'a Catalog, schema: &'a dyn SchemaLookup) -> Self {
        Self { catalog, schema }
    }

    /// Inferred row shape, if the schema lookup can tell.
    pub fn columns(&self, query: &Query) -> Option<Vec<Column>> {
        infer_columns(query, self.schema)
    }
}

/// A rendered file, relative to the target's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// A code generator for one target ecosystem.
pub trait Backend {
    /// Identifier used in configuration (`plugin: <name>`).
    fn name(&self) -> &str;

    fn generate(&self, ctx: &GenContext<'_>) -> Result<Vec<GeneratedFile>, BackendError>;
}

/// One configured generation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub backend: String,
    pub out: PathBuf,
}

impl Target {
    pub fn new(backend: impl Into<String>, out: impl Into<PathBuf>) -> Self {
        Self {
            backend: backend.into(),
            out: out.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("unknown backend `{name}`")]
    UnknownBackend { name: String },

    #[error("cannot write `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "output directory `{}` overlaps `{}`, the output of the `{owner}` target",
        path.display(),
        claimed.display()
    )]
    OutputConflict {
        path: PathBuf,
        claimed: PathBuf,
        owner: String,
    },

    #[error("refusing to replace `{}`: it exists and was not generated by teamq", path.display())]
    UnmanagedOutput { path: PathBuf },

    #[error("{backend} backend cannot render query `{query}`: {message}")]
    Render {
        backend: String,
        query: String,
        message: String,
    },
}

/// Backends available to one run, keyed by name.
pub struct BackendRegistry {
    backends: IndexMap<String, Box<dyn Backend>>,
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self {
            backends: IndexMap::new(),
        }
    }

    /// Registry with every built-in backend.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for id in BackendId::ALL {
            registry.register(builtin(id));
        }
        registry
    }

    /// Add `backend`, replacing any backend of the same name.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        self.backends.insert(backend.name().to_string(), backend);
    }

    pub fn get(&self, name: &str) -> Result<&dyn Backend, BackendError> {
        let key = match name.parse::<BackendId>() {
            Ok(id) if !self.backends.contains_key(name) => id.as_str(),
            _ => name,
        };
        self.backends
            .get(key)
            .map(|b| b.as_ref())
            .ok_or_else(|| BackendError::UnknownBackend {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin(id: BackendId) -> Box<dyn Backend> {
    match id {
        BackendId::TypeScript => Box::new(TypeScriptBackend),
        BackendId::Python => Box::new(PythonBackend),
        BackendId::Json => Box::new(JsonBackend),
    }
}

/// Quote `text` as a string literal every target language accepts.
pub(crate) fn string_literal(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
