//! JSON backend: the whole catalog as one machine-readable document, for
//! tooling that wants to do its own rendering.

use serde::Serialize;

use super::{Backend, BackendError, GENERATED_NOTICE, GenContext, GeneratedFile};
use crate::cardinality::Cardinality;
use crate::engine::Engine;
use crate::model::{Parameter, Query, QueryFile, Segment};
use crate::schema::Column;

pub const OUTPUT_FILE: &str = "queries.json";

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

#[derive(Serialize)]
struct Document<'a> {
    notice: &'static str,
    engine: Engine,
    files: Vec<FileEntry<'a>>,
}

#[derive(Serialize)]
struct FileEntry<'a> {
    path: Option<&'a str>,
    module: &'a str,
    queries: Vec<QueryEntry<'a>>,
}

#[derive(Serialize)]
struct QueryEntry<'a> {
    name: &'a str,
    cardinality: Cardinality,
    description: Option<&'a str>,
    parameters: Vec<ParameterEntry<'a>>,
    body: &'a str,
    segments: Vec<Segment<'a>>,
    /// `null` when the row shape is unknown or the query returns no rows.
    columns: Option<Vec<Column>>,
}

#[derive(Serialize)]
struct ParameterEntry<'a> {
    #[serde(flatten)]
    parameter: &'a Parameter,
    gate: bool,
    /// Only referenced inside fragments, so it may be omitted.
    optional: bool,
}

impl JsonBackend {
    fn file<'a>(ctx: &GenContext<'a>, file: &'a QueryFile) -> FileEntry<'a> {
        FileEntry {
            path: file.path(),
            module: file.module(),
            queries: file.queries().iter().map(|q| Self::query(ctx, q)).collect(),
        }
    }

    fn query<'a>(ctx: &GenContext<'a>, query: &'a Query) -> QueryEntry<'a> {
        QueryEntry {
            name: query.name(),
            cardinality: query.cardinality(),
            description: query.description(),
            parameters: query
                .parameters()
                .iter()
                .map(|parameter| ParameterEntry {
                    parameter,
                    gate: query.is_gate(&parameter.name),
                    optional: query.is_conditionally_live(&parameter.name),
                })
                .collect(),
            body: query.body(),
            segments: query.segments(),
            columns: ctx.columns(query),
        }
    }
}

impl Backend for JsonBackend {
    fn name(&self) -> &str {
        "json"
    }

    fn generate(&self, ctx: &GenContext<'_>) -> Result<Vec<GeneratedFile>, BackendError> {
        let document = Document {
            notice: GENERATED_NOTICE,
            engine: ctx.catalog.engine(),
            files: ctx
                .catalog
                .files()
                .iter()
                .map(|file| Self::file(ctx, file))
                .collect(),
        };
        let mut contents =
            serde_json::to_string_pretty(&document).map_err(|e| BackendError::Render {
                backend: "json".into(),
                query: String::new(),
                message: e.to_string(),
            })?;
        contents.push('\n');
        Ok(vec![GeneratedFile::new(OUTPUT_FILE, contents)])
    }
}
