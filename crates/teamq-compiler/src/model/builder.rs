//! Turns scanned blocks into validated queries.
//!
//! Every problem in a block is reported before the block is rejected, so a
//! run surfaces all validation errors at once.

use indexmap::{IndexMap, IndexSet};
use rowan::TextRange;

use teamq_core::utils::{is_identifier, sanitize_identifier, to_snake_case};

use super::{Catalog, ConditionalFragment, ParamType, Parameter, Placeholder, Query, QueryFile};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::engine::Engine;
use crate::scanner::{RawBlock, ScannedFile};
use crate::{Source, SourceId};

/// Identifiers no backend can use as a module name.
const RESERVED_MODULES: &[&str] = &["index", "runtime", "__init__"];

pub(crate) fn build_file(source: Source<'_>, file: ScannedFile, diag: &mut Diagnostics) -> QueryFile {
    let mut seen: IndexMap<String, TextRange> = IndexMap::new();
    let mut queries = Vec::new();

    for block in file.blocks {
        let mut errors = Diagnostics::new();

        if !is_identifier(&block.name) {
            errors
                .report(source.id, DiagnosticKind::InvalidQueryName, block.name_range)
                .message(&block.name)
                .emit();
        }
        if let Some(&first) = seen.get(&block.name) {
            errors
                .report(source.id, DiagnosticKind::DuplicateQuery, block.name_range)
                .message(&block.name)
                .related_to("first defined here", first)
                .emit();
        } else {
            seen.insert(block.name.clone(), block.name_range);
        }

        let query = build_query(source.id, block, &mut errors);
        let rejected = errors.has_errors();
        diag.extend(errors);

        match query {
            Some(query) if !rejected => {
                tracing::debug!(
                    query = %query.name,
                    cardinality = %query.cardinality,
                    params = query.parameters.len(),
                    fragments = query.fragments.len(),
                    "built query"
                );
                queries.push(query);
            }
            _ => tracing::debug!(source = source.kind.display_name(), "rejected query"),
        }
    }

    QueryFile {
        source: source.id,
        path: match source.kind {
            crate::SourceKind::File(path) => Some(path.clone()),
            crate::SourceKind::Inline => None,
        },
        module: module_name(source.stem()),
        queries,
    }
}

fn build_query(source: SourceId, block: RawBlock, diag: &mut Diagnostics) -> Option<Query> {
    let query_name = block.name.as_str();
    let mut declared: IndexMap<&str, (&ParamType, TextRange)> = IndexMap::new();
    let mut parameters = Vec::with_capacity(block.params.len());
    let types: Vec<ParamType> = block
        .params
        .iter()
        .map(|p| ParamType::parse(&p.type_name))
        .collect();

    for (raw, ty) in block.params.iter().zip(&types) {
        if let Some((_, first)) = declared.get(raw.name.as_str()) {
            diag.report(source, DiagnosticKind::DuplicateParameter, raw.name_range)
                .message(&raw.name)
                .related_to("first declared here", *first)
                .emit();
            continue;
        }
        if ty.is_custom() {
            tracing::warn!(query = query_name, param = %raw.name, ty = %ty, "unknown parameter type");
            diag.report(source, DiagnosticKind::UnknownParamType, raw.type_range)
                .message(&raw.type_name)
                .emit();
        }
        declared.insert(&raw.name, (ty, raw.type_range));
        parameters.push(Parameter {
            name: raw.name.clone(),
            ty: ty.clone(),
            description: raw.description.clone(),
        });
    }

    let mut referenced: IndexSet<&str> = IndexSet::new();
    for placeholder in &block.placeholders {
        let name = placeholder.name.as_str();
        if !declared.contains_key(name) && !referenced.contains(name) {
            diag.report(source, DiagnosticKind::UndeclaredParameter, placeholder.range)
                .message(format!(
                    "query `{query_name}` references undeclared parameter `{name}`"
                ))
                .emit();
        }
        referenced.insert(name);
    }

    for fragment in &block.fragments {
        let gate = fragment.gate.as_str();
        match declared.get(gate) {
            None => {
                diag.report(source, DiagnosticKind::UndeclaredParameter, fragment.gate_range)
                    .message(format!(
                        "query `{query_name}` gates a fragment on undeclared parameter `{gate}`"
                    ))
                    .emit();
            }
            Some((ty, type_range)) if !ty.is_bool() => {
                diag.report(source, DiagnosticKind::NonBooleanGate, fragment.gate_range)
                    .message(format!(
                        "fragment gate `{gate}` of query `{query_name}` is declared `{ty}`"
                    ))
                    .related_to("declared here", *type_range)
                    .emit();
            }
            Some(_) => {}
        }
        referenced.insert(gate);
    }

    for raw in &block.params {
        if !referenced.contains(raw.name.as_str()) {
            diag.report(source, DiagnosticKind::UnusedParameter, raw.name_range)
                .message(format!(
                    "parameter `{}` of query `{query_name}` is never referenced",
                    raw.name
                ))
                .emit();
        }
    }

    if diag.has_errors() {
        return None;
    }

    let base = block.body_offset;
    let relative = |range: TextRange| usize::from(range.start()) - base..usize::from(range.end()) - base;

    Some(Query {
        placeholders: block
            .placeholders
            .iter()
            .map(|p| Placeholder {
                name: p.name.clone(),
                range: relative(p.range),
            })
            .collect(),
        fragments: block
            .fragments
            .iter()
            .map(|f| ConditionalFragment {
                gate: f.gate.clone(),
                span: relative(f.span),
                leading: relative(f.leading),
                content: relative(f.content),
            })
            .collect(),
        name: block.name,
        cardinality: block.cardinality,
        description: block.description,
        parameters,
        body: block.body,
        source,
    })
}

/// Group files into a catalog, rejecting files whose module names collide.
pub(crate) fn build_catalog(engine: Engine, files: Vec<QueryFile>, diag: &mut Diagnostics) -> Catalog {
    let mut owners: IndexMap<String, Option<String>> = IndexMap::new();
    let mut kept = Vec::with_capacity(files.len());

    for file in files {
        if let Some(owner) = owners.get(&file.module) {
            let mut report = diag
                .report(file.source, DiagnosticKind::DuplicateModule, TextRange::empty(0.into()))
                .message(&file.module);
            if let Some(owner) = owner {
                report = report.hint(format!("also produced by `{owner}`"));
            }
            report.emit();
            continue;
        }
        owners.insert(file.module.clone(), file.path.clone());
        kept.push(file);
    }

    Catalog {
        engine,
        files: kept,
    }
}

fn module_name(stem: &str) -> String {
    sanitize_identifier(&to_snake_case(stem), RESERVED_MODULES)
}
