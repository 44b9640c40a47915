//! Emits one TypeScript module per query file.

use indexmap::IndexMap;

use teamq_core::utils::{is_identifier, sanitize_identifier, to_camel_case, to_pascal_case};

use super::types::{RESERVED, ts_type};
use crate::backend::{BackendError, GENERATED_NOTICE, GenContext, string_literal};
use crate::cardinality::Cardinality;
use crate::model::{Query, QueryFile, Segment};

pub(super) struct Emitter<'a> {
    ctx: &'a GenContext<'a>,
    file: &'a QueryFile,
    style: &'static str,
    output: String,
}

struct Names {
    function: String,
    params: String,
    row: String,
    segments: String,
}

impl<'a> Emitter<'a> {
    pub(super) fn new(ctx: &'a GenContext<'a>, file: &'a QueryFile, style: &'static str) -> Self {
        Self {
            ctx,
            file,
            style,
            output: String::new(),
        }
    }

    pub(super) fn emit(mut self) -> Result<String, BackendError> {
        let names = self.assign_names()?;

        self.output.push_str(&format!("// {GENERATED_NOTICE}\n"));
        if let Some(path) = self.file.path() {
            self.output.push_str(&format!("// source: {path}\n"));
        }
        self.output.push('\n');

        let needs_one = self
            .file
            .queries()
            .iter()
            .any(|q| q.cardinality() == Cardinality::One);
        let imports = if needs_one {
            "type Queryable, type Segment, execute, expectOne, render"
        } else {
            "type Queryable, type Segment, execute, render"
        };
        self.output
            .push_str(&format!("import {{ {imports} }} from \"./runtime\";\n"));

        for (query, names) in self.file.queries().iter().zip(&names) {
            self.output.push('\n');
            self.emit_query(query, names);
        }

        Ok(self.output)
    }

    fn assign_names(&self) -> Result<Vec<Names>, BackendError> {
        let mut taken: IndexMap<String, &str> = IndexMap::new();
        let mut out = Vec::new();

        for query in self.file.queries() {
            let function = sanitize_identifier(&to_camel_case(query.name()), RESERVED);
            if let Some(other) = taken.insert(function.clone(), query.name()) {
                return Err(BackendError::Render {
                    backend: "typescript".into(),
                    query: query.name().into(),
                    message: format!("function name `{function}` is also used by `{other}`"),
                });
            }
            let pascal = to_pascal_case(query.name());
            out.push(Names {
                params: format!("{pascal}Params"),
                row: format!("{pascal}Row"),
                segments: format!("{function}Segments"),
                function,
            });
        }
        Ok(out)
    }

    fn emit_query(&mut self, query: &Query, names: &Names) {
        self.emit_params(query, names);
        if query.cardinality().returns_rows() {
            self.emit_row(query, names);
        }
        self.emit_segments(query, names);
        self.emit_function(query, names);
    }

    fn emit_params(&mut self, query: &Query, names: &Names) {
        if query.parameters().is_empty() {
            self.output
                .push_str(&format!("export type {} = Record<string, never>;\n\n", names.params));
            return;
        }

        self.output
            .push_str(&format!("export interface {} {{\n", names.params));
        for param in query.parameters() {
            if !param.description.is_empty() {
                self.output
                    .push_str(&format!("  /** {} */\n", doc_text(&param.description)));
            }
            let optional = if query.is_conditionally_live(&param.name) {
                "?"
            } else {
                ""
            };
            let nullable = if param.ty.is_bool() { "" } else { " | null" };
            self.output.push_str(&format!(
                "  {}{optional}: {}{nullable};\n",
                property(&param.name),
                ts_type(&param.ty)
            ));
        }
        self.output.push_str("}\n\n");
    }

    fn emit_row(&mut self, query: &Query, names: &Names) {
        let Some(columns) = self.ctx.columns(query) else {
            self.output.push_str(&format!(
                "export type {} = Record<string, unknown>;\n\n",
                names.row
            ));
            return;
        };

        self.output
            .push_str(&format!("export interface {} {{\n", names.row));
        for column in &columns {
            self.output.push_str(&format!(
                "  {}: {} | null;\n",
                property(&column.name),
                ts_type(&column.ty)
            ));
        }
        self.output.push_str("}\n\n");
    }

    fn emit_segments(&mut self, query: &Query, names: &Names) {
        self.output
            .push_str(&format!("const {}: Segment[] = [\n", names.segments));
        for segment in query.segments() {
            self.output
                .push_str(&format!("  {},\n", segment_literal(&segment)));
        }
        self.output.push_str("];\n\n");
    }

    fn emit_function(&mut self, query: &Query, names: &Names) {
        if let Some(description) = query.description() {
            self.output
                .push_str(&format!("/** {} */\n", doc_text(description)));
        }

        let returns = match query.cardinality() {
            Cardinality::One => names.row.clone(),
            Cardinality::Many => format!("{}[]", names.row),
            Cardinality::Exec => "number | null".to_string(),
        };
        let default = if query.parameters().is_empty() {
            " = {}"
        } else {
            ""
        };
        let query_name = string_literal(query.name());

        self.output.push_str(&format!(
            "export async function {}(\n  db: Queryable,\n  params: {}{default},\n): Promise<{returns}> {{\n",
            names.function, names.params
        ));
        self.output.push_str(&format!(
            "  const statement = render({query_name}, {}, params, \"{}\");\n",
            names.segments, self.style
        ));

        match query.cardinality() {
            Cardinality::One => {
                self.output.push_str(&format!(
                    "  const result = await execute<{}>(db, {query_name}, statement);\n",
                    names.row
                ));
                self.output
                    .push_str(&format!("  return expectOne({query_name}, result.rows);\n"));
            }
            Cardinality::Many => {
                self.output.push_str(&format!(
                    "  const result = await execute<{}>(db, {query_name}, statement);\n",
                    names.row
                ));
                self.output.push_str("  return result.rows;\n");
            }
            Cardinality::Exec => {
                self.output.push_str(&format!(
                    "  const result = await execute(db, {query_name}, statement);\n"
                ));
                self.output.push_str("  return result.rowCount ?? null;\n");
            }
        }
        self.output.push_str("}\n");
    }
}

fn segment_literal(segment: &Segment<'_>) -> String {
    match segment {
        Segment::Text { text } => format!("{{ text: {} }}", string_literal(text)),
        Segment::Param { name } => format!("{{ param: {} }}", string_literal(name)),
        Segment::Fragment { gate, parts } => {
            let parts: Vec<String> = parts.iter().map(segment_literal).collect();
            format!(
                "{{ gate: {}, parts: [{}] }}",
                string_literal(gate),
                parts.join(", ")
            )
        }
    }
}

fn property(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// Keep free text from closing the surrounding doc comment.
fn doc_text(text: &str) -> String {
    text.replace("*/", "*\\/")
}
