//! Emits one Python module per query file.

use indexmap::IndexMap;

use teamq_core::utils::{is_identifier, sanitize_identifier, to_pascal_case, to_snake_case};

use super::types::{RESERVED, py_type, uses_datetime};
use crate::backend::{BackendError, GENERATED_NOTICE, GenContext, string_literal};
use crate::cardinality::Cardinality;
use crate::model::{Parameter, Query, QueryFile, Segment};
use crate::schema::Column;

pub(super) struct Emitter<'a> {
    ctx: &'a GenContext<'a>,
    file: &'a QueryFile,
    marker: &'static str,
    output: String,
}

struct Plan<'q> {
    query: &'q Query,
    function: String,
    segments: String,
    row: Option<(String, Vec<Column>)>,
}

impl<'a> Emitter<'a> {
    pub(super) fn new(ctx: &'a GenContext<'a>, file: &'a QueryFile, marker: &'static str) -> Self {
        Self {
            ctx,
            file,
            marker,
            output: String::new(),
        }
    }

    pub(super) fn emit(mut self) -> Result<String, BackendError> {
        let plans = self.plan()?;

        self.output.push_str(&format!("# {GENERATED_NOTICE}\n"));
        if let Some(path) = self.file.path() {
            self.output.push_str(&format!("# source: {path}\n"));
        }
        self.output.push_str("\nfrom __future__ import annotations\n\n");
        self.emit_imports(&plans);

        for plan in &plans {
            self.output.push_str("\n\n");
            self.emit_query(plan);
        }

        Ok(self.output)
    }

    fn plan(&self) -> Result<Vec<Plan<'a>>, BackendError> {
        let mut taken: IndexMap<String, &str> = IndexMap::new();
        let mut plans = Vec::new();

        for query in self.file.queries() {
            let function = sanitize_identifier(&to_snake_case(query.name()), RESERVED);
            if let Some(other) = taken.insert(function.clone(), query.name()) {
                return Err(BackendError::Render {
                    backend: "python".into(),
                    query: query.name().into(),
                    message: format!("function name `{function}` is also used by `{other}`"),
                });
            }
            let row = self
                .ctx
                .columns(query)
                .map(|columns| (format!("{}Row", to_pascal_case(query.name())), columns));
            plans.push(Plan {
                query,
                segments: format!("_{}_SEGMENTS", function.trim_start_matches('_').to_ascii_uppercase()),
                function,
                row,
            });
        }
        Ok(plans)
    }

    fn emit_imports(&mut self, plans: &[Plan<'_>]) {
        let datetime = plans.iter().any(|plan| {
            plan.query.parameters().iter().any(|p| uses_datetime(&p.ty))
                || plan
                    .row
                    .iter()
                    .flat_map(|(_, columns)| columns)
                    .any(|c| uses_datetime(&c.ty))
        });
        if datetime {
            self.output.push_str("import datetime\n");
        }

        let typed_dict = plans.iter().any(|plan| plan.row.is_some());
        self.output.push_str(if typed_dict {
            "from typing import Any, TypedDict\n\n"
        } else {
            "from typing import Any\n\n"
        });

        let mut runtime = Vec::new();
        if plans
            .iter()
            .any(|plan| plan.query.parameters().iter().any(|p| plan.query.is_conditionally_live(&p.name)))
        {
            runtime.push("MISSING");
        }
        runtime.push("Segment");
        for (cardinality, helper) in [
            (Cardinality::Exec, "execute_affected"),
            (Cardinality::Many, "fetch_many"),
            (Cardinality::One, "fetch_one"),
        ] {
            if plans.iter().any(|plan| plan.query.cardinality() == cardinality) {
                runtime.push(helper);
            }
        }
        runtime.push("render");
        self.output
            .push_str(&format!("from .runtime import {}\n", runtime.join(", ")));
    }

    fn emit_query(&mut self, plan: &Plan<'_>) {
        if let Some((name, columns)) = &plan.row {
            self.emit_row(name, columns);
        }

        self.output
            .push_str(&format!("{}: list[Segment] = [\n", plan.segments));
        for segment in plan.query.segments() {
            self.output
                .push_str(&format!("    {},\n", segment_literal(&segment)));
        }
        self.output.push_str("]\n\n\n");

        self.emit_function(plan);
    }

    fn emit_row(&mut self, name: &str, columns: &[Column]) {
        let fields_are_names = columns
            .iter()
            .all(|c| is_identifier(&c.name) && !RESERVED.contains(&c.name.as_str()));

        if fields_are_names {
            self.output.push_str(&format!("class {name}(TypedDict):\n"));
            if columns.is_empty() {
                self.output.push_str("    pass\n");
            }
            for column in columns {
                self.output.push_str(&format!(
                    "    {}: {} | None\n",
                    column.name,
                    py_type(&column.ty)
                ));
            }
        } else {
            // Class syntax cannot declare these keys.
            self.output
                .push_str(&format!("{name} = TypedDict(\n    \"{name}\",\n    {{\n"));
            for column in columns {
                self.output.push_str(&format!(
                    "        {}: \"{} | None\",\n",
                    string_literal(&column.name),
                    py_type(&column.ty)
                ));
            }
            self.output.push_str("    },\n)\n");
        }
        self.output.push_str("\n\n");
    }

    fn emit_function(&mut self, plan: &Plan<'_>) {
        let query = plan.query;
        let returns = match (query.cardinality(), &plan.row) {
            (Cardinality::One, Some((row, _))) => row.clone(),
            (Cardinality::One, None) => "dict[str, Any]".to_string(),
            (Cardinality::Many, Some((row, _))) => format!("list[{row}]"),
            (Cardinality::Many, None) => "list[dict[str, Any]]".to_string(),
            (Cardinality::Exec, _) => "int | None".to_string(),
        };

        if query.parameters().is_empty() {
            self.output.push_str(&format!(
                "def {}(conn: Any) -> {returns}:\n",
                plan.function
            ));
        } else {
            self.output
                .push_str(&format!("def {}(\n    conn: Any,\n    *,\n", plan.function));
            for param in query.parameters() {
                self.output
                    .push_str(&format!("    {},\n", keyword_argument(query, param)));
            }
            self.output.push_str(&format!(") -> {returns}:\n"));
        }

        self.emit_docstring(query);

        if query.parameters().is_empty() {
            self.output.push_str("    params: dict[str, Any] = {}\n");
        } else {
            self.output.push_str("    params = {\n");
            for param in query.parameters() {
                self.output.push_str(&format!(
                    "        {}: {},\n",
                    string_literal(&param.name),
                    sanitize_identifier(&param.name, RESERVED)
                ));
            }
            self.output.push_str("    }\n");
        }

        let name = string_literal(query.name());
        self.output.push_str(&format!(
            "    statement = render({name}, {}, params, {})\n",
            plan.segments,
            string_literal(self.marker)
        ));
        let helper = match query.cardinality() {
            Cardinality::One => "fetch_one",
            Cardinality::Many => "fetch_many",
            Cardinality::Exec => "execute_affected",
        };
        self.output
            .push_str(&format!("    return {helper}(conn, {name}, statement)\n"));
    }

    fn emit_docstring(&mut self, query: &Query) {
        let documented: Vec<&Parameter> = query
            .parameters()
            .iter()
            .filter(|p| !p.description.is_empty())
            .collect();
        if query.description().is_none() && documented.is_empty() {
            return;
        }

        let mut lines = Vec::new();
        if let Some(description) = query.description() {
            lines.push(doc_text(description));
        }
        if !documented.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("Args:".to_string());
            for param in documented {
                lines.push(format!(
                    "    {}: {}",
                    sanitize_identifier(&param.name, RESERVED),
                    doc_text(&param.description)
                ));
            }
        }

        if lines.len() == 1 {
            self.output
                .push_str(&format!("    \"\"\"{}\"\"\"\n", lines[0]));
            return;
        }
        self.output.push_str(&format!("    \"\"\"{}\n", lines[0]));
        for line in &lines[1..] {
            if line.is_empty() {
                self.output.push('\n');
            } else {
                self.output.push_str(&format!("    {line}\n"));
            }
        }
        self.output.push_str("    \"\"\"\n");
    }
}

fn keyword_argument(query: &Query, param: &Parameter) -> String {
    let name = sanitize_identifier(&param.name, RESERVED);
    let ty = py_type(&param.ty);
    let annotation = if param.ty.is_bool() {
        ty
    } else {
        format!("{ty} | None")
    };
    if query.is_conditionally_live(&param.name) {
        format!("{name}: {annotation} = MISSING")
    } else {
        format!("{name}: {annotation}")
    }
}

fn segment_literal(segment: &Segment<'_>) -> String {
    match segment {
        Segment::Text { text } => format!("{{\"text\": {}}}", string_literal(text)),
        Segment::Param { name } => format!("{{\"param\": {}}}", string_literal(name)),
        Segment::Fragment { gate, parts } => {
            let parts: Vec<String> = parts.iter().map(segment_literal).collect();
            format!(
                "{{\"gate\": {}, \"parts\": [{}]}}",
                string_literal(gate),
                parts.join(", ")
            )
        }
    }
}

/// Keep free text from closing the surrounding docstring.
fn doc_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}
