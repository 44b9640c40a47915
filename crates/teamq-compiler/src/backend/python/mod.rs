//! Python backend: a package with `runtime.py`, one module per query file,
//! and an `__init__.py` importing each module.
//!
//! Generated functions take a DB-API 2.0 connection and keyword-only
//! parameters.

mod emitter;
mod types;


use super::{Backend, BackendError, GENERATED_NOTICE, GenContext, GeneratedFile};
use crate::engine::Engine;
use emitter::Emitter;

const RUNTIME: &str = include_str!("runtime.py");

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonBackend;

impl PythonBackend {
    /// Driver paramstyle: `format` for psycopg and mysqlclient, `qmark` for sqlite3.
    fn marker(engine: Engine) -> &'static str {
        match engine {
            Engine::Postgres | Engine::Mysql => "%s",
            Engine::Sqlite => "?",
        }
    }
}

impl Backend for PythonBackend {
    fn name(&self) -> &str {
        "python"
    }

    fn generate(&self, ctx: &GenContext<'_>) -> Result<Vec<GeneratedFile>, BackendError> {
        let marker = Self::marker(ctx.catalog.engine());
        let mut files = vec![GeneratedFile::new("runtime.py", RUNTIME)];
        let mut modules = vec!["runtime"];

        for file in ctx.catalog.files() {
            let module = Emitter::new(ctx, file, marker).emit()?;
            files.push(GeneratedFile::new(format!("{}.py", file.module()), module));
            modules.push(file.module());
        }

        let mut init = format!("# {GENERATED_NOTICE}\n\n");
        for module in &modules {
            init.push_str(&format!("from . import {module}\n"));
        }
        let quoted: Vec<String> = modules.iter().map(|m| format!("\"{m}\"")).collect();
        init.push_str(&format!("\n__all__ = [{}]\n", quoted.join(", ")));

        files.push(GeneratedFile::new("__init__.py", init));
        Ok(files)
    }
}
