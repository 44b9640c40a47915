//! TypeScript backend: `runtime.ts`, one module per query file, and an
//! `index.ts` namespacing each module.
//!
//! Generated functions take any `Queryable`-shaped client (a `pg` pool,
//! client, or transaction) and a params object typed from the directives.

mod emitter;
mod types;

#[cfg(test)]
mod typescript_tests;

use super::{Backend, BackendError, GENERATED_NOTICE, GenContext, GeneratedFile};
use crate::engine::Engine;
use emitter::Emitter;

const RUNTIME: &str = include_str!("runtime.ts");

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptBackend;

impl TypeScriptBackend {
    fn style(engine: Engine) -> &'static str {
        match engine {
            Engine::Postgres => "dollar",
            Engine::Sqlite | Engine::Mysql => "question",
        }
    }
}

impl Backend for TypeScriptBackend {
    fn name(&self) -> &str {
        "typescript"
    }

    fn generate(&self, ctx: &GenContext<'_>) -> Result<Vec<GeneratedFile>, BackendError> {
        let style = Self::style(ctx.catalog.engine());
        let mut files = vec![GeneratedFile::new("runtime.ts", RUNTIME)];
        let mut index = format!("// {GENERATED_NOTICE}\n\nexport * from \"./runtime\";\n");

        for file in ctx.catalog.files() {
            let module = Emitter::new(ctx, file, style).emit()?;
            files.push(GeneratedFile::new(format!("{}.ts", file.module()), module));
            index.push_str(&format!(
                "export * as {0} from \"./{0}\";\n",
                file.module()
            ));
        }

        files.push(GeneratedFile::new("index.ts", index));
        Ok(files)
    }
}
