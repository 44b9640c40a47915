use std::path::PathBuf;

use teamq_compiler::resolve::{ParamValues, PlaceholderStyle, resolve};
use teamq_compiler::{CatalogBuilder, Engine, SourceMap};

pub struct ResolveArgs {
    pub file: PathBuf,
    pub query: String,
    pub params: String,
    pub engine: String,
    pub color: bool,
}

pub fn run(args: ResolveArgs) {
    let content = std::fs::read_to_string(&args.file).unwrap_or_else(|e| {
        eprintln!("error: failed to read '{}': {}", args.file.display(), e);
        std::process::exit(1);
    });
    let mut sources = SourceMap::new();
    sources.add_file(&args.file.to_string_lossy(), &content);

    match resolve_to_json(&sources, &args.query, &args.params, &args.engine, args.color) {
        Ok(json) => println!("{}", json),
        Err(report) => {
            eprint!("{}", report);
            std::process::exit(1);
        }
    }
}

/// Resolve `query` and render the result as pretty JSON.
///
/// On failure, returns the full report to print: rendered diagnostics for
/// invalid files, otherwise a single `error:` line.
pub fn resolve_to_json(
    sources: &SourceMap,
    query: &str,
    params: &str,
    engine: &str,
    color: bool,
) -> Result<String, String> {
    let engine: Engine = engine.parse().map_err(|e| format!("error: {}\n", e))?;

    let analyzed = CatalogBuilder::new(sources)
        .with_engine(engine)
        .scan()
        .analyze();
    if !analyzed.is_valid() {
        return Err(analyzed.diagnostics().render_colored(sources, color));
    }

    let Some(found) = analyzed.catalog().queries().find(|q| q.name() == query) else {
        return Err(format!("error: no query named `{}`\n", query));
    };
    let values: ParamValues = serde_json::from_str(params)
        .map_err(|e| format!("error: --params is not a JSON object of values: {}\n", e))?;

    let resolved = resolve(found, &values, PlaceholderStyle::native(engine))
        .map_err(|e| format!("error: {}\n", e))?;
    serde_json::to_string_pretty(&resolved).map_err(|e| format!("error: {}\n", e))
}
