use std::path::PathBuf;

use teamq_compiler::{CatalogBuilder, SourceMap};

use super::query_loader::load_query_files;

pub struct CheckArgs {
    pub paths: Vec<PathBuf>,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let mut sources = SourceMap::new();
    if let Err(msg) = load_query_files(&args.paths, &mut sources) {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    }

    let analyzed = CatalogBuilder::new(&sources).scan().analyze();
    let diagnostics = analyzed.diagnostics();
    let is_valid = if args.strict {
        !diagnostics.has_errors() && !diagnostics.has_warnings()
    } else {
        analyzed.is_valid()
    };

    if !diagnostics.is_empty() {
        eprint!("{}", diagnostics.render_colored(&sources, args.color));
    }
    if !is_valid {
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
