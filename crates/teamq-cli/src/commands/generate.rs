use std::path::PathBuf;

use teamq_compiler::{BackendRegistry, Error, QueryGroup, SourceMap, Target, compile};
use teamq_core::Colors;

use super::config::Config;
use super::query_loader::load_query_files;

pub struct GenerateArgs {
    pub config: PathBuf,
    pub color: bool,
}

pub fn run(args: GenerateArgs) {
    let colors = Colors::new(args.color);
    let config = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    if let Some(project) = &config.project {
        tracing::info!(project = %project.name, groups = config.sql.len(), "generating");
    }

    let mut sources = SourceMap::new();
    let mut groups = Vec::with_capacity(config.sql.len());
    for group in &config.sql {
        let ids = load_query_files(&group.queries, &mut sources).unwrap_or_else(|msg| {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        });
        groups.push(QueryGroup {
            engine: group.engine,
            sources: ids,
            targets: group
                .targets
                .iter()
                .map(|t| Target::new(&t.plugin, &t.out))
                .collect(),
        });
    }

    let registry = BackendRegistry::builtin();
    match compile(&sources, &groups, &registry, config.schema()) {
        Ok(report) => {
            if !report.warnings.is_empty() {
                eprint!("{}", report.warnings.render_colored(&sources, args.color));
            }
            let targets: usize = groups.iter().map(|g| g.targets.len()).sum();
            println!(
                "{}generated{} {} files for {} targets",
                colors.green,
                colors.reset,
                report.written.len(),
                targets
            );
        }
        Err(Error::InvalidQueries(diagnostics)) => {
            eprint!("{}", diagnostics.render_colored(&sources, args.color));
            std::process::exit(1);
        }
        Err(Error::Backends(failures)) => {
            for failure in failures.iter() {
                eprintln!("error: {}", failure);
            }
            std::process::exit(1);
        }
    }
}
