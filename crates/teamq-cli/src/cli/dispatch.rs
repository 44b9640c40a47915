//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::backends::BackendsArgs;
use crate::commands::check::CheckArgs;
use crate::commands::generate::GenerateArgs;
use crate::commands::resolve::ResolveArgs;

pub struct GenerateParams {
    pub config: PathBuf,
    pub color: ColorChoice,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            config: m
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("team-query.yaml")),
            color: parse_color(m),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            config: p.config,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub paths: Vec<PathBuf>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            paths: m
                .get_many::<PathBuf>("paths")
                .map(|paths| paths.cloned().collect())
                .unwrap_or_default(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            paths: p.paths,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ResolveParams {
    pub file: PathBuf,
    pub query: String,
    pub params: String,
    pub engine: String,
    pub color: ColorChoice,
}

impl ResolveParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().unwrap_or_default(),
            query: m.get_one::<String>("query").cloned().unwrap_or_default(),
            params: m
                .get_one::<String>("params")
                .cloned()
                .unwrap_or_else(|| "{}".to_string()),
            engine: m
                .get_one::<String>("engine")
                .cloned()
                .unwrap_or_else(|| "postgres".to_string()),
            color: parse_color(m),
        }
    }
}

impl From<ResolveParams> for ResolveArgs {
    fn from(p: ResolveParams) -> Self {
        Self {
            file: p.file,
            query: p.query,
            params: p.params,
            engine: p.engine,
            color: p.color.should_colorize(),
        }
    }
}

pub struct BackendsParams {
    pub color: ColorChoice,
}

impl BackendsParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            color: parse_color(m),
        }
    }
}

impl From<BackendsParams> for BackendsArgs {
    fn from(p: BackendsParams) -> Self {
        Self {
            color: p.color.should_colorize(),
        }
    }
}

/// `--color` is global, so it is only defined when matching through the root command.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.try_get_one::<String>("color").ok().flatten().map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
