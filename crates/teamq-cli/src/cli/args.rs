//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so commands compose the same
//! definitions.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Configuration file (-c/--config).
pub fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .default_value("team-query.yaml")
        .value_parser(value_parser!(PathBuf))
        .help("Configuration file")
}

/// Query files or directories (positional, one or more).
pub fn query_paths_arg() -> Arg {
    Arg::new("paths")
        .value_name("PATH")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(PathBuf))
        .help("Query files or directories of *.sql files")
}

/// Single query file (positional).
pub fn query_file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Query file")
}

/// Query name (--query).
pub fn query_name_arg() -> Arg {
    Arg::new("query")
        .short('q')
        .long("query")
        .value_name("NAME")
        .required(true)
        .help("Name of the query to resolve")
}

/// Parameter values as a JSON object (--params).
pub fn params_arg() -> Arg {
    Arg::new("params")
        .short('p')
        .long("params")
        .value_name("JSON")
        .default_value("{}")
        .help("Parameter values as a JSON object")
}

/// Query engine (--engine).
pub fn engine_arg() -> Arg {
    Arg::new("engine")
        .short('e')
        .long("engine")
        .value_name("ENGINE")
        .default_value("postgres")
        .value_parser(["postgres", "sqlite", "mysql"])
        .help("Query engine, selects the placeholder style")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .global(true)
        .help("Colorize output")
}

/// Debug logging (-v/--verbose).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Log compiler progress to stderr (TEAMQ_LOG overrides)")
}
