//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("teamq")
        .about("Typed query functions from annotated SQL files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(color_arg())
        .arg(verbose_arg())
        .subcommand(generate_command())
        .subcommand(check_command())
        .subcommand(resolve_command())
        .subcommand(backends_command())
}

/// Compile every configured query group and write all targets.
pub fn generate_command() -> Command {
    Command::new("generate")
        .about("Generate code for every configured target")
        .after_help(
            r#"EXAMPLES:
  teamq generate                      # reads ./team-query.yaml
  teamq generate -c config/db.yaml    # explicit config"#,
        )
        .arg(config_arg())
}

/// Scan and validate query files without generating anything.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate query files")
        .after_help(
            r#"EXAMPLES:
  teamq check queries/                # every *.sql file in the directory
  teamq check queries/posts.sql       # one file
  teamq check queries/ --strict       # fail on warnings too"#,
        )
        .arg(query_paths_arg())
        .arg(strict_arg())
}

/// Resolve one query against parameter values.
pub fn resolve_command() -> Command {
    Command::new("resolve")
        .about("Print the final SQL and bind list for one call")
        .after_help(
            r#"EXAMPLES:
  teamq resolve queries/comments.sql -q ListCommentsByPost \
    -p '{"post_id": 7, "approved_only": true}'
  teamq resolve queries/comments.sql -q GetComment -p '{"id": 1}' -e sqlite"#,
        )
        .arg(query_file_arg())
        .arg(query_name_arg())
        .arg(params_arg())
        .arg(engine_arg())
}

/// List registered backends.
pub fn backends_command() -> Command {
    Command::new("backends").about("List available backends")
}
