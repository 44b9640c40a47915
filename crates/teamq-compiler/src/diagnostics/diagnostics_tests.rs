use rowan::TextRange;

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let sources = SourceMap::inline("-- }");
    let id = sources.ids().next().unwrap();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(id, DiagnosticKind::UnmatchedFragmentClose, range(0, 4))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    insta::assert_snapshot!(diagnostics.iter().next().unwrap().to_string(), @"error at 0..4: `-- }` has no matching fragment");
}

#[test]
fn message_templates() {
    assert_eq!(
        DiagnosticKind::UnknownCardinality.message(Some(":sometimes")),
        "unknown cardinality `:sometimes`"
    );
    assert_eq!(
        DiagnosticKind::EmptyStatement.message(Some("after `GetAuthor`")),
        "query has no statement: after `GetAuthor`"
    );
    assert_eq!(
        DiagnosticKind::UnusedParameter.message(Some("parameter `x` is unused")),
        "parameter `x` is unused"
    );
    assert_eq!(DiagnosticKind::DuplicateModule.message(None), "duplicate module name");
}

#[test]
fn classification() {
    assert!(DiagnosticKind::NestedFragment.is_parse_error());
    assert!(!DiagnosticKind::NestedFragment.is_validation_error());
    assert!(DiagnosticKind::UndeclaredParameter.is_validation_error());
    assert!(!DiagnosticKind::UnknownParamType.is_parse_error());
    assert!(!DiagnosticKind::UnknownParamType.is_validation_error());
    assert_eq!(DiagnosticKind::UnknownParamType.default_severity(), Severity::Warning);
}

#[test]
fn default_hints_are_attached() {
    let sources = SourceMap::inline("-- name: Q :one\n-- {a} x -- {b} y -- } -- }");
    let id = sources.ids().next().unwrap();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(id, DiagnosticKind::NestedFragment, range(25, 31))
        .emit();

    let message = diagnostics.iter().next().unwrap();
    assert_eq!(message.to_string(), "error at 25..31: fragments cannot be nested (hint: close the outer fragment with `-- }` first)");
}

#[test]
fn builder_with_related() {
    let sources = SourceMap::inline("hello world!");
    let id = sources.ids().next().unwrap();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(id, DiagnosticKind::DuplicateQuery, range(0, 5))
        .message("hello")
        .related_to("first defined here", range(6, 10))
        .emit();

    insta::assert_snapshot!(diagnostics.render(&sources), @r"
    error: query `hello` is already defined in this file
      |
    1 | hello world!
      | ^^^^^ ---- first defined here
    ");
}

#[test]
fn file_path_is_shown() {
    let mut sources = SourceMap::new();
    let id = sources.add_file("queries/authors.sql", "-- name: GetAuthor :one\n");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(id, DiagnosticKind::EmptyStatement, range(0, 23))
        .emit();

    insta::assert_snapshot!(diagnostics.render(&sources), @r"
    error: query has no statement
     --> queries/authors.sql:1:1
      |
    1 | -- name: GetAuthor :one
      | ^^^^^^^^^^^^^^^^^^^^^^^
    ");
}

#[test]
fn counts_and_kinds() {
    let sources = SourceMap::inline("SELECT 1");
    let id = sources.ids().next().unwrap();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(id, DiagnosticKind::UnknownParamType, range(0, 6))
        .message("geography")
        .emit();
    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());

    let mut more = Diagnostics::new();
    more.report(id, DiagnosticKind::OrphanStatement, range(0, 8))
        .emit();
    diagnostics.extend(more);

    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(
        diagnostics.kinds(),
        [DiagnosticKind::UnknownParamType, DiagnosticKind::OrphanStatement]
    );
}

#[test]
fn warnings_render_as_warnings() {
    let sources = SourceMap::inline("SELECT 1");
    let id = sources.ids().next().unwrap();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(id, DiagnosticKind::UnknownParamType, range(0, 6))
        .message("geography")
        .emit();

    insta::assert_snapshot!(diagnostics.render(&sources), @r"
    warning: unknown parameter type `geography`
      |
    1 | SELECT 1
      | ^^^^^^
    ");
}

#[test]
fn empty_range_is_widened() {
    let sources = SourceMap::inline("abc");
    let id = sources.ids().next().unwrap();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(id, DiagnosticKind::DuplicateModule, TextRange::empty(1.into()))
        .emit();

    insta::assert_snapshot!(diagnostics.render(&sources), @r"
    error: duplicate module name
      |
    1 | abc
      |  ^
    ");
}

#[test]
fn printer_colored() {
    let sources = SourceMap::inline("hello");
    let id = sources.ids().next().unwrap();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(id, DiagnosticKind::EmptyStatement, range(0, 5))
        .emit();

    let result = diagnostics.render_colored(&sources, true);
    assert!(result.contains("query has no statement"));
    assert!(result.contains('\x1b'));
}
