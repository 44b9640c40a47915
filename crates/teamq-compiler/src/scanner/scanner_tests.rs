use indoc::indoc;
use rowan::TextRange;

use super::{ScannedFile, scan};
use crate::cardinality::Cardinality;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::SourceMap;

fn scan_text(text: &str) -> (ScannedFile, Diagnostics) {
    let mut map = SourceMap::new();
    let id = map.add_inline(text);
    let mut diag = Diagnostics::new();
    let file = scan(map.get(id), &mut diag);
    (file, diag)
}

fn slice(text: &str, range: TextRange) -> &str {
    &text[std::ops::Range::<usize>::from(range)]
}

#[test]
fn header_and_body() {
    let text = indoc! {"
        -- name: GetAuthor :one
        -- Fetch one author.
        -- param: id int Author id
        SELECT * FROM authors WHERE id = :id;
    "};
    let (file, diag) = scan_text(text);

    assert!(diag.is_empty());
    assert!(!file.aborted);
    let block = &file.blocks[0];
    assert_eq!(block.name, "GetAuthor");
    assert_eq!(slice(text, block.name_range), "GetAuthor");
    assert_eq!(block.cardinality, Cardinality::One);
    assert_eq!(block.description.as_deref(), Some("Fetch one author."));
    assert_eq!(block.params.len(), 1);
    assert_eq!(block.params[0].name, "id");
    assert_eq!(block.params[0].type_name, "int");
    assert_eq!(block.params[0].description, "Author id");
    assert_eq!(block.body, "SELECT * FROM authors WHERE id = :id");
    assert_eq!(slice(text, block.body_range()), block.body);
    assert_eq!(block.placeholders.len(), 1);
    assert_eq!(block.placeholders[0].name, "id");
    assert_eq!(slice(text, block.placeholders[0].range), ":id");
}

#[test]
fn blocks_in_file_order() {
    let text = indoc! {"
        -- Authors

        -- name: GetAuthor :one
        SELECT 1 ; ;

        -- Writes below.
        -- name: DeleteAuthor :exec
        -- param: id int
        DELETE FROM authors WHERE id = :id
    "};
    let (file, diag) = scan_text(text);

    assert!(diag.is_empty());
    let names: Vec<_> = file.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["GetAuthor", "DeleteAuthor"]);
    assert_eq!(file.blocks[0].body, "SELECT 1");
    assert_eq!(file.blocks[1].cardinality, Cardinality::Exec);
    assert_eq!(file.blocks[1].params[0].description, "");
    assert_eq!(file.blocks[1].description, None);
}

#[test]
fn fragment_on_own_lines() {
    let text = indoc! {"
        -- name: ListCommentsByPost :many
        -- param: post_id int Post to list
        -- param: approved_only bool Only approved comments
        SELECT * FROM comments
        WHERE post_id = :post_id
        -- {approved_only}
        AND approved = TRUE
        -- }
        ORDER BY created_at;
    "};
    let (file, diag) = scan_text(text);

    assert!(diag.is_empty());
    let block = &file.blocks[0];
    assert_eq!(block.fragments.len(), 1);
    let fragment = &block.fragments[0];
    assert_eq!(fragment.gate, "approved_only");
    assert_eq!(slice(text, fragment.gate_range), "approved_only");
    assert_eq!(slice(text, fragment.leading), "\n");
    assert_eq!(slice(text, fragment.content), "AND approved = TRUE");
    assert_eq!(
        slice(text, fragment.span),
        "\n-- {approved_only}\nAND approved = TRUE\n-- }"
    );
}

#[test]
fn fragment_inline() {
    let text = indoc! {"
        -- name: ListCommentsByPost :many
        -- param: post_id int
        -- param: approved_only bool
        SELECT * FROM comments WHERE post_id = :post_id -- { approved_only } AND approved = TRUE -- } ORDER BY created_at
    "};
    let (file, diag) = scan_text(text);

    assert!(diag.is_empty());
    let block = &file.blocks[0];
    let fragment = &block.fragments[0];
    assert_eq!(fragment.gate, "approved_only");
    assert_eq!(slice(text, fragment.leading), " ");
    assert_eq!(slice(text, fragment.content), "AND approved = TRUE");
    assert_eq!(
        slice(text, fragment.span),
        " -- { approved_only } AND approved = TRUE -- }"
    );
    let names: Vec<_> = block.placeholders.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["post_id"]);
}

#[test]
fn adjacent_fragments_do_not_share_whitespace() {
    let text = indoc! {"
        -- name: Search :many
        -- param: a bool
        -- param: b bool
        SELECT 1 -- {a} AND x -- } -- {b} AND y -- }
    "};
    let (file, diag) = scan_text(text);

    assert!(diag.is_empty());
    let fragments = &file.blocks[0].fragments;
    assert_eq!(slice(text, fragments[0].span), " -- {a} AND x -- }");
    assert_eq!(slice(text, fragments[1].span), " -- {b} AND y -- }");
    assert_eq!(slice(text, fragments[1].leading), " ");
}

#[test]
fn placeholders_inside_literals_are_ignored() {
    let text = indoc! {"
        -- name: Q :many
        -- param: yes int
        SELECT ':nope', a::text, \"x:y\" FROM t WHERE b = :yes /* :no */
    "};
    let (file, diag) = scan_text(text);

    assert!(diag.is_empty());
    let names: Vec<_> = file.blocks[0]
        .placeholders
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["yes"]);
}

#[test]
fn repeated_placeholder_kept_per_occurrence() {
    let text = "-- name: Q :many\n-- param: x int\nSELECT :x, :x";
    let (file, _) = scan_text(text);
    assert_eq!(file.blocks[0].placeholders.len(), 2);
}

#[test]
fn unclosed_fragment_aborts_file() {
    let text = indoc! {"
        -- name: Good :one
        SELECT 1;

        -- name: Bad :many
        -- param: mine bool
        SELECT * FROM posts
        -- {mine}
        WHERE author_id = 1
    "};
    let (file, diag) = scan_text(text);

    assert!(file.aborted);
    assert!(file.blocks.is_empty());
    assert_eq!(diag.kinds(), [DiagnosticKind::UnclosedFragment]);
    assert_eq!(slice(text, diag.iter().next().unwrap().range()), "-- {mine}");
}

#[test]
fn unmatched_close() {
    let text = "-- name: Q :many\nSELECT 1\n-- }";
    let (file, diag) = scan_text(text);

    assert!(file.aborted);
    assert_eq!(diag.kinds(), [DiagnosticKind::UnmatchedFragmentClose]);
}

#[test]
fn nested_fragment() {
    let text = indoc! {"
        -- name: Q :many
        -- param: a bool
        -- param: b bool
        SELECT 1
        -- {a}
        AND x
        -- {b}
        AND y
        -- }
    "};
    let (file, diag) = scan_text(text);

    assert!(file.aborted);
    assert_eq!(diag.kinds(), [DiagnosticKind::NestedFragment]);
    insta::assert_snapshot!(diag.iter().next().unwrap().to_string(), @"error at 73..79: fragments cannot be nested (related: outer fragment opened here at 60..66) (hint: close the outer fragment with `-- }` first)");
}

#[test]
fn unknown_cardinality() {
    let (file, diag) = scan_text("-- name: Q :some\nSELECT 1");

    assert!(file.aborted);
    assert_eq!(diag.kinds(), [DiagnosticKind::UnknownCardinality]);
    assert_eq!(diag.iter().next().unwrap().message(), "unknown cardinality `:some`");
}

#[test]
fn malformed_name_directives() {
    let text = indoc! {"
        -- name:
        SELECT 1;
        -- name: Q
        SELECT 1;
        -- name: Q one
        SELECT 1;
        -- name: Q :one extra
        SELECT 1;
    "};
    let (file, diag) = scan_text(text);

    assert!(file.aborted);
    let messages: Vec<_> = diag.iter().map(|d| d.message().to_string()).collect();
    insta::assert_debug_snapshot!(messages, @r#"
    [
        "malformed `name:` directive: expected a query name",
        "malformed `name:` directive: expected a cardinality after `Q`",
        "malformed `name:` directive: cardinality must start with `:`, found `one`",
        "malformed `name:` directive: unexpected `extra` after the cardinality",
    ]
    "#);
}

#[test]
fn malformed_param_directives() {
    let text = indoc! {"
        -- name: Q :many
        -- param:
        -- param: 1x int
        -- param: x
        SELECT 1
    "};
    let (_, diag) = scan_text(text);

    assert_eq!(
        diag.kinds(),
        [DiagnosticKind::MalformedParamDirective; 3]
    );
}

#[test]
fn param_outside_header() {
    let text = indoc! {"
        -- name: Q :exec
        DELETE FROM t
        -- param: x int
        WHERE 1 = 1
    "};
    let (file, diag) = scan_text(text);

    assert!(file.aborted);
    assert_eq!(diag.kinds(), [DiagnosticKind::ParamOutsideHeader]);
}

#[test]
fn orphan_statement_reported_once() {
    let text = indoc! {"
        SELECT 1;
        SELECT 2;
        -- name: Q :exec
        DELETE FROM t
    "};
    let (file, diag) = scan_text(text);

    assert!(file.aborted);
    assert_eq!(diag.kinds(), [DiagnosticKind::OrphanStatement]);
}

#[test]
fn header_without_statement() {
    let text = indoc! {"
        -- name: A :exec
        -- name: B :exec
        DELETE FROM t;
        -- name: C :exec
        -- param: x int
    "};
    let (file, diag) = scan_text(text);

    assert!(file.aborted);
    assert_eq!(
        diag.kinds(),
        [DiagnosticKind::EmptyStatement, DiagnosticKind::EmptyStatement]
    );
}

#[test]
fn all_parse_errors_in_a_file_are_reported() {
    let text = indoc! {"
        -- name: A :maybe
        SELECT 1;
        -- name: B :many
        SELECT 2 -- }
    "};
    let (_, diag) = scan_text(text);

    assert_eq!(
        diag.kinds(),
        [
            DiagnosticKind::UnknownCardinality,
            DiagnosticKind::UnmatchedFragmentClose
        ]
    );
}

#[test]
fn empty_file() {
    let (file, diag) = scan_text("-- nothing here\n\n");
    assert!(diag.is_empty());
    assert!(file.blocks.is_empty());
    assert!(!file.aborted);
}
