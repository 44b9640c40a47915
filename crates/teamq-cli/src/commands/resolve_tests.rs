use indoc::indoc;

use teamq_compiler::SourceMap;

use super::resolve::resolve_to_json;

const COMMENTS: &str = indoc! {"
    -- name: ListCommentsByPost :many
    -- param: post_id int
    -- param: approved_only bool
    SELECT * FROM comments
    WHERE post_id = :post_id
    -- {approved_only}
    AND approved = TRUE
    -- }
    ORDER BY created_at;
"};

fn sources(text: &str) -> SourceMap {
    let mut map = SourceMap::new();
    map.add_file("comments.sql", text);
    map
}

#[test]
fn gate_included() {
    let json = resolve_to_json(
        &sources(COMMENTS),
        "ListCommentsByPost",
        r#"{"post_id": 7, "approved_only": true}"#,
        "postgres",
        false,
    )
    .unwrap();

    insta::assert_snapshot!(json, @r#"
    {
      "sql": "SELECT * FROM comments\nWHERE post_id = $1\nAND approved = TRUE\nORDER BY created_at",
      "binds": [
        7
      ]
    }
    "#);
}

#[test]
fn gate_excluded_with_question_marks() {
    let json = resolve_to_json(
        &sources(COMMENTS),
        "ListCommentsByPost",
        r#"{"post_id": 7, "approved_only": false}"#,
        "sqlite",
        false,
    )
    .unwrap();

    insta::assert_snapshot!(json, @r#"
    {
      "sql": "SELECT * FROM comments\nWHERE post_id = ?\nORDER BY created_at",
      "binds": [
        7
      ]
    }
    "#);
}

#[test]
fn unknown_query() {
    let err = resolve_to_json(&sources(COMMENTS), "Nope", "{}", "postgres", false).unwrap_err();
    assert_eq!(err, "error: no query named `Nope`\n");
}

#[test]
fn missing_parameter() {
    let err = resolve_to_json(
        &sources(COMMENTS),
        "ListCommentsByPost",
        r#"{"approved_only": false}"#,
        "postgres",
        false,
    )
    .unwrap_err();
    assert_eq!(
        err,
        "error: query `ListCommentsByPost` requires parameter `post_id`\n"
    );
}

#[test]
fn params_must_be_an_object() {
    let err = resolve_to_json(&sources(COMMENTS), "ListCommentsByPost", "[1, 2]", "postgres", false)
        .unwrap_err();
    assert!(err.starts_with("error: --params is not a JSON object of values"));
}

#[test]
fn invalid_file_renders_diagnostics() {
    let err = resolve_to_json(
        &sources("-- name: Q :one\nSELECT :nope"),
        "Q",
        "{}",
        "postgres",
        false,
    )
    .unwrap_err();
    assert!(err.starts_with("error: query `Q` references undeclared parameter `nope`"));
    assert!(err.contains("--> comments.sql:2:8"));
}
