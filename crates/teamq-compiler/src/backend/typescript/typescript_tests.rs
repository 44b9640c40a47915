use indoc::indoc;

use super::TypeScriptBackend;
use crate::backend::{Backend, BackendError, GenContext, GeneratedFile};
use crate::engine::Engine;
use crate::schema::{NoSchema, SchemaLookup, StaticSchema};
use crate::{CatalogBuilder, SourceMap};

const COMMENTS: &str = indoc! {"
    -- name: ListCommentsByPost :many
    -- List comments on a post.
    -- param: post_id int Post to list
    -- param: approved_only bool Only approved comments
    SELECT * FROM comments WHERE post_id = :post_id -- {approved_only} AND approved = TRUE -- } ORDER BY created_at;

    -- name: GetComment :one
    -- param: id int
    SELECT id, body FROM comments WHERE id = :id;

    -- name: DeleteComment :exec
    -- param: id int
    DELETE FROM comments WHERE id = :id;
"};

fn generate(
    files: &[(&str, &str)],
    engine: Engine,
    schema: &dyn SchemaLookup,
) -> Result<Vec<GeneratedFile>, BackendError> {
    let mut sources = SourceMap::new();
    for (path, content) in files {
        sources.add_file(path, content);
    }
    let catalog = CatalogBuilder::new(&sources)
        .with_engine(engine)
        .scan()
        .analyze()
        .into_catalog()
        .unwrap();
    TypeScriptBackend.generate(&GenContext::new(&catalog, schema))
}

fn file<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
    &files
        .iter()
        .find(|f| f.path.to_str() == Some(path))
        .unwrap_or_else(|| panic!("no generated file `{path}`"))
        .contents
}

#[test]
fn module_per_query_file() {
    let schema = StaticSchema::new().with_table("comments", [("id", "int"), ("body", "text")]);
    let files = generate(&[("queries/comments.sql", COMMENTS)], Engine::Postgres, &schema).unwrap();

    let paths: Vec<_> = files.iter().map(|f| f.path.display().to_string()).collect();
    assert_eq!(paths, ["runtime.ts", "comments.ts", "index.ts"]);

    insta::assert_snapshot!(file(&files, "comments.ts"), @r#"
    // Code generated by teamq. DO NOT EDIT.
    // source: queries/comments.sql

    import { type Queryable, type Segment, execute, expectOne, render } from "./runtime";

    export interface ListCommentsByPostParams {
      /** Post to list */
      post_id: number | null;
      /** Only approved comments */
      approved_only: boolean;
    }

    export interface ListCommentsByPostRow {
      id: number | null;
      body: string | null;
    }

    const listCommentsByPostSegments: Segment[] = [
      { text: "SELECT * FROM comments WHERE post_id = " },
      { param: "post_id" },
      { gate: "approved_only", parts: [{ text: " " }, { text: "AND approved = TRUE" }] },
      { text: " ORDER BY created_at" },
    ];

    /** List comments on a post. */
    export async function listCommentsByPost(
      db: Queryable,
      params: ListCommentsByPostParams,
    ): Promise<ListCommentsByPostRow[]> {
      const statement = render("ListCommentsByPost", listCommentsByPostSegments, params, "dollar");
      const result = await execute<ListCommentsByPostRow>(db, "ListCommentsByPost", statement);
      return result.rows;
    }

    export interface GetCommentParams {
      id: number | null;
    }

    export interface GetCommentRow {
      id: number | null;
      body: string | null;
    }

    const getCommentSegments: Segment[] = [
      { text: "SELECT id, body FROM comments WHERE id = " },
      { param: "id" },
    ];

    export async function getComment(
      db: Queryable,
      params: GetCommentParams,
    ): Promise<GetCommentRow> {
      const statement = render("GetComment", getCommentSegments, params, "dollar");
      const result = await execute<GetCommentRow>(db, "GetComment", statement);
      return expectOne("GetComment", result.rows);
    }

    export interface DeleteCommentParams {
      id: number | null;
    }

    const deleteCommentSegments: Segment[] = [
      { text: "DELETE FROM comments WHERE id = " },
      { param: "id" },
    ];

    export async function deleteComment(
      db: Queryable,
      params: DeleteCommentParams,
    ): Promise<number | null> {
      const statement = render("DeleteComment", deleteCommentSegments, params, "dollar");
      const result = await execute(db, "DeleteComment", statement);
      return result.rowCount ?? null;
    }
    "#);
}

#[test]
fn index_namespaces_modules() {
    let files = generate(
        &[
            ("queries/authors.sql", "-- name: A :one\nSELECT 1"),
            ("queries/blog-posts.sql", "-- name: B :one\nSELECT 1"),
        ],
        Engine::Postgres,
        &NoSchema,
    )
    .unwrap();

    insta::assert_snapshot!(file(&files, "index.ts"), @r#"
    // Code generated by teamq. DO NOT EDIT.

    export * from "./runtime";
    export * as authors from "./authors";
    export * as blog_posts from "./blog_posts";
    "#);
}

#[test]
fn conditionally_live_params_are_optional() {
    let files = generate(
        &[(
            "q.sql",
            indoc! {"
                -- name: Search :many
                -- param: mine bool
                -- param: author_id int
                -- param: tags text[]
                SELECT * FROM posts WHERE tags && :tags -- {mine} AND author_id = :author_id -- }
            "},
        )],
        Engine::Sqlite,
        &NoSchema,
    )
    .unwrap();
    let module = file(&files, "q.ts");

    assert!(module.contains("  mine: boolean;\n"));
    assert!(module.contains("  author_id?: number | null;\n"));
    assert!(module.contains("  tags: string[] | null;\n"));
    assert!(module.contains("export type SearchRow = Record<string, unknown>;\n"));
    assert!(module.contains("params, \"question\");"));
    assert!(!module.contains("expectOne"));
}

#[test]
fn gate_bound_inside_its_fragment_stays_required() {
    let files = generate(
        &[(
            "q.sql",
            "-- name: ListPosts :many\n-- param: flag bool\nSELECT * FROM posts -- {flag} WHERE featured = :flag -- }",
        )],
        Engine::Postgres,
        &NoSchema,
    )
    .unwrap();
    let module = file(&files, "q.ts");

    assert!(module.contains("  flag: boolean;\n"));
    assert!(!module.contains("flag?:"));
}

#[test]
fn parameterless_query_defaults_params() {
    let files = generate(&[("q.sql", "-- name: CountPosts :one\nSELECT count(*) FROM posts")], Engine::Postgres, &NoSchema).unwrap();
    let module = file(&files, "q.ts");

    assert!(module.contains("export type CountPostsParams = Record<string, never>;\n"));
    assert!(module.contains("  params: CountPostsParams = {},\n"));
}

#[test]
fn colliding_function_names() {
    let err = generate(
        &[(
            "q.sql",
            "-- name: get_post :one\nSELECT 1;\n-- name: GetPost :one\nSELECT 2;",
        )],
        Engine::Postgres,
        &NoSchema,
    )
    .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"typescript backend cannot render query `GetPost`: function name `getPost` is also used by `get_post`");
}

#[test]
fn literals_are_escaped() {
    let files = generate(
        &[("q.sql", "-- name: Q :many\nSELECT 'say \"hi\"\\n' AS greeting")],
        Engine::Postgres,
        &NoSchema,
    )
    .unwrap();

    assert!(file(&files, "q.ts").contains(r#"  { text: "SELECT 'say \"hi\"\\n' AS greeting" },"#));
}

#[test]
fn deterministic_output() {
    let first = generate(&[("queries/comments.sql", COMMENTS)], Engine::Postgres, &NoSchema).unwrap();
    let second = generate(&[("queries/comments.sql", COMMENTS)], Engine::Postgres, &NoSchema).unwrap();
    assert_eq!(first, second);
}

#[test]
fn runtime_is_shipped_verbatim() {
    let files = generate(&[("q.sql", "-- name: Q :one\nSELECT 1")], Engine::Postgres, &NoSchema).unwrap();
    let runtime = file(&files, "runtime.ts");

    assert!(runtime.starts_with("// Code generated by teamq. DO NOT EDIT.\n"));
    assert!(runtime.contains("export function render("));
    assert!(runtime.contains("export function expectOne<Row>("));
}
