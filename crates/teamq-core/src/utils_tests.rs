use crate::utils::{
    is_identifier, sanitize_identifier, to_camel_case, to_pascal_case, to_snake_case,
};

#[test]
fn pascal_case_from_snake() {
    assert_eq!(to_pascal_case("post_id"), "PostId");
    assert_eq!(to_pascal_case("foo"), "Foo");
    assert_eq!(to_pascal_case("_foo"), "Foo");
    assert_eq!(to_pascal_case("foo_"), "Foo");
}

#[test]
fn pascal_case_normalizes() {
    assert_eq!(to_pascal_case("FOO_BAR"), "FooBar");
    assert_eq!(to_pascal_case("FOO"), "Foo");
}

#[test]
fn pascal_case_idempotent() {
    assert_eq!(to_pascal_case("ListCommentsByPost"), "ListCommentsByPost");
    assert_eq!(to_pascal_case("Q"), "Q");
}

#[test]
fn pascal_case_from_kebab_and_dotted() {
    assert_eq!(to_pascal_case("blog-posts"), "BlogPosts");
    assert_eq!(to_pascal_case("blog.posts"), "BlogPosts");
}

#[test]
fn camel_case_lowers_first_letter() {
    assert_eq!(to_camel_case("GetAuthorById"), "getAuthorById");
    assert_eq!(to_camel_case("approved_only"), "approvedOnly");
    assert_eq!(to_camel_case(""), "");
}

#[test]
fn snake_case_from_pascal() {
    assert_eq!(to_snake_case("GetAuthorById"), "get_author_by_id");
    assert_eq!(to_snake_case("Foo"), "foo");
}

#[test]
fn snake_case_keeps_acronyms_together() {
    assert_eq!(to_snake_case("ListHTTPLogs"), "list_http_logs");
    assert_eq!(to_snake_case("GetV2Post"), "get_v2_post");
}

#[test]
fn snake_case_is_idempotent() {
    assert_eq!(to_snake_case("post_id"), "post_id");
    assert_eq!(to_snake_case("blog-posts"), "blog_posts");
}

#[test]
fn sanitize_replaces_invalid_characters() {
    assert_eq!(sanitize_identifier("authors-table", &[]), "authors_table");
    assert_eq!(sanitize_identifier("123authors", &[]), "_123authors");
    assert_eq!(sanitize_identifier("", &[]), "_");
}

#[test]
fn sanitize_escapes_reserved_words() {
    let reserved = ["from", "import"];
    assert_eq!(sanitize_identifier("from", &reserved), "from_");
    assert_eq!(sanitize_identifier("fromage", &reserved), "fromage");
}

#[test]
fn identifier_check() {
    assert!(is_identifier("post_id"));
    assert!(is_identifier("_x1"));
    assert!(!is_identifier("1x"));
    assert!(!is_identifier("a-b"));
    assert!(!is_identifier(""));
}
