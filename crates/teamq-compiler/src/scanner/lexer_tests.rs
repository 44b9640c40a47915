use super::lexer::{TokenKind, fragment_gate, lex, token_text};

fn tokens(text: &str) -> String {
    lex(text, 0)
        .iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .map(|t| format!("{:?} {}", t.kind, token_text(text, 0, t)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn placeholders_casts_and_literals() {
    let text = r#"SELECT :id::int, ':no' FROM t WHERE "c:d" = :c"#;
    insta::assert_snapshot!(tokens(text), @r#"
    Word SELECT
    Placeholder :id
    Cast ::
    Word int
    Symbol ,
    StringLiteral ':no'
    Word FROM
    Word t
    Word WHERE
    QuotedIdent "c:d"
    Symbol =
    Placeholder :c
    "#);
}

#[test]
fn comments_hide_placeholders() {
    let text = "/* :x */ -- :y\n:z";
    insta::assert_snapshot!(tokens(text), @r"
    BlockComment /* :x */
    LineComment -- :y
    Placeholder :z
    ");
}

#[test]
fn escaped_quote_stays_in_literal() {
    let text = "'it''s :x' = :y";
    insta::assert_snapshot!(tokens(text), @r"
    StringLiteral 'it''s :x'
    Symbol =
    Placeholder :y
    ");
}

#[test]
fn inline_fragment_markers() {
    let text = "a = 1 -- {g} AND b = :b -- } ORDER BY a";
    insta::assert_snapshot!(tokens(text), @r"
    Word a
    Symbol =
    Number 1
    FragmentOpen -- {g}
    Word AND
    Word b
    Symbol =
    Placeholder :b
    FragmentClose -- }
    Word ORDER
    Word BY
    Word a
    ");
}

#[test]
fn marker_lookalikes_are_comments() {
    insta::assert_snapshot!(tokens("-- {1x}\n-- {open\n-- {}"), @r"
    LineComment -- {1x}
    LineComment -- {open
    LineComment -- {}
    ");
}

#[test]
fn spans_are_shifted_by_offset() {
    let toks = lex(":a", 10);
    assert_eq!(toks.len(), 1);
    assert_eq!(u32::from(toks[0].span.start()), 10);
    assert_eq!(u32::from(toks[0].span.end()), 12);
    assert_eq!(token_text(":a", 10, &toks[0]), ":a");
}

#[test]
fn gate_name_from_marker() {
    assert_eq!(fragment_gate("-- {approved_only}"), "approved_only");
    assert_eq!(fragment_gate("--{ x }"), "x");
}

#[test]
fn trivia() {
    assert!(TokenKind::Whitespace.is_trivia());
    assert!(TokenKind::LineComment.is_trivia());
    assert!(!TokenKind::FragmentOpen.is_trivia());
    assert!(!TokenKind::Placeholder.is_trivia());
}
