//! Lexer for statement bodies.
//!
//! Only distinguishes what the compiler needs: placeholders, fragment
//! markers, and the constructs that can hide a `:name` (string literals,
//! quoted identifiers, comments, `::` casts). Everything else is kept as
//! opaque text.
//!
//! ## Error handling
//!
//! Characters the lexer has no rule for (operators, punctuation) are
//! coalesced into single `Symbol` tokens rather than producing one error
//! per character.

use logos::Logos;
use rowan::{TextRange, TextSize};
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `:name`
    #[regex(r":[A-Za-z_][A-Za-z0-9_]*")]
    Placeholder,

    /// `::` type cast, never a placeholder
    #[token("::")]
    Cast,

    #[token(":")]
    Colon,

    #[regex(r"'(?:[^']|'')*'")]
    StringLiteral,

    #[regex(r#""(?:[^"]|"")*""#)]
    QuotedIdent,

    /// `--` to end of line. Fragment markers are split out of these.
    #[regex(r"--[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_$]*")]
    Word,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// `-- {name}`, produced by post-processing `LineComment`.
    FragmentOpen,

    /// `-- }`, produced by post-processing `LineComment`.
    FragmentClose,

    /// Coalesced run of characters without a dedicated rule.
    Symbol,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }
}

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

fn to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new(
        TextSize::from(range.start as u32),
        TextSize::from(range.end as u32),
    )
}

/// Tokenizes `text`, reporting spans shifted by `offset`.
///
/// Post-processes the Logos output:
/// - Coalesces consecutive lexer errors into single `Symbol` tokens
/// - Splits fragment markers out of `LineComment` tokens and lexes the rest
///   of the line again, so `-- {gate} AND x = :x -- }` works on one line
pub fn lex(text: &str, offset: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    lex_into(text, offset, &mut tokens);
    tokens
}

fn lex_into(text: &str, offset: usize, tokens: &mut Vec<Token>) {
    let mut lexer = TokenKind::lexer(text);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(
                        TokenKind::Symbol,
                        to_text_range(offset + start..offset + end),
                    ));
                }

                let span = lexer.span();
                if kind == TokenKind::LineComment {
                    if let Some((marker, len)) = fragment_marker(&text[span.clone()]) {
                        let marker_end = span.start + len;
                        tokens.push(Token::new(
                            marker,
                            to_text_range(offset + span.start..offset + marker_end),
                        ));
                        lex_into(&text[marker_end..span.end], offset + marker_end, tokens);
                        continue;
                    }
                }
                tokens.push(Token::new(
                    kind,
                    to_text_range(offset + span.start..offset + span.end),
                ));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        TokenKind::Symbol,
                        to_text_range(offset + start..offset + text.len()),
                    ));
                }
                break;
            }
        }
    }
}

/// Recognizes `--{ws}{{ws}ident{ws}}` and `--{ws}}` at the start of a comment.
///
/// Returns the marker kind and its byte length within `comment`.
fn fragment_marker(comment: &str) -> Option<(TokenKind, usize)> {
    let bytes = comment.as_bytes();
    let mut pos = 2;
    skip_blanks(bytes, &mut pos);

    match bytes.get(pos)? {
        b'}' => Some((TokenKind::FragmentClose, pos + 1)),
        b'{' => {
            pos += 1;
            skip_blanks(bytes, &mut pos);
            let ident_start = pos;
            while bytes
                .get(pos)
                .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
            {
                pos += 1;
            }
            let ident = &comment[ident_start..pos];
            if !teamq_core::utils::is_identifier(ident) {
                return None;
            }
            skip_blanks(bytes, &mut pos);
            (bytes.get(pos)? == &b'}').then_some((TokenKind::FragmentOpen, pos + 1))
        }
        _ => None,
    }
}

fn skip_blanks(bytes: &[u8], pos: &mut usize) {
    while bytes.get(*pos).is_some_and(|b| *b == b' ' || *b == b'\t') {
        *pos += 1;
    }
}

/// Name of the gate parameter inside a `FragmentOpen` marker text.
pub fn fragment_gate(marker: &str) -> &str {
    let inner = marker
        .trim_start_matches('-')
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}');
    inner.trim()
}

/// Retrieves the text slice for a token. `source_offset` is the offset
/// `source` starts at, matching the one given to [`lex`].
#[inline]
pub fn token_text<'q>(source: &'q str, source_offset: usize, token: &Token) -> &'q str {
    let range = Range::<usize>::from(token.span);
    &source[range.start - source_offset..range.end - source_offset]
}
