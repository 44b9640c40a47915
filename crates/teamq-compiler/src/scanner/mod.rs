//! Directive scanner: splits a query file into header blocks and statement
//! bodies, and locates placeholders and fragment markers inside each body.
//!
//! Any parse error aborts the file: its blocks are dropped so no partial
//! IR reaches the model builder.

mod directive;
pub mod lexer;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod scanner_tests;

use rowan::TextRange;

use crate::cardinality::Cardinality;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::{Source, SourceId};

pub use directive::RawParam;
use directive::{Directive, NameDirective, range};
use lexer::{Token, TokenKind, fragment_gate, lex, token_text};

/// One `:name` occurrence, with its file range (including the colon).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlaceholder {
    pub name: String,
    pub range: TextRange,
}

/// A balanced `-- {gate}` ... `-- }` pair. All ranges are file ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    pub gate: String,
    pub gate_range: TextRange,
    /// Leading whitespace + markers + content: what disappears when excluded.
    pub span: TextRange,
    /// Whitespace between the preceding text and the opening marker.
    pub leading: TextRange,
    /// Fragment text with the whitespace next to the markers trimmed.
    pub content: TextRange,
}

/// A header plus the statement that follows it.
#[derive(Debug, Clone)]
pub struct RawBlock {
    pub name: String,
    pub name_range: TextRange,
    pub cardinality: Cardinality,
    pub description: Option<String>,
    pub params: Vec<RawParam>,
    /// Statement text, trailing whitespace and semicolons removed.
    pub body: String,
    /// File offset of the first byte of `body`.
    pub body_offset: usize,
    pub placeholders: Vec<RawPlaceholder>,
    pub fragments: Vec<RawFragment>,
}

impl RawBlock {
    pub fn body_range(&self) -> TextRange {
        range(self.body_offset, self.body_offset + self.body.len())
    }
}

/// Result of scanning one file.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub source: SourceId,
    pub blocks: Vec<RawBlock>,
    /// Set when a parse error aborted the file; `blocks` is then empty.
    pub aborted: bool,
}

/// Scan one query file.
pub fn scan(source: Source<'_>, diag: &mut Diagnostics) -> ScannedFile {
    let mut local = Diagnostics::new();
    let blocks = Scanner::new(source, &mut local).run();
    let aborted = local.has_errors();
    tracing::debug!(
        source = source.kind.display_name(),
        blocks = blocks.len(),
        aborted,
        "scanned query file"
    );
    diag.extend(local);

    ScannedFile {
        source: source.id,
        blocks: if aborted { Vec::new() } else { blocks },
        aborted,
    }
}

/// Header being collected; `body_start` is set at the first statement line.
struct Pending {
    directive: Option<NameDirective>,
    header_range: TextRange,
    description: Vec<String>,
    params: Vec<RawParam>,
    body_start: Option<usize>,
    /// End of the last statement line. Comments trailing the statement
    /// belong to whatever follows it.
    body_end: usize,
}

struct Scanner<'s, 'd> {
    source: Source<'s>,
    diag: &'d mut Diagnostics,
    blocks: Vec<RawBlock>,
    pending: Option<Pending>,
    orphan_reported: bool,
}

impl<'s, 'd> Scanner<'s, 'd> {
    fn new(source: Source<'s>, diag: &'d mut Diagnostics) -> Self {
        Self {
            source,
            diag,
            blocks: Vec::new(),
            pending: None,
            orphan_reported: false,
        }
    }

    fn run(mut self) -> Vec<RawBlock> {
        let content = self.source.content;
        let mut offset = 0;
        for line in content.split_inclusive('\n') {
            let text = line.trim_end_matches(['\n', '\r']);
            let lead = text.len() - text.trim_start().len();
            self.line(text.trim(), offset + lead);
            offset += line.len();
        }
        self.finish();
        self.blocks
    }

    /// Handle one trimmed line starting at file offset `start`.
    fn line(&mut self, line: &str, start: usize) {
        let line_range = range(start, start + line.len());
        let id = self.source.id;

        match directive::classify(line, start) {
            Some(Directive::Name { rest, offset }) => {
                self.finish();
                let directive = directive::parse_name(id, rest, offset, line_range, self.diag);
                self.pending = Some(Pending {
                    directive,
                    header_range: line_range,
                    description: Vec::new(),
                    params: Vec::new(),
                    body_start: None,
                    body_end: 0,
                });
            }
            Some(Directive::Param { rest, offset }) => match &mut self.pending {
                Some(pending) if pending.body_start.is_none() => {
                    if let Some(param) =
                        directive::parse_param(id, rest, offset, line_range, self.diag)
                    {
                        pending.params.push(param);
                    }
                }
                _ => {
                    self.diag
                        .report(id, DiagnosticKind::ParamOutsideHeader, line_range)
                        .emit();
                }
            },
            None => self.plain_line(line, start, line_range),
        }
    }

    fn plain_line(&mut self, line: &str, start: usize, line_range: TextRange) {
        let is_comment = line.starts_with("--") && !is_fragment_marker(line);

        match &mut self.pending {
            None => {
                if line.is_empty() || is_comment || self.orphan_reported {
                    return;
                }
                self.orphan_reported = true;
                self.diag
                    .report(self.source.id, DiagnosticKind::OrphanStatement, line_range)
                    .emit();
            }
            Some(pending) if pending.body_start.is_none() => {
                if line.is_empty() {
                    return;
                }
                if is_comment {
                    let text = line.trim_start_matches('-').trim();
                    if !text.is_empty() {
                        pending.description.push(text.to_string());
                    }
                    return;
                }
                pending.body_start = Some(start);
                pending.body_end = line_range.end().into();
            }
            Some(pending) => {
                if !line.is_empty() && !is_comment {
                    pending.body_end = line_range.end().into();
                }
            }
        }
    }

    /// Close the pending block.
    fn finish(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        let Some(body_start) = pending.body_start else {
            self.diag
                .report(
                    self.source.id,
                    DiagnosticKind::EmptyStatement,
                    pending.header_range,
                )
                .emit();
            return;
        };

        let body = trim_statement(&self.source.content[body_start..pending.body_end]);
        let Some(directive) = pending.directive else {
            // Already reported; keep scanning for further errors.
            return;
        };

        let tokens = lex(body, body_start);
        let (placeholders, fragments) = self.markers(body, body_start, &tokens);

        self.blocks.push(RawBlock {
            name: directive.name,
            name_range: directive.name_range,
            cardinality: directive.cardinality,
            description: (!pending.description.is_empty())
                .then(|| pending.description.join(" ")),
            params: pending.params,
            body: body.to_string(),
            body_offset: body_start,
            placeholders,
            fragments,
        });
    }

    /// Collect placeholders and match fragment markers in textual order.
    fn markers(
        &mut self,
        body: &str,
        body_offset: usize,
        tokens: &[Token],
    ) -> (Vec<RawPlaceholder>, Vec<RawFragment>) {
        let id = self.source.id;
        let mut placeholders = Vec::new();
        let mut fragments: Vec<RawFragment> = Vec::new();
        let mut open: Option<&Token> = None;

        for token in tokens {
            match token.kind {
                TokenKind::Placeholder => {
                    let text = token_text(body, body_offset, token);
                    placeholders.push(RawPlaceholder {
                        name: text[1..].to_string(),
                        range: token.span,
                    });
                }
                TokenKind::FragmentOpen => match open {
                    Some(outer) => {
                        self.diag
                            .report(id, DiagnosticKind::NestedFragment, token.span)
                            .related_to("outer fragment opened here", outer.span)
                            .emit();
                    }
                    None => open = Some(token),
                },
                TokenKind::FragmentClose => match open.take() {
                    Some(opener) => {
                        let prev_end = fragments
                            .last()
                            .map_or(body_offset, |f| usize::from(f.span.end()));
                        fragments.push(fragment(body, body_offset, prev_end, opener, token));
                    }
                    None => {
                        self.diag
                            .report(id, DiagnosticKind::UnmatchedFragmentClose, token.span)
                            .emit();
                    }
                },
                _ => {}
            }
        }

        if let Some(opener) = open {
            self.diag
                .report(id, DiagnosticKind::UnclosedFragment, opener.span)
                .emit();
        }

        (placeholders, fragments)
    }
}

/// Build a fragment from its markers, applying the whitespace rules:
/// the opener absorbs whitespace after it, the closer absorbs whitespace
/// before it, and the whitespace before the opener joins the span.
fn fragment(
    body: &str,
    body_offset: usize,
    prev_end: usize,
    open: &Token,
    close: &Token,
) -> RawFragment {
    let rel = |pos: rowan::TextSize| usize::from(pos) - body_offset;
    let (open_start, open_end) = (rel(open.span.start()), rel(open.span.end()));
    let (close_start, close_end) = (rel(close.span.start()), rel(close.span.end()));
    let prev_end = prev_end - body_offset;

    let content_start = open_end + leading_ws(&body[open_end..close_start]);
    let content_end = close_start - trailing_ws(&body[content_start..close_start]);
    let lead_start = open_start - trailing_ws(&body[prev_end..open_start]);

    let marker = &body[open_start..open_end];
    let gate = fragment_gate(marker);
    let gate_at = open_start + marker.find(gate).unwrap_or(0);

    let abs = |start: usize, end: usize| range(body_offset + start, body_offset + end);
    RawFragment {
        gate: gate.to_string(),
        gate_range: abs(gate_at, gate_at + gate.len()),
        span: abs(lead_start, close_end),
        leading: abs(lead_start, open_start),
        content: abs(content_start, content_end),
    }
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn leading_ws(text: &str) -> usize {
    text.len() - text.trim_start_matches(is_ws).len()
}

fn trailing_ws(text: &str) -> usize {
    text.len() - text.trim_end_matches(is_ws).len()
}

fn is_fragment_marker(line: &str) -> bool {
    lex(line, 0)
        .first()
        .is_some_and(|t| matches!(t.kind, TokenKind::FragmentOpen | TokenKind::FragmentClose))
}

/// Strip trailing whitespace and statement terminators.
fn trim_statement(text: &str) -> &str {
    let mut text = text.trim_end();
    while let Some(stripped) = text.strip_suffix(';') {
        text = stripped.trim_end();
    }
    text
}
