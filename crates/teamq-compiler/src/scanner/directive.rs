//! Header directive lines: `-- name: <Name> :<cardinality>` and
//! `-- param: <name> <type> <description>`.

use rowan::{TextRange, TextSize};

use crate::cardinality::Cardinality;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::SourceId;

/// A directive line, with the text after `name:`/`param:` and its file offset.
pub(super) enum Directive<'a> {
    Name { rest: &'a str, offset: usize },
    Param { rest: &'a str, offset: usize },
}

/// Classify a trimmed line starting at file offset `offset`.
pub(super) fn classify(line: &str, offset: usize) -> Option<Directive<'_>> {
    let after_dashes = line.strip_prefix("--")?.trim_start();
    if let Some(rest) = after_dashes.strip_prefix("name:") {
        return Some(Directive::Name {
            offset: offset + line.len() - rest.len(),
            rest,
        });
    }
    if let Some(rest) = after_dashes.strip_prefix("param:") {
        return Some(Directive::Param {
            offset: offset + line.len() - rest.len(),
            rest,
        });
    }
    None
}

#[derive(Debug, Clone)]
pub(super) struct NameDirective {
    pub name: String,
    pub name_range: TextRange,
    pub cardinality: Cardinality,
}

/// Parsed `param:` line. Types are resolved later by the model builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParam {
    pub name: String,
    pub name_range: TextRange,
    pub type_name: String,
    pub type_range: TextRange,
    pub description: String,
}

pub(super) fn parse_name(
    source: SourceId,
    rest: &str,
    offset: usize,
    line_range: TextRange,
    diag: &mut Diagnostics,
) -> Option<NameDirective> {
    let words = words(rest, offset);
    let kind = DiagnosticKind::MalformedNameDirective;

    let Some(&(name, name_range)) = words.first() else {
        diag.report(source, kind, line_range)
            .message("expected a query name")
            .emit();
        return None;
    };
    let Some(&(tag, tag_range)) = words.get(1) else {
        diag.report(source, kind, name_range)
            .message(format!("expected a cardinality after `{name}`"))
            .emit();
        return None;
    };
    if let Some(&(extra, extra_range)) = words.get(2) {
        diag.report(source, kind, extra_range)
            .message(format!("unexpected `{extra}` after the cardinality"))
            .emit();
        return None;
    }

    let Some(tag_name) = tag.strip_prefix(':') else {
        diag.report(source, kind, tag_range)
            .message(format!("cardinality must start with `:`, found `{tag}`"))
            .emit();
        return None;
    };
    let Ok(cardinality) = tag_name.parse::<Cardinality>() else {
        diag.report(source, DiagnosticKind::UnknownCardinality, tag_range)
            .message(tag)
            .emit();
        return None;
    };

    Some(NameDirective {
        name: name.to_string(),
        name_range,
        cardinality,
    })
}

pub(super) fn parse_param(
    source: SourceId,
    rest: &str,
    offset: usize,
    line_range: TextRange,
    diag: &mut Diagnostics,
) -> Option<RawParam> {
    let kind = DiagnosticKind::MalformedParamDirective;
    let words = words(rest, offset);

    let Some(&(name, name_range)) = words.first() else {
        diag.report(source, kind, line_range)
            .message("expected a parameter name")
            .emit();
        return None;
    };
    if !teamq_core::utils::is_identifier(name) {
        diag.report(source, kind, name_range)
            .message(format!("`{name}` is not a valid parameter name"))
            .emit();
        return None;
    }
    let Some(&(type_name, type_range)) = words.get(1) else {
        diag.report(source, kind, name_range)
            .message(format!("expected a type after `{name}`"))
            .emit();
        return None;
    };

    let type_end = usize::from(type_range.end()) - offset;
    Some(RawParam {
        name: name.to_string(),
        name_range,
        type_name: type_name.to_string(),
        type_range,
        description: rest[type_end..].trim().to_string(),
    })
}

/// Whitespace-separated words with their file ranges.
fn words(text: &str, offset: usize) -> Vec<(&str, TextRange)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push((&text[s..i], range(offset + s, offset + i)));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((&text[s..], range(offset + s, offset + text.len())));
    }
    out
}

pub(super) fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}
