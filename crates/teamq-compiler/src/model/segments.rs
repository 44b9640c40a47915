use std::ops::Range;

use serde::Serialize;

use super::Query;

/// Query body lowered for resolution: literal text, placeholder
/// references, and fragments holding their own text and placeholders.
///
/// A fragment's parts start with its leading whitespace, so dropping the
/// whole `Fragment` removes exactly the excluded span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment<'q> {
    Text { text: &'q str },
    Param { name: &'q str },
    Fragment { gate: &'q str, parts: Vec<Segment<'q>> },
}

pub(super) fn lower(query: &Query) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for fragment in &query.fragments {
        pieces(query, cursor..fragment.span.start, &mut out);

        let mut parts = Vec::new();
        push_text(&query.body[fragment.leading.clone()], &mut parts);
        pieces(query, fragment.content.clone(), &mut parts);
        out.push(Segment::Fragment {
            gate: &fragment.gate,
            parts,
        });

        cursor = fragment.span.end;
    }
    pieces(query, cursor..query.body.len(), &mut out);

    out
}

/// Split `range` of the body at the placeholders it contains.
fn pieces<'q>(query: &'q Query, range: Range<usize>, out: &mut Vec<Segment<'q>>) {
    let mut cursor = range.start;
    for placeholder in &query.placeholders {
        if placeholder.range.start < range.start || placeholder.range.end > range.end {
            continue;
        }
        push_text(&query.body[cursor..placeholder.range.start], out);
        out.push(Segment::Param {
            name: &placeholder.name,
        });
        cursor = placeholder.range.end;
    }
    push_text(&query.body[cursor..range.end], out);
}

fn push_text<'q>(text: &'q str, out: &mut Vec<Segment<'q>>) {
    if !text.is_empty() {
        out.push(Segment::Text { text });
    }
}
