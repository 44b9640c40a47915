//! Advisory result-shape inference from a schema lookup.
//!
//! Only ever refines generated row types. Any statement shape that is not
//! recognized, or a table the lookup does not know, yields `None` and the
//! backends fall back to an untyped row.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{ParamType, Query};
use crate::scanner::lexer::{Token, TokenKind, lex, token_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Source of table definitions.
pub trait SchemaLookup {
    /// Columns of `table` in definition order, if known.
    fn table_columns(&self, table: &str) -> Option<Vec<Column>>;

    /// False when the lookup can never answer, which silences misses.
    fn is_available(&self) -> bool {
        true
    }
}

/// No schema configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchema;

impl SchemaLookup for NoSchema {
    fn table_columns(&self, _table: &str) -> Option<Vec<Column>> {
        None
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Tables declared up front, e.g. in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StaticSchema {
    tables: IndexMap<String, IndexMap<String, String>>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table<'a>(
        mut self,
        table: &str,
        columns: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.tables.insert(
            table.to_string(),
            columns
                .into_iter()
                .map(|(name, ty)| (name.to_string(), ty.to_string()))
                .collect(),
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SchemaLookup for StaticSchema {
    fn table_columns(&self, table: &str) -> Option<Vec<Column>> {
        let columns = self.tables.get(table).or_else(|| {
            self.tables
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(table))
                .map(|(_, columns)| columns)
        })?;
        Some(
            columns
                .iter()
                .map(|(name, ty)| Column::new(name, ParamType::parse(ty)))
                .collect(),
        )
    }
}

/// One item of a select or returning list.
enum Item<'q> {
    All,
    Named { column: &'q str, alias: &'q str },
}

/// Infer the row shape of `query`.
///
/// Recognizes `SELECT <items> FROM <table>` and
/// `INSERT INTO | UPDATE | DELETE FROM <table> ... RETURNING <items>`, where
/// items are `*` or plain (optionally qualified, optionally aliased) columns.
pub fn infer_columns(query: &Query, schema: &dyn SchemaLookup) -> Option<Vec<Column>> {
    if !query.cardinality().returns_rows() || !schema.is_available() {
        return None;
    }

    let body = query.body();
    let tokens: Vec<Token> = lex(body, 0)
        .into_iter()
        .filter(|t| {
            !t.kind.is_trivia()
                && !matches!(t.kind, TokenKind::FragmentOpen | TokenKind::FragmentClose)
        })
        .collect();
    let words = Words { body, tokens: &tokens };

    let (items, table) = match words.keyword(0)?.as_str() {
        "select" => {
            let from = words.find_keyword(1, "from")?;
            (words.items(1, from)?, words.table(from + 1)?)
        }
        "insert" | "update" | "delete" => {
            let returning = words.find_keyword(1, "returning")?;
            let at = match words.keyword(0)?.as_str() {
                "update" => 1,
                _ => 2,
            };
            (words.items(returning + 1, tokens.len())?, words.table(at)?)
        }
        _ => return None,
    };

    let Some(columns) = schema.table_columns(table) else {
        tracing::warn!(query = query.name(), table, "schema has no such table");
        return None;
    };

    let mut out = Vec::new();
    for item in items {
        match item {
            Item::All => out.extend(columns.iter().cloned()),
            Item::Named { column, alias } => {
                let Some(found) = columns.iter().find(|c| c.name.eq_ignore_ascii_case(column))
                else {
                    tracing::warn!(query = query.name(), table, column, "schema has no such column");
                    return None;
                };
                out.push(Column::new(alias, found.ty.clone()));
            }
        }
    }
    Some(out)
}

struct Words<'q, 't> {
    body: &'q str,
    tokens: &'t [Token],
}

impl<'q> Words<'q, '_> {
    fn text(&self, at: usize) -> Option<&'q str> {
        self.tokens.get(at).map(|t| token_text(self.body, 0, t))
    }

    fn keyword(&self, at: usize) -> Option<String> {
        let token = self.tokens.get(at)?;
        (token.kind == TokenKind::Word).then(|| token_text(self.body, 0, token).to_ascii_lowercase())
    }

    fn find_keyword(&self, from: usize, keyword: &str) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| {
            self.tokens[i].kind == TokenKind::Word
                && token_text(self.body, 0, &self.tokens[i]).eq_ignore_ascii_case(keyword)
        })
    }

    /// Table name at `at`, dropping a schema qualifier.
    fn table(&self, at: usize) -> Option<&'q str> {
        let name = self.word(at)?;
        if self.text(at + 1) == Some(".") {
            return self.word(at + 2);
        }
        Some(name)
    }

    fn word(&self, at: usize) -> Option<&'q str> {
        match self.tokens.get(at)?.kind {
            TokenKind::Word => self.text(at),
            TokenKind::QuotedIdent => self.text(at).map(|t| t.trim_matches('"')),
            _ => None,
        }
    }

    /// Comma-separated items in `start..end`; `None` if any is not simple.
    fn items(&self, start: usize, end: usize) -> Option<Vec<Item<'q>>> {
        let mut items = Vec::new();
        let mut at = start;
        while at < end {
            let item_end = (at..end).find(|&i| self.text(i) == Some(",")).unwrap_or(end);
            items.push(self.item(at, item_end)?);
            at = item_end + 1;
        }
        (!items.is_empty()).then_some(items)
    }

    fn item(&self, start: usize, end: usize) -> Option<Item<'q>> {
        let texts: Vec<&str> = (start..end).filter_map(|i| self.text(i)).collect();
        match texts.as_slice() {
            ["*"] | [_, ".*"] => Some(Item::All),
            [_] => self.named(start, start),
            [_, ".", _] => self.named(start + 2, start + 2),
            [_, as_kw, _] if as_kw.eq_ignore_ascii_case("as") => self.named(start, start + 2),
            [_, _] => self.named(start, start + 1),
            [_, ".", _, as_kw, _] if as_kw.eq_ignore_ascii_case("as") => {
                self.named(start + 2, start + 4)
            }
            _ => None,
        }
    }

    fn named(&self, column: usize, alias: usize) -> Option<Item<'q>> {
        Some(Item::Named {
            column: self.word(column)?,
            alias: self.word(alias)?,
        })
    }
}
