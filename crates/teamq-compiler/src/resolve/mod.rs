//! Fragment resolver: final statement text and positional bind list for
//! one set of runtime values.
//!
//! Pure and deterministic. Generated code in every backend reproduces this
//! walk over [`Query::segments`].

mod value;


use std::fmt::Write;

use serde::Serialize;

use crate::engine::Engine;
use crate::model::{Query, Segment};

pub use value::{ParamValues, Value};

/// Positional marker syntax of the target driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ...
    Dollar,
    /// `?`
    Question,
    /// `%s`, with literal `%` written as `%%`
    Percent,
}

impl PlaceholderStyle {
    /// Style of the engine's reference client.
    pub fn native(engine: Engine) -> Self {
        match engine {
            Engine::Postgres => Self::Dollar,
            Engine::Sqlite | Engine::Mysql => Self::Question,
        }
    }

    /// Append literal statement text. `%` is doubled under `Percent`, where
    /// drivers treat a lone `%` as the start of a format directive.
    fn write_text(self, out: &mut String, text: &str) {
        match self {
            Self::Percent => out.push_str(&text.replace('%', "%%")),
            Self::Dollar | Self::Question => out.push_str(text),
        }
    }

    /// Append the marker for the `position`-th bind (1-based).
    fn write_marker(self, out: &mut String, position: usize) {
        match self {
            Self::Dollar => {
                // Writing into a String cannot fail.
                let _ = write!(out, "${position}");
            }
            Self::Question => out.push('?'),
            Self::Percent => out.push_str("%s"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    pub sql: String,
    pub binds: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("query `{query}` requires parameter `{name}`")]
    MissingParameter { query: String, name: String },

    #[error("query `{query}` has no parameter `{name}`")]
    UnknownParameter { query: String, name: String },

    #[error("fragment gate `{name}` of query `{query}` must be a boolean, got {found}")]
    GateNotBoolean {
        query: String,
        name: String,
        found: &'static str,
    },

    #[error("parameter `{name}` of query `{query}` expects {expected}, got {found}")]
    TypeMismatch {
        query: String,
        name: String,
        expected: String,
        found: &'static str,
    },
}

/// Resolve `query` against `values`.
///
/// Excluded fragments contribute neither text nor binds. Each kept
/// placeholder occurrence binds its value again, so repeated references
/// produce repeated binds.
pub fn resolve(
    query: &Query,
    values: &ParamValues,
    style: PlaceholderStyle,
) -> Result<Resolved, ResolutionError> {
    check_values(query, values)?;

    let mut resolver = Resolver {
        query,
        values,
        style,
        out: Resolved {
            sql: String::with_capacity(query.body().len()),
            binds: Vec::new(),
        },
    };
    resolver.walk(&query.segments())?;
    Ok(resolver.out)
}

fn check_values(query: &Query, values: &ParamValues) -> Result<(), ResolutionError> {
    for (name, value) in values {
        let Some(param) = query.parameter(name) else {
            return Err(ResolutionError::UnknownParameter {
                query: query.name().to_string(),
                name: name.clone(),
            });
        };
        // Gates are checked when their fragment is reached.
        if query.is_gate(name) {
            continue;
        }
        if !value.fits(&param.ty) {
            return Err(ResolutionError::TypeMismatch {
                query: query.name().to_string(),
                name: name.clone(),
                expected: param.ty.to_string(),
                found: value.kind(),
            });
        }
    }
    Ok(())
}

struct Resolver<'a> {
    query: &'a Query,
    values: &'a ParamValues,
    style: PlaceholderStyle,
    out: Resolved,
}

impl<'a> Resolver<'a> {
    fn walk(&mut self, segments: &[Segment<'_>]) -> Result<(), ResolutionError> {
        for segment in segments {
            match segment {
                Segment::Text { text } => self.style.write_text(&mut self.out.sql, text),
                Segment::Param { name } => {
                    let value = self.value(name)?.clone();
                    self.out.binds.push(value);
                    self.style.write_marker(&mut self.out.sql, self.out.binds.len());
                }
                Segment::Fragment { gate, parts } => {
                    let value = self.value(gate)?;
                    match value.as_gate() {
                        Some(true) => self.walk(parts)?,
                        Some(false) => {}
                        None => {
                            return Err(ResolutionError::GateNotBoolean {
                                query: self.query.name().to_string(),
                                name: gate.to_string(),
                                found: value.kind(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn value(&self, name: &str) -> Result<&'a Value, ResolutionError> {
        self.values
            .get(name)
            .ok_or_else(|| ResolutionError::MissingParameter {
                query: self.query.name().to_string(),
                name: name.to_string(),
            })
    }
}
