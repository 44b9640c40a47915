//! Result cardinality and the row-shaping rules every backend reproduces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Expected shape of a query's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Exactly one row.
    One,
    /// Zero or more rows.
    Many,
    /// No rows; affected-row count when the engine reports it.
    Exec,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Many => "many",
            Self::Exec => "exec",
        }
    }

    pub fn returns_rows(self) -> bool {
        !matches!(self, Self::Exec)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cardinality `{0}`")]
pub struct UnknownCardinality(pub String);

impl FromStr for Cardinality {
    type Err = UnknownCardinality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one" => Ok(Self::One),
            "many" => Ok(Self::Many),
            "exec" => Ok(Self::Exec),
            other => Err(UnknownCardinality(other.to_string())),
        }
    }
}

/// Rows shaped according to a [`Cardinality`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput<T> {
    One(T),
    Many(Vec<T>),
    Affected(Option<u64>),
}

/// `:one` did not get exactly one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CardinalityError {
    #[error("query returned no rows")]
    NotFound,

    #[error("query returned {0} rows where exactly one was expected")]
    TooManyRows(usize),
}

/// Shape engine output by cardinality.
///
/// `Exec` drops any rows and reports `affected` unchanged.
pub fn shape_rows<T>(
    cardinality: Cardinality,
    rows: Vec<T>,
    affected: Option<u64>,
) -> Result<QueryOutput<T>, CardinalityError> {
    match cardinality {
        Cardinality::One => {
            let count = rows.len();
            let mut rows = rows.into_iter();
            match (rows.next(), count) {
                (None, _) => Err(CardinalityError::NotFound),
                (Some(row), 1) => Ok(QueryOutput::One(row)),
                (Some(_), n) => Err(CardinalityError::TooManyRows(n)),
            }
        }
        Cardinality::Many => Ok(QueryOutput::Many(rows)),
        Cardinality::Exec => Ok(QueryOutput::Affected(affected)),
    }
}
