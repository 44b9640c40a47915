//! Parameter type vocabulary.

use std::fmt;

use serde::{Serialize, Serializer};

/// Declared type of a query parameter.
///
/// Parsing never fails: names outside the vocabulary become `Custom` and
/// backends map them to their dynamic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Int,
    Float,
    String,
    Bool,
    Date,
    Timestamp,
    Uuid,
    Json,
    Bytes,
    /// Numeric embedding.
    Vector,
    Array(Box<ParamType>),
    Custom(String),
}

impl ParamType {
    /// Parse a type name as written in a `param:` directive.
    pub fn parse(name: &str) -> Self {
        if let Some(element) = name.strip_suffix("[]") {
            return Self::Array(Box::new(Self::parse(element)));
        }
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" | "bigint" | "smallint" | "serial" => Self::Int,
            "float" | "double" | "real" | "numeric" | "decimal" => Self::Float,
            "string" | "str" | "text" | "varchar" => Self::String,
            "bool" | "boolean" => Self::Bool,
            "date" => Self::Date,
            "timestamp" | "datetime" | "timestamptz" => Self::Timestamp,
            "uuid" => Self::Uuid,
            "json" | "jsonb" => Self::Json,
            "bytes" | "bytea" => Self::Bytes,
            "vector" => Self::Vector,
            _ => Self::Custom(name.to_string()),
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    /// True if this type or its element type is outside the vocabulary.
    pub fn is_custom(&self) -> bool {
        match self {
            Self::Custom(_) => true,
            Self::Array(element) => element.is_custom(),
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::Bytes => "bytes",
            Self::Vector => "vector",
            Self::Array(element) => return write!(f, "{element}[]"),
            Self::Custom(name) => name,
        };
        f.write_str(name)
    }
}

impl Serialize for ParamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
