//! Runtime parameter values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::ParamType;

/// A value supplied for one parameter.
///
/// Untagged, so a JSON parameter object deserializes directly into
/// [`ParamValues`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
}

/// Parameter name to value, as supplied by the caller.
pub type ParamValues = IndexMap<String, Value>;

impl Value {
    /// Short name of the value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
        }
    }

    /// Gate truthiness: `Null` is false, non-booleans have none.
    pub fn as_gate(&self) -> Option<bool> {
        match self {
            Self::Null => Some(false),
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this value can be bound to a parameter of type `ty`.
    ///
    /// `Null` fits every type. Types the compiler does not know accept
    /// anything.
    pub fn fits(&self, ty: &ParamType) -> bool {
        match (self, ty) {
            (Self::Null, _) => true,
            (_, ParamType::Json | ParamType::Custom(_)) => true,
            (Self::Int(_), ParamType::Int | ParamType::Float) => true,
            (Self::Float(_), ParamType::Float) => true,
            (Self::Bool(_), ParamType::Bool) => true,
            (
                Self::String(_),
                ParamType::String
                | ParamType::Date
                | ParamType::Timestamp
                | ParamType::Uuid
                | ParamType::Bytes,
            ) => true,
            (Self::Array(items), ParamType::Vector) => items
                .iter()
                .all(|v| matches!(v, Self::Int(_) | Self::Float(_))),
            (Self::Array(items), ParamType::Bytes) => items
                .iter()
                .all(|v| matches!(v, Self::Int(0..=255))),
            (Self::Array(items), ParamType::Array(element)) => {
                items.iter().all(|v| v.fits(element))
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
