//! # Generic Value Tree
//!
//! The untyped input representation. A value is whatever an upstream loader
//! produced: maps with string keys, sequences and scalars. shapecheck reuses
//! `serde_json::Value` for this with the `preserve_order` feature enabled, so
//! map iteration follows insertion order.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use serde_json::{Map, Value};

/// Runtime type of a [`Value`].
///
/// Numbers are split by representation: a number that fits `i64` or `u64`
/// is an integer, anything else is a float. `20.0` is therefore a float even
/// though its fractional part is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Sequence,
    Mapping,
}

impl ValueKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Sequence,
            Value::Object(_) => Self::Mapping,
        }
    }

    /// Lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
