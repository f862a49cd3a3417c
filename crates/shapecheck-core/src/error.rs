//! # Error Types — Path-Annotated Parse Errors
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Path Protocol
//!
//! An error is created with an empty path at the point where the mismatch is
//! found. Every enclosing level of the traversal that returns the error first
//! prefixes its own segment (field name, map key, or sequence index) with
//! [`ParseError::with_prefix`], producing a new error. By the time the error
//! reaches the caller, the path reads from the validation root to the failing
//! leaf, e.g. `.nested_param.leaf.final`.
//!
//! A missing required field is the one error raised with a non-empty path:
//! it names the field that is absent (`.age`).

use thiserror::Error;

use crate::schema::{FieldSchema, Schema};
use crate::value::{Value, ValueKind};

/// Message of the [`ParseError::ArgumentError`] raised for a required field
/// absent from the input.
pub const MISSING_ARGUMENT: &str = "Argument missed";

/// Failure to match a value against a schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The value's runtime shape does not match the schema at this point.
    #[error("\"{path}\" contains {} ({got}), but expected {expected}", ValueKind::of(.got))]
    UnexpectedType {
        /// Dot-separated location of the offending value.
        path: String,
        /// Schema the value was checked against.
        expected: Schema,
        /// The offending value.
        got: Value,
    },

    /// A required record field is absent, or the record could not be built.
    #[error("{message} for {expected} at \"{path}\"")]
    ArgumentError {
        /// Dot-separated location of the field or record.
        path: String,
        /// Schema of the missing field, or of the record that failed to build.
        expected: Schema,
        /// What went wrong.
        message: String,
    },

    /// The input nests deeper than the validator is configured to follow.
    #[error("\"{path}\" exceeds the maximum nesting depth of {limit}")]
    DepthExceeded {
        /// Dot-separated location where the limit was crossed.
        path: String,
        /// Configured limit.
        limit: usize,
    },
}

impl ParseError {
    /// Type mismatch at the current location.
    pub fn unexpected_type(expected: &Schema, got: &Value) -> Self {
        Self::UnexpectedType {
            path: String::new(),
            expected: expected.clone(),
            got: got.clone(),
        }
    }

    /// Record construction failure at the current location.
    pub fn argument(expected: &Schema, message: impl Into<String>) -> Self {
        Self::ArgumentError {
            path: String::new(),
            expected: expected.clone(),
            message: message.into(),
        }
    }

    /// Required field absent from the input. The path names the field.
    pub fn missing_field(field: &FieldSchema) -> Self {
        Self::ArgumentError {
            path: prefix_path(field.name(), ""),
            expected: field.schema().clone(),
            message: MISSING_ARGUMENT.to_string(),
        }
    }

    /// Nesting limit crossed at the current location.
    pub fn depth_exceeded(limit: usize) -> Self {
        Self::DepthExceeded {
            path: String::new(),
            limit,
        }
    }

    /// Location of the failure relative to the validation root.
    pub fn path(&self) -> &str {
        match self {
            Self::UnexpectedType { path, .. }
            | Self::ArgumentError { path, .. }
            | Self::DepthExceeded { path, .. } => path,
        }
    }

    /// Schema the failing value was checked against, if any.
    pub fn expected(&self) -> Option<&Schema> {
        match self {
            Self::UnexpectedType { expected, .. } | Self::ArgumentError { expected, .. } => {
                Some(expected)
            }
            Self::DepthExceeded { .. } => None,
        }
    }

    /// Return the same error located one level further out, under `segment`.
    #[must_use]
    pub fn with_prefix(self, segment: &str) -> Self {
        match self {
            Self::UnexpectedType { path, expected, got } => Self::UnexpectedType {
                path: prefix_path(segment, &path),
                expected,
                got,
            },
            Self::ArgumentError {
                path,
                expected,
                message,
            } => Self::ArgumentError {
                path: prefix_path(segment, &path),
                expected,
                message,
            },
            Self::DepthExceeded { path, limit } => Self::DepthExceeded {
                path: prefix_path(segment, &path),
                limit,
            },
        }
    }
}

/// Prepend `segment` to a dot-separated path.
///
/// `prefix_path("root", ".test.leaf")` is `.root.test.leaf`;
/// `prefix_path("root", "")` is `.root`.
pub fn prefix_path(segment: &str, path: &str) -> String {
    if path.is_empty() {
        format!(".{segment}")
    } else {
        format!(".{segment}{path}")
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Prefixing segments innermost-first yields them joined root-first.
        #[test]
        fn prefixes_compose(segments in prop::collection::vec("[a-z0-9_]{1,8}", 1..6)) {
            let err = segments
                .iter()
                .rev()
                .fold(ParseError::depth_exceeded(1), |err, segment| err.with_prefix(segment));
            let expected: String = segments.iter().map(|s| format!(".{s}")).collect();
            prop_assert_eq!(err.path(), expected.as_str());
        }
    }
}
