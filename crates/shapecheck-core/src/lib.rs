//! # shapecheck-core — Foundational Types for shapecheck
//!
//! Defines the vocabulary every other shapecheck crate speaks: the generic
//! value tree that arrives from a loader, the closed schema sum type that
//! describes what the value must look like, and the path-annotated error
//! returned when it does not.
//!
//! ## Key Design Principles
//!
//! 1. **One value tree.** Input values are `serde_json::Value` with
//!    insertion-ordered maps. Loaders for other formats convert into it
//!    (see [`convert::yaml_to_value`]).
//!
//! 2. **Closed schema.** [`Schema`] is an enum with one variant per kind.
//!    Dispatch is an exhaustive `match`; adding a kind forces every
//!    consumer to handle it.
//!
//! 3. **Immutable errors.** [`ParseError`] is a plain value. Each level of a
//!    traversal that sees a failure returns a new error with its own path
//!    segment prefixed via [`ParseError::with_prefix`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shapecheck-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - No file or network I/O.

pub mod convert;
pub mod error;
pub mod schema;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use convert::{yaml_to_value, ConversionError};
pub use error::{prefix_path, ParseError, MISSING_ARGUMENT};
pub use schema::{FieldDefault, FieldSchema, PrimitiveKind, RecordSchema, Schema};
pub use value::{Map, Value, ValueKind};
