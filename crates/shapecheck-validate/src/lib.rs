//! # shapecheck-validate — Schema-Directed Validation
//!
//! Checks a generic value tree (already loaded by the host) against a
//! [`Schema`](shapecheck_core::Schema) and returns a typed, defensively
//! copied result, or the first mismatch with its location.
//!
//! ## Entry Points
//!
//! - [`validate`] / [`Validator::validate`] — dynamic validation producing a
//!   [`TypedValue`] tree.
//! - [`parse`] / [`Validator::parse`] — validation followed by construction
//!   of a Rust type implementing [`Shaped`].
//!
//! ## Errors
//!
//! Every failure is a [`ParseError`](shapecheck_core::ParseError) whose path
//! reads from the root of the input to the offending value:
//!
//! ```text
//! ".nested_param.leaf.final" contains integer (42), but expected string
//! Argument missed for integer | null at ".age"
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `shapecheck-core` internally.
//! - Validation never mutates its input and never returns data that aliases
//!   it.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod options;
pub mod shaped;
pub mod typed;
pub mod validator;

pub use options::{ValidateOptions, DEFAULT_MAX_DEPTH};
pub use shaped::{Fields, OpaqueList, Shaped};
pub use typed::{Record, TypedValue};
pub use validator::{parse, validate, Validator};
