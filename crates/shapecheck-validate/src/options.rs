//! # Validator Options
//!
//! Knobs a host can set on a [`Validator`](crate::Validator). The struct
//! deserializes with serde so it can sit inside the host's own configuration;
//! missing keys fall back to [`ValidateOptions::default`].

use serde::{Deserialize, Serialize};

/// Default bound on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateOptions {
    /// Deepest level at which any value, container or scalar, may sit. The
    /// root value is level 0.
    pub max_depth: usize,

    /// Reject record inputs that carry keys the record does not declare.
    /// When `false`, such keys are dropped from the constructed record.
    pub deny_unknown_fields: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            deny_unknown_fields: true,
        }
    }
}
