//! Error types for the warnings runtime.
//!
//! Attaching, merging, and querying warnings are total over bare and wrapped
//! values, and capacity overflow is a flag rather than an error. What remains
//! is configuration parsing and foreign values that fail to answer the
//! warnings capability they claim to implement.

use std::num::ParseIntError;

use thiserror::Error;

use crate::capability::UnsupportedMessage;

/// Failure of a warnings operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WarningsError {
    /// A foreign value did not answer a warnings capability message.
    ///
    /// This is a broken invariant of the foreign value, not a condition the
    /// caller can retry.
    #[error("foreign value `{type_name}` failed to answer `{operation}`: {source}")]
    CapabilityViolation {
        type_name: String,
        operation: &'static str,
        #[source]
        source: UnsupportedMessage,
    },
}

/// Invalid warnings configuration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid warnings limit `{value}`: {source}")]
    InvalidLimit {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("warnings limit must be at least 1")]
    ZeroLimit,

    #[error("warnings limit variable `{name}` is not valid unicode")]
    NotUnicode { name: &'static str },
}
