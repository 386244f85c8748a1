//! Ori Warnings - value-attached runtime warnings for the Ori interpreter.
//!
//! A warning is a side-channel diagnostic that travels with a value instead
//! of interrupting evaluation. This crate provides:
//! - Warning records (`Warning`) with a process-wide recency order (`SequenceId`)
//! - Capped, deduplicated, recency-ordered collections (`WarningSet`)
//! - The annotated value wrapper (`WithWarnings`)
//! - Uniform attachment over bare, wrapped, and foreign values (`WarnedValue`)
//!
//! # Value Shapes
//!
//! Every runtime value seen by this crate is one of three shapes:
//!
//! ```text
//! Bare(v)          no warnings, no wrapper
//! Wrapped(w)       WithWarnings { value, warnings, limit_reached }
//! Foreign(f)       externally owned value answering WarningsCapability
//! ```
//!
//! Callers go through `WarnedValue` and never special-case a shape.
//!
//! # Immutability
//!
//! Records, sets, and wrappers are never mutated after construction. Every
//! "modifying" operation returns a new value and shares storage with the old
//! one where it can. The only shared mutable state is the atomic counter in
//! `SequenceSource`, owned by a `WarningContext`.
//!
//! # Capacity
//!
//! Each set is capped by the context's `WarningLimit`. Overflow is never an
//! error: a single insert past the cap is rejected, a merge past the cap drops
//! the oldest entries, and both raise the sticky `limit_reached` flag.

mod capability;
mod config;
mod context;
mod dispatch;
mod errors;
mod map_error;
mod opaque;
mod reassignment;
mod sequence;
mod set;
mod warning;
mod with_warnings;

pub use capability::{ForeignValue, UnsupportedMessage, WarningsCapability};
pub use config::{WarningLimit, WarningsConfig, DEFAULT_WARNINGS_LIMIT, WARNINGS_LIMIT_ENV};
pub use context::WarningContext;
pub use dispatch::WarnedValue;
pub use errors::{ConfigError, WarningsError};
pub use map_error::{wrap_as_map_error, MapError};
pub use opaque::{Opaque, OpaqueObject};
pub use reassignment::{Reassignment, ReassignmentHistory, ReassignmentIter, SourceLocation};
pub use sequence::{SequenceId, SequenceSource};
pub use set::{InsertOutcome, Insertion, Merged, WarningSet, WarningSetIter};
pub use warning::{Warning, WarningKey};
pub use with_warnings::WithWarnings;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=ori_warnings=debug` or `RUST_LOG=ori_warnings=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Fixtures panic on invalid test setup")]
mod test_helpers;
