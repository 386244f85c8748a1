//! The warnings capability answered by foreign values.
//!
//! Some values are owned outside the interpreter and keep their own warning
//! storage. Instead of being re-wrapped, they implement `WarningsCapability`
//! and the dispatch layer routes every warnings operation through it.
//!
//! This crate consumes the trait; it never implements it for values it does
//! not own.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::warning::Warning;

/// A foreign value could not answer a capability message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unsupported message: {reason}")]
pub struct UnsupportedMessage {
    reason: String,
}

impl UnsupportedMessage {
    pub fn new(reason: impl Into<String>) -> Self {
        UnsupportedMessage {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Warnings interface of an externally owned value.
///
/// Every message may fail with [`UnsupportedMessage`]; the dispatch layer
/// treats any such failure as a fatal contract violation.
pub trait WarningsCapability: fmt::Debug + Send + Sync {
    /// Name used in diagnostics when the value breaks its contract.
    fn type_name(&self) -> &str {
        "foreign value"
    }

    /// Whether the value currently carries any warnings.
    fn has_warnings(&self) -> Result<bool, UnsupportedMessage>;

    /// The warnings carried by the value, in any order.
    fn get_warnings(&self) -> Result<Vec<Warning>, UnsupportedMessage>;

    /// A copy of this value carrying exactly `warnings`.
    ///
    /// `warnings` is already deduplicated, capped, and ordered most recent
    /// first. `limit_reached` is passed along because the foreign value cannot
    /// know the capacity the runtime enforces.
    fn set_warnings(
        &self,
        warnings: Vec<Warning>,
        limit_reached: bool,
    ) -> Result<ForeignValue, UnsupportedMessage>;

    /// Whether warnings were ever dropped from this value due to capacity.
    fn is_limit_reached(&self) -> Result<bool, UnsupportedMessage>;
}

/// Shared handle to a value implementing [`WarningsCapability`].
#[derive(Clone)]
pub struct ForeignValue(Arc<dyn WarningsCapability>);

impl ForeignValue {
    pub fn new<T: WarningsCapability + 'static>(value: T) -> Self {
        ForeignValue(Arc::new(value))
    }

    pub fn from_arc(value: Arc<dyn WarningsCapability>) -> Self {
        ForeignValue(value)
    }

    #[inline]
    pub fn capability(&self) -> &dyn WarningsCapability {
        &*self.0
    }

    /// Whether both handles refer to the same foreign object.
    pub fn ptr_eq(&self, other: &ForeignValue) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for ForeignValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ForeignValue").field(&self.0).finish()
    }
}
