//! Element-indexed wrapping for warnings raised inside collection maps.

use std::fmt;

use crate::context::WarningContext;
use crate::opaque::Opaque;
use crate::warning::Warning;

/// Payload of a warning raised while mapping element `index` of a collection.
///
/// The inner payload is kept as a token; nested maps produce nested
/// `MapError`s, outermost index first when displayed.
#[derive(Clone, Debug)]
pub struct MapError {
    index: u64,
    inner: Opaque,
}

impl MapError {
    pub fn new(index: u64, inner: Opaque) -> Self {
        MapError { index, inner }
    }

    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    #[inline]
    pub fn inner(&self) -> &Opaque {
        &self.inner
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error at index {}: {}", self.index, self.inner)
    }
}

/// Re-issue `warning` as a [`MapError`] for element `index`.
///
/// The result is a new warning: fresh sequence id, a new payload token, the
/// original origin, and an empty history. It does not deduplicate against
/// `warning` or against another wrapping of it.
pub fn wrap_as_map_error(ctx: &WarningContext, warning: &Warning, index: u64) -> Warning {
    let payload = Opaque::new(MapError::new(index, warning.payload().clone()));
    Warning::create(ctx, payload, warning.origin().clone())
}
