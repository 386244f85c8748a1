//! Recency order for warnings.
//!
//! Every warning carries a `SequenceId` drawn from a `SequenceSource`. Ids
//! from one source are unique and strictly increasing in issue order, which
//! gives all warnings of an execution a single total recency order.
//!
//! The source is an ordinary value owned by a `WarningContext`, not a global.
//! Concurrent callers share it by reference; issuing an id is one atomic
//! `fetch_add` and never blocks.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Position of a warning in the recency order. Larger is more recent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(u64);

impl SequenceId {
    /// Wrap a raw id.
    ///
    /// Ids normally come from [`SequenceSource::next_id`]; this exists for
    /// records rebuilt from external storage and for tests.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        SequenceId(raw)
    }

    /// The raw id.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues unique, strictly increasing sequence ids.
///
/// # Thread Safety
/// `next_id` takes `&self` and is a single atomic read-modify-write, so any
/// number of threads may draw ids without lost or duplicate values.
pub struct SequenceSource {
    next: AtomicU64,
}

impl SequenceSource {
    /// Create a source whose first id is `1`.
    pub const fn new() -> Self {
        SequenceSource {
            next: AtomicU64::new(1),
        }
    }

    /// Issue the next id.
    #[inline]
    pub fn next_id(&self) -> SequenceId {
        // Relaxed is enough: the RMW itself totally orders all issued ids.
        SequenceId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed).saturating_sub(1)
    }
}

impl Default for SequenceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SequenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceSource")
            .field("issued", &self.issued())
            .finish()
    }
}
