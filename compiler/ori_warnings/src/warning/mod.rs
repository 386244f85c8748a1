//! Warning records.
//!
//! A `Warning` pairs an opaque payload with an opaque origin and a sequence
//! id that places it in the execution's recency order. Records are immutable:
//! reassigning one returns a new record with an extra history entry and the
//! same payload, origin, and id.
//!
//! # Identity
//!
//! Two records denote the same warning when their payload and origin tokens
//! are identical (see [`WarningKey`]). The sequence id and the reassignment
//! history do not take part, so a warning that was reassigned, or raised
//! again with the same tokens, still deduplicates against the original.

use std::cmp::Ordering;
use std::fmt;

use crate::context::WarningContext;
use crate::opaque::Opaque;
use crate::reassignment::{Reassignment, ReassignmentHistory, ReassignmentIter, SourceLocation};
use crate::sequence::SequenceId;

/// Deduplication identity of a warning: `(payload, origin)` by token identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WarningKey {
    payload: Opaque,
    origin: Opaque,
}

/// An immutable warning record.
#[derive(Clone, Debug)]
pub struct Warning {
    payload: Opaque,
    origin: Opaque,
    sequence_id: SequenceId,
    reassignments: ReassignmentHistory,
}

impl Warning {
    /// Create a record with an explicit sequence id and no history.
    pub fn new(payload: Opaque, origin: Opaque, sequence_id: SequenceId) -> Self {
        Warning {
            payload,
            origin,
            sequence_id,
            reassignments: ReassignmentHistory::new(),
        }
    }

    /// Create a record with the next sequence id of `ctx`.
    pub fn create(ctx: &WarningContext, payload: Opaque, origin: Opaque) -> Self {
        Self::new(payload, origin, ctx.next_sequence_id())
    }

    #[inline]
    pub fn payload(&self) -> &Opaque {
        &self.payload
    }

    #[inline]
    pub fn origin(&self) -> &Opaque {
        &self.origin
    }

    #[inline]
    pub fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    #[inline]
    pub fn key(&self) -> WarningKey {
        WarningKey {
            payload: self.payload.clone(),
            origin: self.origin.clone(),
        }
    }

    /// Whether both records denote the same warning.
    #[inline]
    pub fn same_warning(&self, other: &Warning) -> bool {
        self.payload.ptr_eq(&other.payload) && self.origin.ptr_eq(&other.origin)
    }

    /// The reassignment history, most recent first.
    pub fn reassignments(&self) -> ReassignmentIter<'_> {
        self.reassignments.iter()
    }

    pub fn reassignment_history(&self) -> &ReassignmentHistory {
        &self.reassignments
    }

    /// Record that this warning crossed the boundary `site_name`.
    ///
    /// Returns a new record; `self` is left as it was.
    #[must_use]
    pub fn reassign(&self, site_name: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Warning {
            payload: self.payload.clone(),
            origin: self.origin.clone(),
            sequence_id: self.sequence_id,
            reassignments: self
                .reassignments
                .prepend(Reassignment::new(site_name, location)),
        }
    }

    /// Order by sequence id, most recent first.
    pub fn compare_by_recency(a: &Warning, b: &Warning) -> Ordering {
        b.sequence_id.cmp(&a.sequence_id)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload)
    }
}
