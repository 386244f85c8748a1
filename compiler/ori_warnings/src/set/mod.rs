//! Capped, deduplicated, recency-ordered warning sets.
//!
//! A `WarningSet` holds at most `K` warnings (its `WarningLimit`), no two of
//! which are the same warning (see `WarningKey`), and always lists them most
//! recent first. Sets are immutable: entries live in a shared `Arc<[Warning]>`
//! kept sorted by descending sequence id, so cloning is O(1) and ordered
//! iteration never sorts.
//!
//! # Overflow
//!
//! The two ways of growing a set treat the cap differently:
//!
//! | Operation | Duplicate | Over the cap |
//! |-----------|-----------|--------------|
//! | `insert`  | keep the existing record (earliest wins) | reject the new record |
//! | `union`   | keep the larger sequence id | drop the smallest sequence ids |
//!
//! Neither is an error. `Insertion::outcome` and `Merged::dropped` tell the
//! caller to raise its sticky `limit_reached` flag.

use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::config::WarningLimit;
use crate::warning::{Warning, WarningKey};

/// Result of inserting one record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InsertOutcome {
    /// The record was added.
    Added,
    /// The same warning was already present; the set is unchanged.
    Duplicate,
    /// The set was full; the record was rejected and the set is unchanged.
    OverCapacity,
}

/// A set produced by [`WarningSet::insert`].
#[derive(Clone, Debug)]
pub struct Insertion {
    pub set: WarningSet,
    pub outcome: InsertOutcome,
}

impl Insertion {
    /// Whether the record was added.
    #[inline]
    pub fn accepted(&self) -> bool {
        self.outcome == InsertOutcome::Added
    }
}

/// A set produced by merging, with the number of entries lost to the cap.
#[derive(Clone, Debug)]
pub struct Merged {
    pub set: WarningSet,
    pub dropped: usize,
}

impl Merged {
    /// Whether any entry was dropped due to capacity.
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.dropped > 0
    }
}

/// An immutable, capped set of warnings ordered most recent first.
#[derive(Clone)]
pub struct WarningSet {
    /// Sorted by descending sequence id; `len() <= limit`.
    entries: Arc<[Warning]>,
    limit: WarningLimit,
}

impl WarningSet {
    /// An empty set with capacity `limit`.
    pub fn empty(limit: WarningLimit) -> Self {
        WarningSet {
            entries: Arc::from(Vec::new()),
            limit,
        }
    }

    /// A set holding exactly `warning`. Always fits since `limit >= 1`.
    pub fn singleton(warning: Warning, limit: WarningLimit) -> Self {
        WarningSet {
            entries: Arc::from(vec![warning]),
            limit,
        }
    }

    /// Build a set from records in any order, with `union` semantics.
    ///
    /// Duplicates keep their most recent record; if more than `limit`
    /// distinct warnings remain, the oldest are dropped.
    pub fn from_records<I>(records: I, limit: WarningLimit) -> Merged
    where
        I: IntoIterator<Item = Warning>,
    {
        let mut merged: SmallVec<[Warning; 8]> = SmallVec::new();
        let mut index: FxHashMap<WarningKey, usize> = FxHashMap::default();

        for record in records {
            match index.entry(record.key()) {
                Entry::Occupied(slot) => {
                    let existing = &mut merged[*slot.get()];
                    if record.sequence_id() > existing.sequence_id() {
                        *existing = record;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(merged.len());
                    merged.push(record);
                }
            }
        }

        // Stable: records sharing an id keep their first-seen order.
        merged.sort_by(Warning::compare_by_recency);

        let dropped = merged.len().saturating_sub(limit.get());
        if dropped > 0 {
            merged.truncate(limit.get());
            tracing::debug!(
                dropped,
                limit = limit.get(),
                "warning limit reached while merging"
            );
        }
        tracing::trace!(len = merged.len(), dropped, "merged warning sets");

        Merged {
            set: WarningSet {
                entries: merged.into_iter().collect(),
                limit,
            },
            dropped,
        }
    }

    /// Insert one record.
    ///
    /// A duplicate of a present warning leaves the set unchanged, so the
    /// earlier sequence id is retained. A new warning on a full set is
    /// rejected with [`InsertOutcome::OverCapacity`].
    pub fn insert(&self, warning: Warning) -> Insertion {
        let outcome = if self.contains(&warning) {
            InsertOutcome::Duplicate
        } else if self.is_full() {
            InsertOutcome::OverCapacity
        } else {
            InsertOutcome::Added
        };
        tracing::trace!(sequence_id = %warning.sequence_id(), ?outcome, "warning set insert");

        if outcome != InsertOutcome::Added {
            return Insertion {
                set: self.clone(),
                outcome,
            };
        }

        let at = self
            .entries
            .partition_point(|w| w.sequence_id() > warning.sequence_id());
        let mut entries = Vec::with_capacity(self.entries.len().saturating_add(1));
        entries.extend_from_slice(&self.entries[..at]);
        entries.push(warning);
        entries.extend_from_slice(&self.entries[at..]);

        Insertion {
            set: WarningSet {
                entries: Arc::from(entries),
                limit: self.limit,
            },
            outcome,
        }
    }

    /// Merge two sets from the same capacity domain.
    ///
    /// Duplicates keep the record with the larger sequence id. The result is
    /// capped to this set's limit by dropping the oldest entries.
    pub fn union(&self, other: &WarningSet) -> Merged {
        if other.is_empty() {
            return Merged {
                set: self.clone(),
                dropped: 0,
            };
        }
        Self::from_records(self.iter().chain(other.iter()).cloned(), self.limit)
    }

    /// Apply `f` to every record.
    ///
    /// `f` must keep each record's identity and sequence id (as
    /// [`Warning::reassign`] does), so order and uniqueness carry over.
    #[must_use]
    pub fn map_records(&self, f: impl FnMut(&Warning) -> Warning) -> Self {
        let entries: Arc<[Warning]> = self.entries.iter().map(f).collect();
        debug_assert!(entries
            .windows(2)
            .all(|w| w[0].sequence_id() >= w[1].sequence_id()));
        WarningSet {
            entries,
            limit: self.limit,
        }
    }

    /// Iterate most recent first.
    ///
    /// The iterator borrows the set's immutable snapshot and can be cloned
    /// to restart from the same position.
    pub fn iter(&self) -> WarningSetIter<'_> {
        WarningSetIter(self.entries.iter())
    }

    /// Collect the warnings, most recent first.
    pub fn to_vec(&self) -> Vec<Warning> {
        self.entries.to_vec()
    }

    /// Whether the same warning (by identity) is present.
    pub fn contains(&self, warning: &Warning) -> bool {
        self.entries.iter().any(|w| w.same_warning(warning))
    }

    /// The record of the same warning, if present.
    pub fn get(&self, warning: &Warning) -> Option<&Warning> {
        self.entries.iter().find(|w| w.same_warning(warning))
    }

    /// The most recent warning.
    pub fn latest(&self) -> Option<&Warning> {
        self.entries.first()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.limit.get()
    }

    #[inline]
    pub fn limit(&self) -> WarningLimit {
        self.limit
    }
}

impl fmt::Debug for WarningSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarningSet")
            .field("limit", &self.limit.get())
            .field("entries", &self.entries)
            .finish()
    }
}

impl<'a> IntoIterator for &'a WarningSet {
    type Item = &'a Warning;
    type IntoIter = WarningSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`WarningSet`], most recent first.
#[derive(Clone, Debug)]
pub struct WarningSetIter<'a>(std::slice::Iter<'a, Warning>);

impl<'a> Iterator for WarningSetIter<'a> {
    type Item = &'a Warning;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for WarningSetIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl ExactSizeIterator for WarningSetIter<'_> {}

#[cfg(test)]
mod tests;
