//! Values annotated with warnings.
//!
//! `WithWarnings<V>` pairs a base value with a `WarningSet` and a sticky
//! `limit_reached` flag. The base value is never mutated or inspected.
//! Attaching returns a new wrapper; the old wrapper stays valid and unchanged,
//! so a value can be shared freely while later computation extends a copy.

use std::fmt;

use crate::config::WarningLimit;
use crate::reassignment::SourceLocation;
use crate::set::{InsertOutcome, Merged, WarningSet};
use crate::warning::Warning;

/// A base value carrying warnings.
#[derive(Clone, Debug)]
pub struct WithWarnings<V> {
    value: V,
    warnings: WarningSet,
    /// Set once any warning was rejected or dropped for capacity; never cleared.
    limit_reached: bool,
}

impl<V> WithWarnings<V> {
    /// Annotate `value` with a single warning.
    pub fn wrap(value: V, warning: Warning, limit: WarningLimit) -> Self {
        WithWarnings {
            value,
            warnings: WarningSet::singleton(warning, limit),
            limit_reached: false,
        }
    }

    /// Annotate `value` with `warnings`, using merge semantics.
    ///
    /// If more distinct warnings are given than fit, the oldest are dropped
    /// and the wrapper starts out with `limit_reached` set.
    pub fn from_records<I>(value: V, warnings: I, limit: WarningLimit) -> Self
    where
        I: IntoIterator<Item = Warning>,
    {
        Self::from_merged(value, WarningSet::from_records(warnings, limit), false)
    }

    /// Assemble a wrapper from an existing set.
    pub fn from_parts(value: V, warnings: WarningSet, limit_reached: bool) -> Self {
        WithWarnings {
            value,
            warnings,
            limit_reached,
        }
    }

    fn from_merged(value: V, merged: Merged, limit_reached: bool) -> Self {
        let overflowed = merged.overflowed();
        if overflowed && !limit_reached {
            tracing::debug!(
                limit = merged.set.limit().get(),
                dropped = merged.dropped,
                "value reached its warnings limit"
            );
        }
        WithWarnings {
            value,
            warnings: merged.set,
            limit_reached: limit_reached || overflowed,
        }
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Strip the annotation, returning the base value.
    pub fn into_inner(self) -> V {
        self.value
    }

    pub fn into_parts(self) -> (V, WarningSet, bool) {
        (self.value, self.warnings, self.limit_reached)
    }

    #[inline]
    pub fn warnings(&self) -> &WarningSet {
        &self.warnings
    }

    /// The warnings, most recent first.
    pub fn warnings_as_ordered_list(&self) -> Vec<Warning> {
        self.warnings.to_vec()
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Whether a warning was ever lost to the capacity limit.
    #[inline]
    pub fn is_limit_reached(&self) -> bool {
        self.limit_reached
    }
}

impl<V: Clone> WithWarnings<V> {
    /// Strip the annotation, returning a copy of the base value.
    ///
    /// The wrapper itself is left untouched.
    pub fn unwrap(&self) -> V {
        self.value.clone()
    }

    /// Attach one more warning.
    ///
    /// A duplicate leaves the set as is. A new warning on a full set is
    /// rejected and raises `limit_reached`.
    #[must_use]
    pub fn attach(&self, warning: Warning) -> Self {
        let insertion = self.warnings.insert(warning);
        let rejected = insertion.outcome == InsertOutcome::OverCapacity;
        if rejected && !self.limit_reached {
            tracing::debug!(
                limit = insertion.set.limit().get(),
                "value reached its warnings limit"
            );
        }
        WithWarnings {
            value: self.value.clone(),
            warnings: insertion.set,
            limit_reached: self.limit_reached || rejected,
        }
    }

    /// Attach several warnings at once, using merge semantics.
    ///
    /// Duplicates keep their most recent record and overflow drops the
    /// oldest warnings, including ones that were already attached.
    #[must_use]
    pub fn attach_all<I>(&self, warnings: I) -> Self
    where
        I: IntoIterator<Item = Warning>,
    {
        let merged = WarningSet::from_records(
            self.warnings.iter().cloned().chain(warnings),
            self.warnings.limit(),
        );
        Self::from_merged(self.value.clone(), merged, self.limit_reached)
    }

    /// Merge another value's warnings into this one.
    ///
    /// `limit_reached` is the other value's flag; it carries over.
    #[must_use]
    pub fn merge(&self, warnings: &WarningSet, limit_reached: bool) -> Self {
        let merged = self.warnings.union(warnings);
        Self::from_merged(
            self.value.clone(),
            merged,
            self.limit_reached || limit_reached,
        )
    }

    /// Record that every warning crossed the boundary `site_name`.
    #[must_use]
    pub fn reassign(&self, site_name: &str, location: Option<&SourceLocation>) -> Self {
        WithWarnings {
            value: self.value.clone(),
            warnings: self
                .warnings
                .map_records(|w| w.reassign(site_name, location.cloned())),
            limit_reached: self.limit_reached,
        }
    }
}

impl<V: fmt::Display> fmt::Display for WithWarnings<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
