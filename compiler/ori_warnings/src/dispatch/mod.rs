//! Uniform warning operations over every runtime value shape.
//!
//! A runtime value reaching a warning site is one of three shapes:
//!
//! - `Bare`: a plain value with no warnings.
//! - `Wrapped`: a value annotated by this crate ([`WithWarnings`]).
//! - `Foreign`: an externally owned value that stores its own warnings and
//!   answers the [`WarningsCapability`] messages. It is never re-wrapped.
//!
//! Each operation is one `match` over the shapes. Every operation has a
//! `try_*` form returning [`WarningsError`] when a foreign value fails to
//! answer; the plain form panics with the error's message, since a broken
//! capability is a bug in the foreign value and not something to retry.

use crate::capability::{ForeignValue, UnsupportedMessage, WarningsCapability};
use crate::config::WarningLimit;
use crate::context::WarningContext;
use crate::errors::WarningsError;
use crate::opaque::Opaque;
use crate::reassignment::SourceLocation;
use crate::set::{InsertOutcome, WarningSet};
use crate::warning::Warning;
use crate::with_warnings::WithWarnings;

/// A runtime value in one of the three shapes that can carry warnings.
#[derive(Clone, Debug)]
pub enum WarnedValue<V> {
    Bare(V),
    Wrapped(WithWarnings<V>),
    Foreign(ForeignValue),
}

impl<V> From<WithWarnings<V>> for WarnedValue<V> {
    fn from(wrapped: WithWarnings<V>) -> Self {
        WarnedValue::Wrapped(wrapped)
    }
}

impl<V> From<ForeignValue> for WarnedValue<V> {
    fn from(foreign: ForeignValue) -> Self {
        WarnedValue::Foreign(foreign)
    }
}

/// Send one capability message, turning a refusal into a contract violation.
fn ask<T>(
    foreign: &ForeignValue,
    operation: &'static str,
    message: impl FnOnce(&dyn WarningsCapability) -> Result<T, UnsupportedMessage>,
) -> Result<T, WarningsError> {
    let capability = foreign.capability();
    message(capability).map_err(|source| {
        tracing::error!(
            type_name = capability.type_name(),
            operation,
            reason = source.reason(),
            "foreign value broke the warnings capability contract"
        );
        WarningsError::CapabilityViolation {
            type_name: capability.type_name().to_owned(),
            operation,
            source,
        }
    })
}

/// Read a foreign value's warnings into a set, with its limit flag.
///
/// The foreign list may be in any order and may repeat warnings; it is
/// normalized with merge semantics. Dropping entries here raises the flag.
fn foreign_state(
    foreign: &ForeignValue,
    limit: WarningLimit,
) -> Result<(WarningSet, bool), WarningsError> {
    if !ask(foreign, "has_warnings", |c| c.has_warnings())? {
        return Ok((WarningSet::empty(limit), false));
    }
    let records = ask(foreign, "get_warnings", |c| c.get_warnings())?;
    let reached = ask(foreign, "is_limit_reached", |c| c.is_limit_reached())?;
    let merged = WarningSet::from_records(records, limit);
    let overflowed = merged.overflowed();
    Ok((merged.set, reached || overflowed))
}

/// Hand a normalized set back to a foreign value.
fn foreign_replace(
    foreign: &ForeignValue,
    warnings: &WarningSet,
    limit_reached: bool,
) -> Result<ForeignValue, WarningsError> {
    ask(foreign, "set_warnings", |c| {
        c.set_warnings(warnings.to_vec(), limit_reached)
    })
}

impl<V> WarnedValue<V> {
    /// The base value, if this is not a foreign value.
    pub fn value(&self) -> Option<&V> {
        match self {
            WarnedValue::Bare(value) => Some(value),
            WarnedValue::Wrapped(wrapped) => Some(wrapped.value()),
            WarnedValue::Foreign(_) => None,
        }
    }

    /// Strip all warnings, returning the base value.
    ///
    /// Foreign values own their representation and yield `None`.
    pub fn into_value(self) -> Option<V> {
        match self {
            WarnedValue::Bare(value) => Some(value),
            WarnedValue::Wrapped(wrapped) => Some(wrapped.into_inner()),
            WarnedValue::Foreign(_) => None,
        }
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_has_warnings(&self) -> Result<bool, WarningsError> {
        match self {
            WarnedValue::Bare(_) => Ok(false),
            WarnedValue::Wrapped(wrapped) => Ok(!wrapped.warnings().is_empty()),
            WarnedValue::Foreign(foreign) => ask(foreign, "has_warnings", |c| c.has_warnings()),
        }
    }

    pub fn has_warnings(&self) -> bool {
        self.try_has_warnings().unwrap_or_else(|e| panic!("{}", e))
    }

    /// All warnings, most recent first.
    ///
    /// A foreign list is re-sorted and deduplicated, never truncated.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_get_warnings(&self) -> Result<Vec<Warning>, WarningsError> {
        match self {
            WarnedValue::Bare(_) => Ok(Vec::new()),
            WarnedValue::Wrapped(wrapped) => Ok(wrapped.warnings_as_ordered_list()),
            WarnedValue::Foreign(foreign) => {
                if !ask(foreign, "has_warnings", |c| c.has_warnings())? {
                    return Ok(Vec::new());
                }
                let records = ask(foreign, "get_warnings", |c| c.get_warnings())?;
                Ok(WarningLimit::new(records.len()).map_or_else(Vec::new, |limit| {
                    WarningSet::from_records(records, limit).set.to_vec()
                }))
            }
        }
    }

    pub fn get_warnings(&self) -> Vec<Warning> {
        self.try_get_warnings().unwrap_or_else(|e| panic!("{}", e))
    }

    /// Whether a warning was ever lost to the capacity limit.
    ///
    /// Only a value that carries warnings can report a reached limit; a
    /// foreign value is only asked about its limit when it reports warnings.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_is_limit_reached(&self) -> Result<bool, WarningsError> {
        match self {
            WarnedValue::Bare(_) => Ok(false),
            WarnedValue::Wrapped(wrapped) => {
                Ok(!wrapped.warnings().is_empty() && wrapped.is_limit_reached())
            }
            WarnedValue::Foreign(foreign) => {
                Ok(ask(foreign, "has_warnings", |c| c.has_warnings())?
                    && ask(foreign, "is_limit_reached", |c| c.is_limit_reached())?)
            }
        }
    }

    pub fn is_limit_reached(&self) -> bool {
        self.try_is_limit_reached().unwrap_or_else(|e| panic!("{}", e))
    }

    /// The warnings as a set under `limit`, with the limit flag.
    fn try_warning_state(&self, limit: WarningLimit) -> Result<(WarningSet, bool), WarningsError> {
        match self {
            WarnedValue::Bare(_) => Ok((WarningSet::empty(limit), false)),
            WarnedValue::Wrapped(wrapped) => {
                let warnings = wrapped.warnings();
                Ok((
                    warnings.clone(),
                    !warnings.is_empty() && wrapped.is_limit_reached(),
                ))
            }
            WarnedValue::Foreign(foreign) => foreign_state(foreign, limit),
        }
    }
}

impl<V: Clone> WarnedValue<V> {
    /// Attach one warning.
    ///
    /// The result keeps `min(distinct_before + 1, limit)` distinct warnings:
    /// a warning that does not fit is rejected and the limit flag is raised.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_attach(&self, warning: Warning, limit: WarningLimit) -> Result<Self, WarningsError> {
        match self {
            WarnedValue::Bare(value) => Ok(WarnedValue::Wrapped(WithWarnings::wrap(
                value.clone(),
                warning,
                limit,
            ))),
            WarnedValue::Wrapped(wrapped) => Ok(WarnedValue::Wrapped(wrapped.attach(warning))),
            WarnedValue::Foreign(foreign) => {
                let (set, reached) = foreign_state(foreign, limit)?;
                let insertion = set.insert(warning);
                let rejected = insertion.outcome == InsertOutcome::OverCapacity;
                if rejected && !reached {
                    tracing::debug!(
                        limit = limit.get(),
                        "foreign value reached its warnings limit"
                    );
                }
                foreign_replace(foreign, &insertion.set, reached || rejected)
                    .map(WarnedValue::Foreign)
            }
        }
    }

    pub fn attach(&self, warning: Warning, limit: WarningLimit) -> Self {
        self.try_attach(warning, limit).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Attach several warnings with merge semantics.
    ///
    /// Duplicates keep their most recent record and overflow drops the oldest.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_attach_all<I>(&self, warnings: I, limit: WarningLimit) -> Result<Self, WarningsError>
    where
        I: IntoIterator<Item = Warning>,
    {
        match self {
            WarnedValue::Bare(value) => {
                let merged = WarningSet::from_records(warnings, limit);
                if merged.set.is_empty() {
                    return Ok(self.clone());
                }
                let overflowed = merged.overflowed();
                Ok(WarnedValue::Wrapped(WithWarnings::from_parts(
                    value.clone(),
                    merged.set,
                    overflowed,
                )))
            }
            WarnedValue::Wrapped(wrapped) => Ok(WarnedValue::Wrapped(wrapped.attach_all(warnings))),
            WarnedValue::Foreign(foreign) => {
                let (set, reached) = foreign_state(foreign, limit)?;
                let merged = WarningSet::from_records(set.iter().cloned().chain(warnings), limit);
                let overflowed = merged.overflowed();
                foreign_replace(foreign, &merged.set, reached || overflowed)
                    .map(WarnedValue::Foreign)
            }
        }
    }

    pub fn attach_all<I>(&self, warnings: I, limit: WarningLimit) -> Self
    where
        I: IntoIterator<Item = Warning>,
    {
        self.try_attach_all(warnings, limit).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Create a warning with the next sequence id of `ctx` and attach it.
    pub fn try_attach_new(
        &self,
        ctx: &WarningContext,
        payload: Opaque,
        origin: Opaque,
    ) -> Result<Self, WarningsError> {
        self.try_attach(Warning::create(ctx, payload, origin), ctx.limit())
    }

    pub fn attach_new(&self, ctx: &WarningContext, payload: Opaque, origin: Opaque) -> Self {
        self.try_attach_new(ctx, payload, origin).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Replace all warnings: strip, then attach `warnings` in bulk.
    ///
    /// An empty list leaves a bare value.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_set_warnings<I>(
        &self,
        warnings: I,
        limit: WarningLimit,
    ) -> Result<Self, WarningsError>
    where
        I: IntoIterator<Item = Warning>,
    {
        match self {
            WarnedValue::Foreign(foreign) => {
                let merged = WarningSet::from_records(warnings, limit);
                let overflowed = merged.overflowed();
                foreign_replace(foreign, &merged.set, overflowed).map(WarnedValue::Foreign)
            }
            _ => self.try_remove_warnings()?.try_attach_all(warnings, limit),
        }
    }

    pub fn set_warnings<I>(&self, warnings: I, limit: WarningLimit) -> Self
    where
        I: IntoIterator<Item = Warning>,
    {
        self.try_set_warnings(warnings, limit).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Strip all warnings. Wrapped values collapse to bare ones.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_remove_warnings(&self) -> Result<Self, WarningsError> {
        match self {
            WarnedValue::Bare(_) => Ok(self.clone()),
            WarnedValue::Wrapped(wrapped) => Ok(WarnedValue::Bare(wrapped.unwrap())),
            WarnedValue::Foreign(foreign) => {
                ask(foreign, "set_warnings", |c| c.set_warnings(Vec::new(), false))
                    .map(WarnedValue::Foreign)
            }
        }
    }

    pub fn remove_warnings(&self) -> Self {
        self.try_remove_warnings().unwrap_or_else(|e| panic!("{}", e))
    }

    /// Record that every warning crossed the boundary `site_name`.
    ///
    /// The shape, the order and the limit flag are kept.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_reassign_warnings(
        &self,
        site_name: &str,
        location: Option<&SourceLocation>,
    ) -> Result<Self, WarningsError> {
        match self {
            WarnedValue::Bare(_) => Ok(self.clone()),
            WarnedValue::Wrapped(wrapped) => {
                Ok(WarnedValue::Wrapped(wrapped.reassign(site_name, location)))
            }
            WarnedValue::Foreign(foreign) => {
                if !ask(foreign, "has_warnings", |c| c.has_warnings())? {
                    return Ok(self.clone());
                }
                let records = ask(foreign, "get_warnings", |c| c.get_warnings())?;
                let reached = ask(foreign, "is_limit_reached", |c| c.is_limit_reached())?;
                let moved = records
                    .iter()
                    .map(|w| w.reassign(site_name, location.cloned()))
                    .collect();
                ask(foreign, "set_warnings", |c| c.set_warnings(moved, reached))
                    .map(WarnedValue::Foreign)
            }
        }
    }

    pub fn reassign_warnings(&self, site_name: &str, location: Option<&SourceLocation>) -> Self {
        self.try_reassign_warnings(site_name, location).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Attach the warnings of every operand onto `result`.
    ///
    /// The operands' sets are merged with union semantics and any operand's
    /// limit flag carries over. A result with no incoming warnings is
    /// returned as is.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn try_propagate<'a, I>(
        result: Self,
        operands: I,
        limit: WarningLimit,
    ) -> Result<Self, WarningsError>
    where
        I: IntoIterator<Item = &'a WarnedValue<V>>,
        V: 'a,
    {
        let mut incoming = WarningSet::empty(limit);
        let mut reached = false;
        for operand in operands {
            let (set, flag) = operand.try_warning_state(limit)?;
            let merged = incoming.union(&set);
            reached |= flag || merged.overflowed();
            incoming = merged.set;
        }

        if incoming.is_empty() {
            return Ok(result);
        }

        match &result {
            WarnedValue::Bare(value) => Ok(WarnedValue::Wrapped(WithWarnings::from_parts(
                value.clone(),
                incoming,
                reached,
            ))),
            WarnedValue::Wrapped(wrapped) => {
                Ok(WarnedValue::Wrapped(wrapped.merge(&incoming, reached)))
            }
            WarnedValue::Foreign(foreign) => {
                let (own, own_reached) = foreign_state(foreign, limit)?;
                let merged = own.union(&incoming);
                let overflowed = merged.overflowed();
                foreign_replace(foreign, &merged.set, own_reached || reached || overflowed)
                    .map(WarnedValue::Foreign)
            }
        }
    }

    pub fn propagate<'a, I>(result: Self, operands: I, limit: WarningLimit) -> Self
    where
        I: IntoIterator<Item = &'a WarnedValue<V>>,
        V: 'a,
    {
        Self::try_propagate(result, operands, limit).unwrap_or_else(|e| panic!("{}", e))
    }
}
