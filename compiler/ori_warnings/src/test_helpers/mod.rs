//! Shared fixtures for unit tests.

use crate::{
    ForeignValue, Opaque, SequenceId, UnsupportedMessage, Warning, WarningContext, WarningLimit,
    WarningsCapability, WarningsConfig,
};

pub(crate) fn limit(k: usize) -> WarningLimit {
    WarningLimit::new(k).expect("test limits are non-zero")
}

pub(crate) fn ctx(k: usize) -> WarningContext {
    WarningContext::new(WarningsConfig::with_limit(limit(k)))
}

/// A fresh warning with its own payload and origin tokens.
pub(crate) fn warning(ctx: &WarningContext, text: &'static str) -> Warning {
    Warning::create(ctx, Opaque::new(text), Opaque::new("test origin"))
}

/// A record with an explicit sequence id over existing tokens.
pub(crate) fn record(seq: u64, payload: &Opaque, origin: &Opaque) -> Warning {
    Warning::new(payload.clone(), origin.clone(), SequenceId::new(seq))
}

pub(crate) fn seq_ids<'a>(warnings: impl IntoIterator<Item = &'a Warning>) -> Vec<u64> {
    warnings
        .into_iter()
        .map(|w| w.sequence_id().raw())
        .collect()
}

pub(crate) fn texts<'a>(warnings: impl IntoIterator<Item = &'a Warning>) -> Vec<String> {
    warnings.into_iter().map(ToString::to_string).collect()
}

/// Externally owned value with its own warning storage.
///
/// Stores whatever list it is given, in the given order, so tests can check
/// that the dispatch layer re-sorts and deduplicates foreign lists.
#[derive(Clone, Debug)]
pub(crate) struct ForeignTable {
    pub(crate) name: &'static str,
    pub(crate) warnings: Vec<Warning>,
    pub(crate) limit_reached: bool,
}

impl ForeignTable {
    pub(crate) fn new(name: &'static str) -> Self {
        ForeignTable {
            name,
            warnings: Vec::new(),
            limit_reached: false,
        }
    }

    pub(crate) fn with_warnings(name: &'static str, warnings: Vec<Warning>) -> Self {
        ForeignTable {
            name,
            warnings,
            limit_reached: false,
        }
    }
}

impl WarningsCapability for ForeignTable {
    fn type_name(&self) -> &str {
        self.name
    }

    fn has_warnings(&self) -> Result<bool, UnsupportedMessage> {
        Ok(!self.warnings.is_empty())
    }

    fn get_warnings(&self) -> Result<Vec<Warning>, UnsupportedMessage> {
        Ok(self.warnings.clone())
    }

    fn set_warnings(
        &self,
        warnings: Vec<Warning>,
        limit_reached: bool,
    ) -> Result<ForeignValue, UnsupportedMessage> {
        Ok(ForeignValue::new(ForeignTable {
            name: self.name,
            warnings,
            limit_reached,
        }))
    }

    fn is_limit_reached(&self) -> Result<bool, UnsupportedMessage> {
        Ok(self.limit_reached)
    }
}

/// Claims the warnings capability but fails the named message.
#[derive(Debug)]
pub(crate) struct BrokenForeign {
    pub(crate) fails: &'static str,
}

impl BrokenForeign {
    fn answer<T>(&self, message: &'static str, value: T) -> Result<T, UnsupportedMessage> {
        if self.fails == message {
            Err(UnsupportedMessage::new(format!("{message} is not supported")))
        } else {
            Ok(value)
        }
    }
}

impl WarningsCapability for BrokenForeign {
    fn type_name(&self) -> &str {
        "BrokenForeign"
    }

    fn has_warnings(&self) -> Result<bool, UnsupportedMessage> {
        self.answer("has_warnings", true)
    }

    fn get_warnings(&self) -> Result<Vec<Warning>, UnsupportedMessage> {
        self.answer("get_warnings", Vec::new())
    }

    fn set_warnings(
        &self,
        _warnings: Vec<Warning>,
        _limit_reached: bool,
    ) -> Result<ForeignValue, UnsupportedMessage> {
        self.answer(
            "set_warnings",
            ForeignValue::new(ForeignTable::new("recovered")),
        )
    }

    fn is_limit_reached(&self) -> Result<bool, UnsupportedMessage> {
        self.answer("is_limit_reached", false)
    }
}
