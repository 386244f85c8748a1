//! Per-execution warnings state.

use crate::config::{WarningLimit, WarningsConfig};
use crate::errors::ConfigError;
use crate::sequence::{SequenceId, SequenceSource};

/// Owns the sequence source and the capacity setting of one execution.
///
/// Construct one per interpreter run and pass it by reference to every site
/// that raises warnings. It is `Sync`, so parallel evaluation can share it.
#[derive(Debug, Default)]
pub struct WarningContext {
    sequence: SequenceSource,
    config: WarningsConfig,
}

impl WarningContext {
    pub fn new(config: WarningsConfig) -> Self {
        WarningContext {
            sequence: SequenceSource::new(),
            config,
        }
    }

    /// Create a context configured from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        WarningsConfig::from_env().map(Self::new)
    }

    /// Issue the next sequence id.
    #[inline]
    pub fn next_sequence_id(&self) -> SequenceId {
        self.sequence.next_id()
    }

    #[inline]
    pub fn limit(&self) -> WarningLimit {
        self.config.limit
    }

    pub fn config(&self) -> &WarningsConfig {
        &self.config
    }

    pub fn sequence(&self) -> &SequenceSource {
        &self.sequence
    }
}
