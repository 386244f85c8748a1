//! Warnings capacity configuration.
//!
//! The limit `K` on the number of warnings a value may carry is a
//! process-wide setting held by the `WarningContext`. It is read when a
//! warning set is created and stays fixed for that set's lifetime.

use std::env::VarError;
use std::fmt;
use std::num::NonZeroUsize;

use crate::errors::ConfigError;

/// Default maximum number of warnings per value.
pub const DEFAULT_WARNINGS_LIMIT: usize = 100;

/// Environment variable overriding the warnings limit.
pub const WARNINGS_LIMIT_ENV: &str = "ORI_WARNINGS_LIMIT";

/// Maximum number of warnings a single value may carry (always at least 1).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WarningLimit(NonZeroUsize);

impl WarningLimit {
    /// Create a limit, or `None` for zero.
    #[inline]
    pub const fn new(limit: usize) -> Option<Self> {
        match NonZeroUsize::new(limit) {
            Some(limit) => Some(WarningLimit(limit)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Parse a limit from user input (CLI flag or environment).
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let value: usize = raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidLimit {
                value: raw.to_owned(),
                source,
            })?;
        WarningLimit::new(value).ok_or(ConfigError::ZeroLimit)
    }
}

impl Default for WarningLimit {
    fn default() -> Self {
        WarningLimit(NonZeroUsize::MIN.saturating_add(DEFAULT_WARNINGS_LIMIT - 1))
    }
}

impl TryFrom<usize> for WarningLimit {
    type Error = ConfigError;

    fn try_from(limit: usize) -> Result<Self, Self::Error> {
        WarningLimit::new(limit).ok_or(ConfigError::ZeroLimit)
    }
}

impl From<NonZeroUsize> for WarningLimit {
    fn from(limit: NonZeroUsize) -> Self {
        WarningLimit(limit)
    }
}

impl fmt::Display for WarningLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration for warning propagation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct WarningsConfig {
    /// Maximum number of warnings kept per value.
    pub limit: WarningLimit,
}

impl WarningsConfig {
    /// Create a config with the given limit.
    pub fn with_limit(limit: WarningLimit) -> Self {
        WarningsConfig { limit }
    }

    /// Read the config from the process environment.
    ///
    /// Uses `ORI_WARNINGS_LIMIT` when set, the default limit otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = match std::env::var(WARNINGS_LIMIT_ENV) {
            Ok(raw) => Some(raw),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                return Err(ConfigError::NotUnicode {
                    name: WARNINGS_LIMIT_ENV,
                })
            }
        };
        Self::from_env_value(raw.as_deref())
    }

    /// Build the config from the raw value of `ORI_WARNINGS_LIMIT`, if any.
    pub fn from_env_value(raw: Option<&str>) -> Result<Self, ConfigError> {
        let limit = match raw {
            Some(raw) => WarningLimit::parse(raw)?,
            None => WarningLimit::default(),
        };
        tracing::debug!(limit = limit.get(), "warnings config");
        Ok(WarningsConfig { limit })
    }
}
