//! Error handling for storage unit arithmetic, parsing and formatting

use compact_str::CompactString;
use std::io::ErrorKind;
use thiserror::Error;

pub type UnitResult<T> = Result<T, UnitError>;

/// Error types with minimal allocations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    // Arithmetic
    #[error("Division by zero")]
    DivisionByZero,

    // Formatting
    #[error("Invalid format pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: CompactString,
        reason: CompactString,
    },

    #[error("Invalid locale tag: '{0}'")]
    InvalidLocale(CompactString),

    // Parsing
    #[error("Unknown storage unit: '{0}'")]
    UnknownUnit(CompactString),

    #[error("Parse error: '{input}' - expected {expected}")]
    Parse {
        input: CompactString,
        expected: CompactString,
    },

    // Configuration
    #[error("Configuration error: {0}")]
    Config(CompactString),

    #[error("Failed to access config file {path}: {kind:?}")]
    ConfigIo {
        path: CompactString,
        kind: ErrorKind, // ErrorKind keeps the error Clone
    },

    #[error("Logging initialization failed: {0}")]
    Logging(CompactString),
}

impl UnitError {
    /// Errors caused by a caller supplied pattern or locale
    #[inline]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            UnitError::InvalidPattern { .. } | UnitError::InvalidLocale(_)
        )
    }

    #[inline]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, UnitError::UnknownUnit(_) | UnitError::Parse { .. })
    }

    #[inline]
    pub fn invalid_pattern(
        pattern: impl Into<CompactString>,
        reason: impl Into<CompactString>,
    ) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn parse(input: impl Into<CompactString>, expected: impl Into<CompactString>) -> Self {
        Self::Parse {
            input: input.into(),
            expected: expected.into(),
        }
    }

    /// Create config I/O error with path conversion
    #[inline]
    pub fn config_io(path: &std::path::Path, io_error: &std::io::Error) -> Self {
        Self::ConfigIo {
            path: CompactString::from(path.to_string_lossy()),
            kind: io_error.kind(),
        }
    }
}

impl From<toml::de::Error> for UnitError {
    fn from(err: toml::de::Error) -> Self {
        UnitError::Config(CompactString::from(err.to_string()))
    }
}

impl From<toml::ser::Error> for UnitError {
    fn from(err: toml::ser::Error) -> Self {
        UnitError::Config(CompactString::from(err.to_string()))
    }
}
