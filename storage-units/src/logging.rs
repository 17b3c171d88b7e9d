//! Tracing subscriber setup for binaries, tests and benches embedding the crate.
//!
//! The library itself only emits `tracing` events: resolution at `trace`,
//! configuration and locale detection at `debug`/`info`.

use std::str::FromStr;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, filter::Directive};

use crate::error::{UnitError, UnitResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default directive; `RUST_LOG` directives are layered on top
    pub level: CompactString,

    /// Emit JSON lines instead of human readable output
    pub json: bool,

    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: CompactString::const_new("info"),
            json: false,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = CompactString::from(level);
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Filter from `RUST_LOG` plus the configured default directive.
    pub fn env_filter(&self) -> UnitResult<EnvFilter> {
        let directive = Directive::from_str(&self.level).map_err(|e| {
            UnitError::Logging(CompactString::from(format!(
                "invalid log level '{}': {e}",
                self.level
            )))
        })?;

        Ok(EnvFilter::from_default_env().add_directive(directive))
    }
}

/// Installs a global fmt subscriber. Fails if one is already installed.
pub fn init_tracing(config: &LoggingConfig) -> UnitResult<()> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| UnitError::Logging(CompactString::from(e.to_string())))
}

/// Installs the default subscriber at `level`.
pub fn init_tracing_with_level(level: &str) -> UnitResult<()> {
    init_tracing(&LoggingConfig::default().with_level(level))
}
