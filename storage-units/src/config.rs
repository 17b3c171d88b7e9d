//! src/config.rs
//! ============================================================================
//! # StorageUnitsConfig: formatting defaults loaded from TOML
//!
//! Holds the user-editable defaults used when a caller formats values without
//! spelling out a pattern or locale. Loads and saves settings as TOML from the
//! platform config path provided by [`directories`](https://docs.rs/directories).
//!
//! ## Example
//! ```rust,ignore
//! let config = StorageUnitsConfig::load()?;
//! let options = config.format_options()?;
//! println!("{}", quantity.format(&options));
//! ```

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use directories::ProjectDirs;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{UnitError, UnitResult},
    format::{locale::Locale, options::FormatOptions, pattern::DEFAULT_PATTERN},
    logging::LoggingConfig,
    quantity::Quantity,
    storage_units,
    unit::UnitSystem,
};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageUnitsConfig {
    /// Decimal pattern for formatted values
    pub pattern: CompactString,

    /// Locale tag (`en-US`, `de_DE.UTF-8`); system locale when unset
    pub locale: Option<CompactString>,

    /// Ladder used when values are resolved without an explicit system
    pub system: UnitSystem,

    pub logging: LoggingConfig,
}

impl Default for StorageUnitsConfig {
    fn default() -> Self {
        Self {
            pattern: CompactString::const_new(DEFAULT_PATTERN),
            locale: None,
            system: UnitSystem::Binary,
            logging: LoggingConfig::default(),
        }
    }
}

impl StorageUnitsConfig {
    pub fn from_toml_str(text: &str) -> UnitResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> UnitResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> UnitResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| UnitError::config_io(path, &e))?;

        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> UnitResult<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| UnitError::config_io(parent, &e))?;
        }
        std::fs::write(path, content).map_err(|e| UnitError::config_io(path, &e))?;

        Ok(())
    }

    /// Loads config from the platform config dir, or returns defaults when no
    /// file exists there. Unlike an application, a library never creates it.
    pub fn load() -> UnitResult<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            info!("Loading storage units config from {}", path.display());
            Self::load_from_file(&path)
        } else {
            info!(
                "No config file found at {}, using default configuration.",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> UnitResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "storage-units", "StorageUnits")
            .ok_or_else(|| UnitError::Config("Could not determine config directory.".into()))?;
        Ok(proj_dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn locale(&self) -> UnitResult<Locale> {
        match &self.locale {
            Some(tag) => Locale::parse(tag),
            None => Ok(Locale::default()),
        }
    }

    /// Validates pattern and locale, producing options for
    /// [`Quantity::format`](crate::Quantity::format).
    pub fn format_options(&self) -> UnitResult<FormatOptions> {
        Ok(FormatOptions::new(&self.pattern)?.with_locale(self.locale()?))
    }

    /// Best matching unit of the configured system.
    #[inline]
    pub fn value_of(&self, bytes: impl Into<BigInt>) -> Quantity {
        storage_units::value_of(bytes, self.system)
    }

    pub fn format_best_matching(&self, bytes: impl Into<BigInt>) -> UnitResult<String> {
        let options = self.format_options()?;
        Ok(storage_units::format_as_best_matching(bytes, self.system, &options))
    }
}
