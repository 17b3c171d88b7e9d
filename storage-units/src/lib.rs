//! # storage-units - Typed Storage Sizes
//!
//! Immutable, arbitrary precision storage size values with unit conversion,
//! best matching unit resolution and locale-aware formatting.
//!
//! ## Key Features
//! - Byte, decimal (kB ... QB), binary (KiB ... QiB) and legacy common units
//! - Best matching unit resolution with half-open brackets
//! - Overflow free arithmetic on byte magnitudes
//! - Decimal format patterns with per-locale separators
//!
//! ## Example
//! ```rust
//! use storage_units::{Quantity, storage_units::binary_value_of};
//!
//! let size = Quantity::kibibyte(0).add(1234).as_best_matching_unit();
//! assert_eq!(size, binary_value_of(1234));
//! ```

pub mod error;

pub mod unit;
pub use unit::{Unit, UnitSystem};

pub mod quantity;
pub use quantity::{Quantity, Scalar};

pub mod resolver;

pub mod parse;

pub mod format {
    pub mod locale;
    pub use locale::Locale;

    pub mod options;
    pub use options::FormatOptions;

    pub mod pattern;
    pub use pattern::{DEFAULT_PATTERN, DecimalPattern};
}

pub mod storage_units;

pub mod config;
pub use config::StorageUnitsConfig;

pub mod logging;

pub use error::{UnitError, UnitResult};
pub use format::{DecimalPattern, FormatOptions, Locale};
