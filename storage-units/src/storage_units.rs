//! Free-standing factories and one-shot formatting helpers.

use num_bigint::BigInt;

use crate::{
    error::UnitResult,
    format::options::FormatOptions,
    quantity::Quantity,
    resolver,
    unit::{Unit, UnitSystem},
};

/// Best matching unit of `system` for `bytes`.
#[inline]
pub fn value_of(bytes: impl Into<BigInt>, system: UnitSystem) -> Quantity {
    resolver::best_matching(bytes.into(), system)
}

#[inline]
pub fn binary_value_of(bytes: impl Into<BigInt>) -> Quantity {
    value_of(bytes, UnitSystem::Binary)
}

#[inline]
pub fn decimal_value_of(bytes: impl Into<BigInt>) -> Quantity {
    value_of(bytes, UnitSystem::Decimal)
}

/// Best matching unit of the legacy common ladder (1024 steps, `kB` symbols).
#[inline]
pub fn common_value_of(bytes: impl Into<BigInt>) -> Quantity {
    value_of(bytes, UnitSystem::Common)
}

/// Formats `bytes` as `unit` with `pattern` in the system locale.
pub fn format_as(unit: Unit, bytes: impl Into<BigInt>, pattern: &str) -> UnitResult<String> {
    Quantity::new(bytes).as_unit(unit).to_string_pattern(pattern)
}

/// Formats `bytes` in the best matching unit of `system`.
pub fn format_as_best_matching(
    bytes: impl Into<BigInt>,
    system: UnitSystem,
    options: &FormatOptions,
) -> String {
    value_of(bytes, system).format(options)
}
