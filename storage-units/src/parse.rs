//! Parsing `"<number> <symbol>"` text into a [`Quantity`].
//!
//! The number is a plain decimal (`12`, `-0.5`, `1.25`); the unit is anything
//! [`Unit`] accepts. A missing unit means bytes. Fractional byte counts are
//! truncated toward zero.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use compact_str::CompactString;

use crate::{
    error::{UnitError, UnitResult},
    quantity::Quantity,
    unit::{Unit, UnitSystem},
};

impl Quantity {
    /// Parses `text`, resolving shared symbols (`kB`, `MB`, ...) within
    /// `system`. IEC symbols and unit names are accepted in every system.
    pub fn parse_in(text: &str, system: UnitSystem) -> UnitResult<Self> {
        let (number, symbol) = split_number(text)?;

        let unit = if symbol.is_empty() {
            Unit::Byte
        } else {
            Unit::from_symbol(symbol, system).or_else(|_| symbol.parse::<Unit>())?
        };

        let unsigned = number.strip_prefix('+').unwrap_or(number);
        let value = BigDecimal::from_str(unsigned)
            .map_err(|_| UnitError::parse(number, "a decimal number"))?;
        let bytes = value * BigDecimal::new(unit.bytes_per_unit().clone(), 0);
        let (bytes, _) = bytes
            .with_scale_round(0, RoundingMode::Down)
            .as_bigint_and_exponent();

        Ok(Quantity::new(bytes).as_unit(unit))
    }
}

impl FromStr for Quantity {
    type Err = UnitError;

    /// Shared symbols (`kB`, `MB`, ...) parse as decimal units.
    fn from_str(s: &str) -> UnitResult<Self> {
        Quantity::parse_in(s, UnitSystem::Decimal)
    }
}

/// Splits leading sign, digits and `.` from the trailing unit text.
fn split_number(text: &str) -> UnitResult<(&str, &str)> {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .find(|&(idx, c)| !(c.is_ascii_digit() || c == '.' || (idx == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(idx, _)| idx);

    let (number, rest) = trimmed.split_at(end);
    if !number.chars().any(|c| c.is_ascii_digit()) {
        return Err(UnitError::parse(
            CompactString::from(text),
            "a number followed by an optional unit",
        ));
    }

    Ok((number, rest.trim_start()))
}
