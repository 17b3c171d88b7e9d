//! Decimal format patterns.
//!
//! Supported grammar: an integer part made of `#`, `0` and `,` (grouping),
//! optionally followed by `.` and a fraction part of `0`s then `#`s. Examples:
//! `0.00`, `#0.#####`, `#,##0.0`, `#`. Values are rounded half-even at the
//! maximum number of fraction digits.

use std::{fmt, str::FromStr};

use bigdecimal::{BigDecimal, RoundingMode};
use compact_str::CompactString;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{
    error::{UnitError, UnitResult},
    format::locale::Locale,
};

pub const DEFAULT_PATTERN: &str = "0.00";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecimalPattern {
    source: CompactString,
    min_integer_digits: usize,
    grouping_size: Option<usize>,
    min_fraction_digits: usize,
    max_fraction_digits: usize,
}

impl DecimalPattern {
    pub fn parse(pattern: &str) -> UnitResult<Self> {
        let fail = |reason: &str| UnitError::invalid_pattern(pattern, reason);

        if pattern.is_empty() {
            return Err(fail("pattern is empty"));
        }

        let (integer, fraction) = match pattern.split_once('.') {
            Some((_, fraction)) if fraction.contains('.') => {
                return Err(fail("multiple decimal separators"));
            }
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (pattern, None),
        };

        let mut min_integer_digits = 0;
        let mut digits_since_group: Option<usize> = None;
        let mut integer_digits = 0;
        for c in integer.chars() {
            match c {
                '#' if min_integer_digits > 0 => return Err(fail("'#' after '0' in integer part")),
                '#' => {}
                '0' => min_integer_digits += 1,
                ',' => {
                    digits_since_group = Some(0);
                    continue;
                }
                other => return Err(fail(&format!("unsupported character '{other}'"))),
            }
            integer_digits += 1;
            if let Some(count) = digits_since_group.as_mut() {
                *count += 1;
            }
        }

        let grouping_size = match digits_since_group {
            Some(0) => return Err(fail("grouping separator without digits after it")),
            other => other,
        };

        let (mut min_fraction_digits, mut max_fraction_digits) = (0, 0);
        for c in fraction.unwrap_or_default().chars() {
            match c {
                '0' if max_fraction_digits > min_fraction_digits => {
                    return Err(fail("'0' after '#' in fraction part"));
                }
                '0' => min_fraction_digits += 1,
                '#' => {}
                ',' => return Err(fail("grouping separator in fraction part")),
                other => return Err(fail(&format!("unsupported character '{other}'"))),
            }
            max_fraction_digits += 1;
        }

        if integer_digits == 0 && max_fraction_digits == 0 {
            return Err(fail("pattern contains no digits"));
        }

        Ok(Self {
            source: CompactString::from(pattern),
            min_integer_digits,
            grouping_size,
            min_fraction_digits,
            max_fraction_digits,
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn max_fraction_digits(&self) -> usize {
        self.max_fraction_digits
    }

    /// Renders `value` with this pattern and the symbols of `locale`.
    pub fn format(&self, value: &BigDecimal, locale: &Locale) -> String {
        let scale = self.max_fraction_digits;
        let rounded = value.with_scale_round(scale as i64, RoundingMode::HalfEven);
        let unscaled = unscaled_at(&rounded, scale);

        let digits = format!("{:0>width$}", unscaled.magnitude().to_string(), width = scale + 1);
        let (integer, fraction) = digits.split_at(digits.len() - scale);

        let mut fraction = fraction.trim_end_matches('0');
        if fraction.len() < self.min_fraction_digits {
            fraction = &digits[digits.len() - scale..][..self.min_fraction_digits];
        }

        let integer = integer.trim_start_matches('0');
        let integer = format!("{:0>width$}", integer, width = self.min_integer_digits);

        let mut out = String::with_capacity(integer.len() * 2 + fraction.len() + 2);
        // rounded-to-zero values never show a minus sign
        if unscaled.is_negative() {
            out.push(locale.minus_sign());
        }
        self.push_grouped(&mut out, &integer, locale.grouping_separator());

        if !fraction.is_empty() {
            out.push(locale.decimal_separator());
            out.push_str(fraction);
        } else if integer.is_empty() {
            out.push('0');
        }

        out
    }

    fn push_grouped(&self, out: &mut String, integer: &str, separator: char) {
        let Some(size) = self.grouping_size else {
            out.push_str(integer);
            return;
        };

        let len = integer.len();
        for (idx, digit) in integer.chars().enumerate() {
            if idx > 0 && (len - idx) % size == 0 {
                out.push(separator);
            }
            out.push(digit);
        }
    }
}

/// Integer `n` such that `value == n / 10^scale`.
fn unscaled_at(value: &BigDecimal, scale: usize) -> BigInt {
    let (digits, exponent) = value.as_bigint_and_exponent();
    let target = scale as i64;

    if exponent == target {
        digits
    } else if exponent < target {
        digits * BigInt::from(10u32).pow((target - exponent) as u32)
    } else if digits.is_zero() {
        digits
    } else {
        // with_scale_round never leaves more digits than requested
        digits / BigInt::from(10u32).pow((exponent - target) as u32)
    }
}

impl Default for DecimalPattern {
    fn default() -> Self {
        Self {
            source: CompactString::const_new(DEFAULT_PATTERN),
            min_integer_digits: 1,
            grouping_size: None,
            min_fraction_digits: 2,
            max_fraction_digits: 2,
        }
    }
}

impl fmt::Display for DecimalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for DecimalPattern {
    type Err = UnitError;

    fn from_str(s: &str) -> UnitResult<Self> {
        DecimalPattern::parse(s)
    }
}
