//! Pattern plus locale, the full input of a formatting call.

use bigdecimal::BigDecimal;

use crate::{
    error::UnitResult,
    format::{locale::Locale, pattern::DecimalPattern},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pattern: DecimalPattern,
    locale: Locale,
}

impl FormatOptions {
    /// Parses `pattern`; the locale defaults to [`Locale::system`].
    pub fn new(pattern: &str) -> UnitResult<Self> {
        Ok(Self {
            pattern: DecimalPattern::parse(pattern)?,
            locale: Locale::default(),
        })
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: DecimalPattern) -> Self {
        self.pattern = pattern;
        self
    }

    #[inline]
    pub fn pattern(&self) -> &DecimalPattern {
        &self.pattern
    }

    #[inline]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[inline]
    pub fn format_value(&self, value: &BigDecimal) -> String {
        self.pattern.format(value, &self.locale)
    }
}

impl Default for FormatOptions {
    /// `0.00` in the system locale.
    fn default() -> Self {
        Self {
            pattern: DecimalPattern::default(),
            locale: Locale::default(),
        }
    }
}
