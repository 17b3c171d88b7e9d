//! Number symbols per locale.
//!
//! Only the symbols a decimal pattern needs are modelled: decimal separator,
//! grouping separator and minus sign. Well-formed tags of languages without a
//! dedicated table fall back to the root symbols (`.` and `,`).

use std::{fmt, str::FromStr};

use compact_str::CompactString;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{UnitError, UnitResult};

const NARROW_NO_BREAK_SPACE: char = '\u{202f}';
const NO_BREAK_SPACE: char = '\u{a0}';

/// Environment variables consulted by [`Locale::system`], highest priority first.
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_NUMERIC", "LANG"];

static SYSTEM_LOCALE: Lazy<Locale> = Lazy::new(Locale::detect_system);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: CompactString,
    decimal_separator: char,
    grouping_separator: char,
    minus_sign: char,
}

impl Locale {
    pub const ROOT: Locale = Locale::with_symbols("und", '.', ',');
    pub const US: Locale = Locale::with_symbols("en-US", '.', ',');
    pub const UK: Locale = Locale::with_symbols("en-GB", '.', ',');
    pub const GERMANY: Locale = Locale::with_symbols("de-DE", ',', '.');
    pub const FRANCE: Locale = Locale::with_symbols("fr-FR", ',', NARROW_NO_BREAK_SPACE);
    pub const ITALY: Locale = Locale::with_symbols("it-IT", ',', '.');
    pub const JAPAN: Locale = Locale::with_symbols("ja-JP", '.', ',');

    const fn with_symbols(tag: &'static str, decimal: char, grouping: char) -> Self {
        Self {
            tag: CompactString::const_new(tag),
            decimal_separator: decimal,
            grouping_separator: grouping,
            minus_sign: '-',
        }
    }

    /// Parses `en-US`, `de_DE.UTF-8`, `fr@euro` style tags.
    pub fn parse(tag: &str) -> UnitResult<Self> {
        let invalid = || UnitError::InvalidLocale(CompactString::from(tag));

        // drop POSIX encoding and modifier suffixes
        let stripped = tag
            .trim()
            .split(['.', '@'])
            .next()
            .unwrap_or_default();
        let mut segments = stripped.split(['-', '_']);

        let language = segments
            .next()
            .filter(|lang| (2..=3).contains(&lang.len()))
            .filter(|lang| lang.chars().all(|c| c.is_ascii_alphabetic()))
            .ok_or_else(invalid)?
            .to_ascii_lowercase();

        let region = match segments.next() {
            Some(region) if region.chars().all(|c| c.is_ascii_alphanumeric()) && !region.is_empty() => {
                Some(region.to_ascii_uppercase())
            }
            Some(_) => return Err(invalid()),
            None => None,
        };

        let (decimal, grouping) = symbols_for(&language, region.as_deref());
        let tag = match region {
            Some(region) => CompactString::from(format!("{language}-{region}")),
            None => CompactString::from(language),
        };

        Ok(Self {
            tag,
            decimal_separator: decimal,
            grouping_separator: grouping,
            minus_sign: '-',
        })
    }

    /// Process default locale, read once from the environment.
    #[inline]
    pub fn system() -> &'static Locale {
        &SYSTEM_LOCALE
    }

    /// Interprets one locale environment value. `C` and `POSIX` map to US
    /// English; empty or malformed values yield `None`.
    pub fn from_env_value(value: &str) -> Option<Locale> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let name = value.split(['.', '@']).next().unwrap_or_default();
        if name.eq_ignore_ascii_case("C") || name.eq_ignore_ascii_case("POSIX") {
            return Some(Locale::US);
        }

        Locale::parse(value).ok()
    }

    fn detect_system() -> Locale {
        let detected = LOCALE_ENV_VARS.iter().find_map(|var| {
            std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*var, value))
        });

        match detected {
            Some((var, value)) => {
                let locale = Locale::from_env_value(&value).unwrap_or(Locale::US);
                debug!(variable = var, value = %value, locale = %locale.tag, "Detected system locale");
                locale
            }
            None => Locale::US,
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    #[inline]
    pub fn grouping_separator(&self) -> char {
        self.grouping_separator
    }

    #[inline]
    pub fn minus_sign(&self) -> char {
        self.minus_sign
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::system().clone()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for Locale {
    type Err = UnitError;

    fn from_str(s: &str) -> UnitResult<Self> {
        Locale::parse(s)
    }
}

/// (decimal separator, grouping separator)
fn symbols_for(language: &str, region: Option<&str>) -> (char, char) {
    match (language, region) {
        ("de" | "it", Some("CH" | "LI")) => ('.', '\u{2019}'),
        ("fr", Some("CH")) => (',', NARROW_NO_BREAK_SPACE),
        ("de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" | "el" | "ro" | "hr" | "sl", _) => {
            (',', '.')
        }
        ("fr", _) => (',', NARROW_NO_BREAK_SPACE),
        ("ru" | "uk" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "hu" | "bg" | "lt" | "lv" | "et", _) => {
            (',', NO_BREAK_SPACE)
        }
        _ => ('.', ','),
    }
}
