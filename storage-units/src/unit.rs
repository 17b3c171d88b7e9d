//! Unit descriptors and the binary, decimal and common unit ladders.
//!
//! Every unit is a row in one table: display symbol, name, owning system and
//! divisor (`base^exponent` bytes). The byte unit is shared by all ladders.

use std::{fmt, str::FromStr};

use compact_str::CompactString;
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{UnitError, UnitResult};

/// Family of units a value resolves within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Powers of 1024 with IEC symbols (`KiB`, `MiB`, ...).
    #[default]
    Binary,

    /// Powers of 1000 with SI symbols (`kB`, `MB`, ...).
    Decimal,

    /// Powers of 1024 with SI-style symbols (`kB`, `MB`, ...).
    Common,
}

impl UnitSystem {
    pub const ALL: [UnitSystem; 3] = [UnitSystem::Binary, UnitSystem::Decimal, UnitSystem::Common];

    /// Ordered unit ladder of this system, starting at [`Unit::Byte`].
    #[inline]
    pub fn ladder(self) -> &'static [Unit] {
        match self {
            UnitSystem::Binary => &BINARY_LADDER,
            UnitSystem::Decimal => &DECIMAL_LADDER,
            UnitSystem::Common => &COMMON_LADDER,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            UnitSystem::Binary => "binary",
            UnitSystem::Decimal => "decimal",
            UnitSystem::Common => "common",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitSystem {
    type Err = UnitError;

    fn from_str(s: &str) -> UnitResult<Self> {
        UnitSystem::ALL
            .into_iter()
            .find(|system| system.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnitError::parse(s, "one of: binary, decimal, common"))
    }
}

macro_rules! define_units {
    ($($variant:ident => $symbol:literal, $name:literal, $system:expr, $base:literal ^ $exp:literal;)+) => {
        /// A storage unit: divisor plus display symbol.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Unit {
            $($variant,)+
        }

        impl Unit {
            /// Every unit in table order.
            pub const ALL: &'static [Unit] = &[$(Unit::$variant,)+];

            /// Display symbol appended after formatted values.
            #[inline]
            pub const fn symbol(self) -> &'static str {
                match self {
                    $(Unit::$variant => $symbol,)+
                }
            }

            #[inline]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Unit::$variant => $name,)+
                }
            }

            /// Owning system; `None` for [`Unit::Byte`], which every ladder shares.
            #[inline]
            pub const fn system(self) -> Option<UnitSystem> {
                match self {
                    $(Unit::$variant => $system,)+
                }
            }

            #[inline]
            const fn base_and_exponent(self) -> (u32, u32) {
                match self {
                    $(Unit::$variant => ($base, $exp),)+
                }
            }
        }
    };
}

define_units! {
    Byte => "B", "byte", None, 1 ^ 0;

    Kilobyte => "kB", "kilobyte", Some(UnitSystem::Decimal), 1000 ^ 1;
    Megabyte => "MB", "megabyte", Some(UnitSystem::Decimal), 1000 ^ 2;
    Gigabyte => "GB", "gigabyte", Some(UnitSystem::Decimal), 1000 ^ 3;
    Terabyte => "TB", "terabyte", Some(UnitSystem::Decimal), 1000 ^ 4;
    Petabyte => "PB", "petabyte", Some(UnitSystem::Decimal), 1000 ^ 5;
    Exabyte => "EB", "exabyte", Some(UnitSystem::Decimal), 1000 ^ 6;
    Zettabyte => "ZB", "zettabyte", Some(UnitSystem::Decimal), 1000 ^ 7;
    Yottabyte => "YB", "yottabyte", Some(UnitSystem::Decimal), 1000 ^ 8;
    Ronnabyte => "RB", "ronnabyte", Some(UnitSystem::Decimal), 1000 ^ 9;
    Quettabyte => "QB", "quettabyte", Some(UnitSystem::Decimal), 1000 ^ 10;

    Kibibyte => "KiB", "kibibyte", Some(UnitSystem::Binary), 1024 ^ 1;
    Mebibyte => "MiB", "mebibyte", Some(UnitSystem::Binary), 1024 ^ 2;
    Gibibyte => "GiB", "gibibyte", Some(UnitSystem::Binary), 1024 ^ 3;
    Tebibyte => "TiB", "tebibyte", Some(UnitSystem::Binary), 1024 ^ 4;
    Pebibyte => "PiB", "pebibyte", Some(UnitSystem::Binary), 1024 ^ 5;
    Exbibyte => "EiB", "exbibyte", Some(UnitSystem::Binary), 1024 ^ 6;
    Zebibyte => "ZiB", "zebibyte", Some(UnitSystem::Binary), 1024 ^ 7;
    Yobibyte => "YiB", "yobibyte", Some(UnitSystem::Binary), 1024 ^ 8;
    Robibyte => "RiB", "robibyte", Some(UnitSystem::Binary), 1024 ^ 9;
    Qubibyte => "QiB", "qubibyte", Some(UnitSystem::Binary), 1024 ^ 10;

    CommonKilobyte => "kB", "common_kilobyte", Some(UnitSystem::Common), 1024 ^ 1;
    CommonMegabyte => "MB", "common_megabyte", Some(UnitSystem::Common), 1024 ^ 2;
    CommonGigabyte => "GB", "common_gigabyte", Some(UnitSystem::Common), 1024 ^ 3;
    CommonTerabyte => "TB", "common_terabyte", Some(UnitSystem::Common), 1024 ^ 4;
    CommonPetabyte => "PB", "common_petabyte", Some(UnitSystem::Common), 1024 ^ 5;
    CommonExabyte => "EB", "common_exabyte", Some(UnitSystem::Common), 1024 ^ 6;
    CommonZettabyte => "ZB", "common_zettabyte", Some(UnitSystem::Common), 1024 ^ 7;
    CommonYottabyte => "YB", "common_yottabyte", Some(UnitSystem::Common), 1024 ^ 8;
    CommonRonnabyte => "RB", "common_ronnabyte", Some(UnitSystem::Common), 1024 ^ 9;
    CommonQuettabyte => "QB", "common_quettabyte", Some(UnitSystem::Common), 1024 ^ 10;
}

const BINARY_LADDER: [Unit; 11] = [
    Unit::Byte,
    Unit::Kibibyte,
    Unit::Mebibyte,
    Unit::Gibibyte,
    Unit::Tebibyte,
    Unit::Pebibyte,
    Unit::Exbibyte,
    Unit::Zebibyte,
    Unit::Yobibyte,
    Unit::Robibyte,
    Unit::Qubibyte,
];

const DECIMAL_LADDER: [Unit; 11] = [
    Unit::Byte,
    Unit::Kilobyte,
    Unit::Megabyte,
    Unit::Gigabyte,
    Unit::Terabyte,
    Unit::Petabyte,
    Unit::Exabyte,
    Unit::Zettabyte,
    Unit::Yottabyte,
    Unit::Ronnabyte,
    Unit::Quettabyte,
];

const COMMON_LADDER: [Unit; 11] = [
    Unit::Byte,
    Unit::CommonKilobyte,
    Unit::CommonMegabyte,
    Unit::CommonGigabyte,
    Unit::CommonTerabyte,
    Unit::CommonPetabyte,
    Unit::CommonExabyte,
    Unit::CommonZettabyte,
    Unit::CommonYottabyte,
    Unit::CommonRonnabyte,
    Unit::CommonQuettabyte,
];

// Indexed by `Unit as usize`; filled in declaration order.
static BYTES_PER_UNIT: Lazy<Vec<BigInt>> = Lazy::new(|| {
    Unit::ALL
        .iter()
        .map(|unit| {
            let (base, exponent) = unit.base_and_exponent();
            BigInt::from(base).pow(exponent)
        })
        .collect()
});

impl Unit {
    /// Number of bytes in one of this unit.
    #[inline]
    pub fn bytes_per_unit(self) -> &'static BigInt {
        &BYTES_PER_UNIT[self as usize]
    }

    /// Looks a symbol up within one ladder. This is the only way to reach the
    /// common units by symbol, since `kB`, `MB`, ... default to decimal.
    pub fn from_symbol(symbol: &str, system: UnitSystem) -> UnitResult<Self> {
        system
            .ladder()
            .iter()
            .copied()
            .find(|unit| unit.symbol() == symbol)
            .ok_or_else(|| UnitError::UnknownUnit(CompactString::from(symbol)))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    /// Accepts an exact symbol (`KiB`, `kB`) or a case-insensitive name
    /// (`kibibyte`, `Common_Megabyte`). Shared symbols resolve to decimal.
    fn from_str(s: &str) -> UnitResult<Self> {
        let trimmed = s.trim();

        [UnitSystem::Binary, UnitSystem::Decimal]
            .into_iter()
            .find_map(|system| Unit::from_symbol(trimmed, system).ok())
            .or_else(|| {
                Unit::ALL
                    .iter()
                    .copied()
                    .find(|unit| unit.name().eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| UnitError::UnknownUnit(CompactString::from(trimmed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladders_are_strictly_increasing() {
        for system in UnitSystem::ALL {
            let ladder = system.ladder();
            assert_eq!(ladder[0], Unit::Byte);
            for pair in ladder.windows(2) {
                assert!(pair[0].bytes_per_unit() < pair[1].bytes_per_unit());
            }
            for unit in &ladder[1..] {
                assert_eq!(unit.system(), Some(system));
            }
        }
    }

    #[test]
    fn test_divisors() {
        assert_eq!(*Unit::Byte.bytes_per_unit(), BigInt::from(1));
        assert_eq!(*Unit::Kilobyte.bytes_per_unit(), BigInt::from(1000));
        assert_eq!(*Unit::Kibibyte.bytes_per_unit(), BigInt::from(1024));
        assert_eq!(*Unit::CommonKilobyte.bytes_per_unit(), BigInt::from(1024));
        assert_eq!(*Unit::Gibibyte.bytes_per_unit(), BigInt::from(1u64 << 30));
        assert_eq!(
            *Unit::Quettabyte.bytes_per_unit(),
            "1000000000000000000000000000000".parse::<BigInt>().unwrap()
        );
        assert_eq!(*Unit::Qubibyte.bytes_per_unit(), BigInt::from(1u128 << 100));
        assert_eq!(
            Unit::CommonQuettabyte.bytes_per_unit(),
            Unit::Qubibyte.bytes_per_unit()
        );
    }

    #[test]
    fn test_symbols_and_systems() {
        assert_eq!(Unit::Byte.symbol(), "B");
        assert_eq!(Unit::Kibibyte.symbol(), "KiB");
        assert_eq!(Unit::Kilobyte.symbol(), "kB");
        assert_eq!(Unit::CommonKilobyte.symbol(), "kB");
        assert_eq!(Unit::Robibyte.symbol(), "RiB");
        assert_eq!(Unit::Byte.system(), None);
        assert_eq!(Unit::Terabyte.system(), Some(UnitSystem::Decimal));
        assert_eq!(Unit::CommonTerabyte.system(), Some(UnitSystem::Common));
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("KiB".parse::<Unit>().unwrap(), Unit::Kibibyte);
        assert_eq!("kB".parse::<Unit>().unwrap(), Unit::Kilobyte);
        assert_eq!(" B ".parse::<Unit>().unwrap(), Unit::Byte);
        assert_eq!("GIGABYTE".parse::<Unit>().unwrap(), Unit::Gigabyte);
        assert_eq!("common_megabyte".parse::<Unit>().unwrap(), Unit::CommonMegabyte);
        assert_eq!(
            "XiB".parse::<Unit>(),
            Err(UnitError::UnknownUnit("XiB".into()))
        );
    }

    #[test]
    fn test_from_symbol_in_common_ladder() {
        assert_eq!(
            Unit::from_symbol("MB", UnitSystem::Common).unwrap(),
            Unit::CommonMegabyte
        );
        assert_eq!(Unit::from_symbol("B", UnitSystem::Common).unwrap(), Unit::Byte);
        assert!(Unit::from_symbol("MiB", UnitSystem::Common).is_err());
    }

    #[test]
    fn test_parse_system() {
        assert_eq!("Binary".parse::<UnitSystem>().unwrap(), UnitSystem::Binary);
        assert_eq!("common".parse::<UnitSystem>().unwrap(), UnitSystem::Common);
        assert!("metric".parse::<UnitSystem>().unwrap_err().is_parse_error());
    }
}
