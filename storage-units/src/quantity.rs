//! Immutable storage size value.
//!
//! A [`Quantity`] always stores its magnitude in bytes. The unit tag only
//! decides how the value is displayed and which ladder it re-resolves within,
//! so retagging never loses information and equality ignores the tag.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    iter::Sum,
    ops::{Add, Mul, Sub},
};

use bigdecimal::BigDecimal;
use compact_str::CompactString;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{
    error::{UnitError, UnitResult},
    format::{locale::Locale, options::FormatOptions},
    resolver,
    unit::{Unit, UnitSystem},
};

/// Fractional digits kept by [`Quantity::in_unit`].
pub const CONVERSION_SCALE: i64 = 24;

static CONVERSION_FACTOR: Lazy<BigInt> =
    Lazy::new(|| BigInt::from(10u32).pow(CONVERSION_SCALE as u32));

/// Integer factors accepted by [`Quantity::multiply`] and [`Quantity::divide`].
///
/// Another [`Quantity`] is not a scalar:
///
/// ```compile_fail
/// use storage_units::Quantity;
///
/// let squared = Quantity::kibibyte(1).multiply(Quantity::kibibyte(1));
/// ```
pub trait Scalar: Into<BigInt> {}

impl Scalar for BigInt {}

macro_rules! scalar_primitives {
    ($($ty:ty),+) => {
        $(impl Scalar for $ty {})+
    };
}

scalar_primitives!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "QuantityRepr", try_from = "QuantityRepr")]
pub struct Quantity {
    bytes: BigInt,
    unit: Unit,
    // Ladder used by `as_best_matching_unit`; only differs from
    // `unit.system()` while the unit is the shared byte unit.
    system: UnitSystem,
}

impl Quantity {
    /// Wraps a raw byte count, tagged as bytes of the binary system.
    #[inline]
    pub fn new(bytes: impl Into<BigInt>) -> Self {
        Self {
            bytes: bytes.into(),
            unit: Unit::Byte,
            system: UnitSystem::Binary,
        }
    }

    /// Creates `count` of `unit`, i.e. `count * unit.bytes_per_unit()` bytes.
    pub fn of(unit: Unit, count: impl Into<BigInt>) -> Self {
        let bytes = count.into() * unit.bytes_per_unit();
        Self::tagged(bytes, unit, unit.system().unwrap_or_default())
    }

    #[inline]
    pub(crate) fn tagged(bytes: BigInt, unit: Unit, system: UnitSystem) -> Self {
        Self {
            bytes,
            unit,
            system,
        }
    }

    /// Restores a value from a stored byte count, expressed in the best
    /// matching unit of `system`.
    #[inline]
    pub fn from_byte_count(bytes: impl Into<BigInt>, system: UnitSystem) -> Self {
        resolver::best_matching(bytes.into(), system)
    }

    /// Byte count to hand to an external store.
    #[inline]
    pub fn to_byte_count(&self) -> BigInt {
        self.bytes.clone()
    }

    #[inline]
    pub fn bytes(&self) -> &BigInt {
        &self.bytes
    }

    /// Alias of [`Quantity::bytes`], mirroring [`Quantity::in_unit`].
    #[inline]
    pub fn in_byte(&self) -> &BigInt {
        &self.bytes
    }

    #[inline]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    #[inline]
    pub fn system(&self) -> UnitSystem {
        self.system
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        self.unit.symbol()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.bytes.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.bytes.is_negative()
    }

    // ------------------------------------------------------------
    // Conversion
    // ------------------------------------------------------------

    /// Same magnitude, displayed as `unit`.
    pub fn as_unit(&self, unit: Unit) -> Self {
        Self::tagged(
            self.bytes.clone(),
            unit,
            unit.system().unwrap_or(self.system),
        )
    }

    /// Magnitude expressed in `unit`, at [`CONVERSION_SCALE`] fractional digits
    /// rounded toward positive infinity.
    pub fn in_unit(&self, unit: Unit) -> BigDecimal {
        let scaled = &self.bytes * &*CONVERSION_FACTOR;
        let quotient = Integer::div_ceil(&scaled, unit.bytes_per_unit());
        BigDecimal::new(quotient, CONVERSION_SCALE)
    }

    /// Magnitude expressed in the current unit.
    #[inline]
    pub fn in_current_unit(&self) -> BigDecimal {
        self.in_unit(self.unit)
    }

    pub fn as_best_matching_binary_unit(&self) -> Self {
        resolver::best_matching(self.bytes.clone(), UnitSystem::Binary)
    }

    pub fn as_best_matching_decimal_unit(&self) -> Self {
        resolver::best_matching(self.bytes.clone(), UnitSystem::Decimal)
    }

    pub fn as_best_matching_common_unit(&self) -> Self {
        resolver::best_matching(self.bytes.clone(), UnitSystem::Common)
    }

    /// Re-resolves within the system this value currently belongs to.
    pub fn as_best_matching_unit(&self) -> Self {
        resolver::best_matching(self.bytes.clone(), self.system)
    }

    // ------------------------------------------------------------
    // Arithmetic (results keep the receiver's unit)
    // ------------------------------------------------------------

    pub fn add(&self, other: impl Into<BigInt>) -> Self {
        self.with_bytes(&self.bytes + other.into())
    }

    pub fn subtract(&self, other: impl Into<BigInt>) -> Self {
        self.with_bytes(&self.bytes - other.into())
    }

    pub fn multiply(&self, factor: impl Scalar) -> Self {
        self.with_bytes(&self.bytes * factor.into())
    }

    /// Integer division truncating toward zero.
    pub fn divide(&self, divisor: impl Scalar) -> UnitResult<Self> {
        let divisor = divisor.into();
        if divisor.is_zero() {
            return Err(UnitError::DivisionByZero);
        }
        Ok(self.with_bytes(&self.bytes / divisor))
    }

    #[inline]
    fn with_bytes(&self, bytes: BigInt) -> Self {
        Self::tagged(bytes, self.unit, self.system)
    }

    // ------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------

    /// Formats the value in its current unit followed by a space and the symbol.
    pub fn format(&self, options: &FormatOptions) -> String {
        let mut out = options.format_value(&self.in_current_unit());
        out.push(' ');
        out.push_str(self.unit.symbol());
        out
    }

    pub fn to_string_with(&self, pattern: &str, locale: &Locale) -> UnitResult<String> {
        let options = FormatOptions::new(pattern)?.with_locale(locale.clone());
        Ok(self.format(&options))
    }

    /// Formats with `pattern` and the system locale.
    pub fn to_string_pattern(&self, pattern: &str) -> UnitResult<String> {
        Ok(self.format(&FormatOptions::new(pattern)?))
    }

    /// Formats with the default pattern and `locale`.
    pub fn to_string_in(&self, locale: &Locale) -> String {
        self.format(&FormatOptions::default().with_locale(locale.clone()))
    }

    // ------------------------------------------------------------
    // Lossy primitive views
    // ------------------------------------------------------------

    #[inline]
    pub fn to_u64(&self) -> Option<u64> {
        self.bytes.to_u64()
    }

    #[inline]
    pub fn to_i64(&self) -> Option<i64> {
        self.bytes.to_i64()
    }

    #[inline]
    pub fn to_f64(&self) -> Option<f64> {
        self.bytes.to_f64()
    }
}

macro_rules! unit_constructors {
    ($($fn_name:ident => $unit:ident),+ $(,)?) => {
        impl Quantity {
            $(
                #[doc = concat!("Creates `count` ", stringify!($unit), "s.")]
                #[inline]
                pub fn $fn_name(count: impl Into<BigInt>) -> Self {
                    Self::of(Unit::$unit, count)
                }
            )+
        }
    };
}

unit_constructors! {
    byte => Byte,
    kilobyte => Kilobyte,
    megabyte => Megabyte,
    gigabyte => Gigabyte,
    terabyte => Terabyte,
    petabyte => Petabyte,
    exabyte => Exabyte,
    zettabyte => Zettabyte,
    yottabyte => Yottabyte,
    ronnabyte => Ronnabyte,
    quettabyte => Quettabyte,
    kibibyte => Kibibyte,
    mebibyte => Mebibyte,
    gibibyte => Gibibyte,
    tebibyte => Tebibyte,
    pebibyte => Pebibyte,
    exbibyte => Exbibyte,
    zebibyte => Zebibyte,
    yobibyte => Yobibyte,
    robibyte => Robibyte,
    qubibyte => Qubibyte,
    common_kilobyte => CommonKilobyte,
    common_megabyte => CommonMegabyte,
    common_gigabyte => CommonGigabyte,
    common_terabyte => CommonTerabyte,
    common_petabyte => CommonPetabyte,
    common_exabyte => CommonExabyte,
    common_zettabyte => CommonZettabyte,
    common_yottabyte => CommonYottabyte,
    common_ronnabyte => CommonRonnabyte,
    common_quettabyte => CommonQuettabyte,
}

// ------------------------------------------------------------
// Equality and ordering by byte magnitude only
// ------------------------------------------------------------

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Quantity {}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format(&FormatOptions::default()))
    }
}

// ------------------------------------------------------------
// Conversions
// ------------------------------------------------------------

impl From<Quantity> for BigInt {
    #[inline]
    fn from(quantity: Quantity) -> Self {
        quantity.bytes
    }
}

impl From<&Quantity> for BigInt {
    #[inline]
    fn from(quantity: &Quantity) -> Self {
        quantity.bytes.clone()
    }
}

impl From<BigInt> for Quantity {
    #[inline]
    fn from(bytes: BigInt) -> Self {
        Self::new(bytes)
    }
}

macro_rules! from_primitive {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Quantity {
                #[inline]
                fn from(bytes: $ty) -> Self {
                    Self::new(bytes)
                }
            }
        )+
    };
}

from_primitive!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

// ------------------------------------------------------------
// Operators
// ------------------------------------------------------------

// Implemented on references only: an owned impl would shadow the inherent
// `add(&self, ..)` family during method resolution and consume the receiver.

macro_rules! forward_binop {
    ($($trait:ident :: $method:ident => $inherent:ident),+) => {
        $(
            impl<T: Into<BigInt>> $trait<T> for &Quantity {
                type Output = Quantity;

                #[inline]
                fn $method(self, rhs: T) -> Quantity {
                    Quantity::$inherent(self, rhs)
                }
            }
        )+
    };
}

forward_binop!(Add::add => add, Sub::sub => subtract);

impl<T: Scalar> Mul<T> for &Quantity {
    type Output = Quantity;

    #[inline]
    fn mul(self, rhs: T) -> Quantity {
        self.multiply(rhs)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::new(0), |acc, item| acc.add(item))
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::new(0), |acc, item| acc.add(item))
    }
}

// ------------------------------------------------------------
// Serialization
// ------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct QuantityRepr {
    bytes: CompactString,
    unit: Unit,
}

impl From<Quantity> for QuantityRepr {
    fn from(quantity: Quantity) -> Self {
        Self {
            bytes: CompactString::from(quantity.bytes.to_string()),
            unit: quantity.unit,
        }
    }
}

impl TryFrom<QuantityRepr> for Quantity {
    type Error = UnitError;

    fn try_from(repr: QuantityRepr) -> UnitResult<Self> {
        let bytes = repr
            .bytes
            .parse::<BigInt>()
            .map_err(|_| UnitError::parse(repr.bytes.as_str(), "an integer byte count"))?;
        Ok(Quantity::new(bytes).as_unit(repr.unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn us(quantity: &Quantity) -> String {
        quantity.to_string_in(&Locale::US)
    }

    #[test]
    fn test_new_is_unresolved_bytes() {
        let quantity = Quantity::new(1024);
        assert_eq!(quantity.unit(), Unit::Byte);
        assert_eq!(quantity.system(), UnitSystem::Binary);
        assert_eq!(us(&quantity), "1024.00 B");
    }

    #[test]
    fn test_unit_constructors_multiply_by_divisor() {
        assert_eq!(*Quantity::kilobyte(3).bytes(), BigInt::from(3000));
        assert_eq!(*Quantity::kibibyte(3).bytes(), BigInt::from(3072));
        assert_eq!(*Quantity::common_megabyte(1).bytes(), BigInt::from(1_048_576));
        assert_eq!(Quantity::gibibyte(2).unit(), Unit::Gibibyte);
        assert_eq!(Quantity::common_kilobyte(1).system(), UnitSystem::Common);
    }

    #[test]
    fn test_as_unit_round_trip() {
        for n in [0u64, 1, 999, 1000, 1023, 1024, 123_456_789, u64::MAX] {
            for unit in Unit::ALL {
                let converted = Quantity::new(n).as_unit(*unit);
                assert_eq!(*converted.in_byte(), BigInt::from(n));
                assert_eq!(converted.unit(), *unit);
            }
        }
    }

    #[test]
    fn test_as_unit_byte_keeps_system() {
        let common = Quantity::common_kilobyte(2).as_unit(Unit::Byte);
        assert_eq!(common.system(), UnitSystem::Common);
        assert_eq!(common.as_best_matching_unit().unit(), Unit::CommonKilobyte);
    }

    #[test]
    fn test_in_unit_exact_and_ceiling() {
        let quantity = Quantity::new(1536);
        assert_eq!(
            quantity.in_unit(Unit::Kibibyte),
            BigDecimal::from_str("1.5").unwrap()
        );
        assert_eq!(
            quantity.in_unit(Unit::Kilobyte),
            BigDecimal::from_str("1.536").unwrap()
        );

        // 1 / 2^100 has 100 fractional digits and rounds up at the 24th.
        let tiny = Quantity::new(1).in_unit(Unit::Qubibyte);
        assert_eq!(tiny, BigDecimal::from_str("0.000000000000000000000001").unwrap());

        // ceiling moves negative values toward zero
        let negative = Quantity::new(-1).in_unit(Unit::Qubibyte);
        assert!(negative.is_zero());
    }

    #[test]
    fn test_in_unit_does_not_retag() {
        let quantity = Quantity::kibibyte(4);
        let _ = quantity.in_unit(Unit::Megabyte);
        assert_eq!(quantity.unit(), Unit::Kibibyte);
    }

    #[test]
    fn test_arithmetic_keeps_receiver_unit() {
        let sum = Quantity::kibibyte(1).add(Quantity::kilobyte(1));
        assert_eq!(sum.unit(), Unit::Kibibyte);
        assert_eq!(*sum.bytes(), BigInt::from(2024));

        let difference = Quantity::megabyte(1).subtract(1);
        assert_eq!(difference.unit(), Unit::Megabyte);
        assert_eq!(*difference.bytes(), BigInt::from(999_999));

        let product = Quantity::kibibyte(2).multiply(3);
        assert_eq!(*product.bytes(), BigInt::from(6144));
    }

    #[test]
    fn test_add_commutative_and_associative() {
        let a = Quantity::kibibyte(7);
        let b = Quantity::megabyte(3);
        let c = Quantity::new(-12_345);

        assert_eq!(a.add(&b).in_byte(), b.add(&a).in_byte());
        assert_eq!(
            a.add(&b).add(&c).in_byte(),
            a.add(b.add(&c)).in_byte()
        );
    }

    #[test]
    fn test_divide_truncates_toward_zero() {
        assert_eq!(*Quantity::new(7).divide(2).unwrap().bytes(), BigInt::from(3));
        assert_eq!(*Quantity::new(-7).divide(2).unwrap().bytes(), BigInt::from(-3));
        assert_eq!(
            Quantity::gibibyte(1).divide(4).unwrap().unit(),
            Unit::Gibibyte
        );
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(Quantity::new(100).divide(0), Err(UnitError::DivisionByZero));
    }

    #[test]
    fn test_equality_ignores_unit() {
        assert_eq!(Quantity::kilobyte(1), Quantity::new(1000));
        assert_eq!(Quantity::kibibyte(1), Quantity::common_kilobyte(1));
        assert_ne!(Quantity::kibibyte(1), Quantity::kilobyte(1));
    }

    #[test]
    fn test_ordering_by_bytes() {
        assert!(Quantity::kibibyte(1) > Quantity::kilobyte(1));
        assert!(Quantity::new(-1) < Quantity::byte(0));
        assert_eq!(
            Quantity::megabyte(1).cmp(&Quantity::kilobyte(1000)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_hash_matches_equality() {
        use std::collections::HashSet;

        let set: HashSet<Quantity> = [Quantity::kilobyte(1), Quantity::new(1000)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_operators() {
        let total = &Quantity::kibibyte(1) + 1024u32;
        assert_eq!(*total.bytes(), BigInt::from(2048));
        assert_eq!(total.unit(), Unit::Kibibyte);

        let borrowed = &total - Quantity::new(48);
        assert_eq!(*borrowed.bytes(), BigInt::from(2000));

        let scaled = &borrowed * 2;
        assert_eq!(*scaled.bytes(), BigInt::from(4000));
    }

    #[test]
    fn test_sum() {
        let parts = vec![Quantity::kibibyte(1), Quantity::new(512), Quantity::kilobyte(1)];
        let total: Quantity = parts.iter().sum();
        assert_eq!(*total.bytes(), BigInt::from(2536));
        let owned: Quantity = parts.into_iter().sum();
        assert_eq!(owned, total);
    }

    #[test]
    fn test_best_matching_after_arithmetic() {
        let quantity = Quantity::kibibyte(0).add(1234).as_best_matching_unit();
        assert_eq!(quantity.unit(), Unit::Kibibyte);
        assert_eq!(us(&quantity), "1.21 KiB");
    }

    #[test]
    fn test_best_matching_variants() {
        let quantity = Quantity::new(1_500_000);
        assert_eq!(quantity.as_best_matching_decimal_unit().unit(), Unit::Megabyte);
        assert_eq!(quantity.as_best_matching_binary_unit().unit(), Unit::Mebibyte);
        assert_eq!(
            quantity.as_best_matching_common_unit().unit(),
            Unit::CommonMegabyte
        );
        assert_eq!(
            Quantity::kilobyte(0).add(2_000_000).as_best_matching_unit().unit(),
            Unit::Megabyte
        );
    }

    #[test]
    fn test_persistence_round_trip() {
        let stored = Quantity::gibibyte(3).to_byte_count();
        let restored = Quantity::from_byte_count(stored, UnitSystem::Binary);
        assert_eq!(restored.unit(), Unit::Gibibyte);
        assert_eq!(restored, Quantity::gibibyte(3));
    }

    #[test]
    fn test_format_patterns() {
        let quantity = Quantity::kibibyte(1).add(512);
        assert_eq!(quantity.to_string_with("0.0", &Locale::US).unwrap(), "1.5 KiB");
        assert_eq!(quantity.to_string_with("#", &Locale::US).unwrap(), "2 KiB");
        assert_eq!(
            quantity.to_string_with("0.000", &Locale::GERMANY).unwrap(),
            "1,500 KiB"
        );
        assert!(quantity.to_string_with("0.0.0", &Locale::US).is_err());
    }

    #[test]
    fn test_display_uses_default_options() {
        let quantity = Quantity::mebibyte(5);
        assert_eq!(quantity.to_string(), quantity.format(&FormatOptions::default()));
    }

    #[test]
    fn test_display_honours_width() {
        let quantity = Quantity::new(5);
        let plain = quantity.to_string();
        assert_eq!(format!("{quantity:>12}"), format!("{plain:>12}"));
        assert_eq!(format!("{quantity:<12}").chars().count(), 12);
        assert!(format!("{quantity:>12}").starts_with(' '));
    }

    #[test]
    fn test_scalar_factors() {
        let quantity = Quantity::kibibyte(1);
        assert_eq!(quantity.multiply(BigInt::from(3)), Quantity::new(3072));
        assert_eq!(quantity.multiply(3u8), quantity.multiply(3i128));
        assert_eq!(quantity.divide(BigInt::from(2)).unwrap(), Quantity::new(512));
        assert_eq!(
            quantity.divide(BigInt::zero()),
            Err(UnitError::DivisionByZero)
        );
    }

    #[test]
    fn test_primitive_views() {
        assert_eq!(Quantity::kibibyte(1).to_u64(), Some(1024));
        assert_eq!(Quantity::new(-5).to_u64(), None);
        assert_eq!(Quantity::new(-5).to_i64(), Some(-5));
        assert_eq!(Quantity::qubibyte(1).to_u64(), None);
        assert_eq!(Quantity::mebibyte(1).to_f64(), Some(1_048_576.0));
    }

    #[test]
    fn test_serde_shape() {
        let quantity = Quantity::kibibyte(2);
        let json = serde_json::to_string(&quantity).unwrap();
        assert_eq!(json, r#"{"bytes":"2048","unit":"kibibyte"}"#);

        let restored: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.unit(), Unit::Kibibyte);
        assert_eq!(restored, quantity);

        let common: Quantity =
            serde_json::from_str(r#"{"bytes":"1024","unit":"common_kilobyte"}"#).unwrap();
        assert_eq!(common.system(), UnitSystem::Common);

        assert!(serde_json::from_str::<Quantity>(r#"{"bytes":"1.5","unit":"byte"}"#).is_err());
    }
}
