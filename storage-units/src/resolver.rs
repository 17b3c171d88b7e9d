//! Best matching unit resolution.
//!
//! Walks a unit ladder from the smallest threshold upwards. Brackets are
//! half-open (`[low, high)`), so a magnitude equal to a threshold belongs to
//! the larger unit: 1024 bytes resolve to one kibibyte. Only the absolute
//! value takes part in the comparison; the resulting [`Quantity`] keeps the
//! signed magnitude.

use num_bigint::BigInt;
use tracing::trace;

use crate::{
    quantity::Quantity,
    unit::{Unit, UnitSystem},
};

/// Unit whose bracket of `system`'s ladder contains `|bytes|`.
///
/// Values below the first threshold stay in bytes; values at or beyond the
/// last threshold use the largest unit of the ladder.
pub fn resolve_unit(bytes: &BigInt, system: UnitSystem) -> Unit {
    let magnitude = bytes.magnitude();
    let mut selected = Unit::Byte;

    for unit in &system.ladder()[1..] {
        if magnitude < unit.bytes_per_unit().magnitude() {
            break;
        }
        selected = *unit;
    }

    selected
}

/// Wraps `bytes` in a [`Quantity`] tagged with the best matching unit of `system`.
pub fn best_matching(bytes: BigInt, system: UnitSystem) -> Quantity {
    let unit = resolve_unit(&bytes, system);
    trace!(
        marker = "UNIT_RESOLVED",
        bytes = %bytes,
        system = %system,
        unit = unit.symbol(),
        "Resolved best matching unit"
    );
    Quantity::tagged(bytes, unit, system)
}
