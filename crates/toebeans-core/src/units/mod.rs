//! Unit conversion table.
//!
//! Every quantity kind has one base unit values are normalized to:
//!
//! | Kind        | Base | Units                              |
//! |-------------|------|------------------------------------|
//! | mass        | mg   | mg = 1, g = 1000, kg = 1 000 000   |
//! | volume      | ml   | ml = 1, L = 1000                   |
//! | pet weight  | kg   | kg = 1, lb = 0.453592              |
//!
//! [`convert_to_base_unit`] never fails: an unknown unit or a non-finite value
//! yields `0.0`, and callers treat a zero as "no conversion possible".
//! [`try_convert_to_base_unit`] reports the same condition as `None`.

mod symbols;

pub use symbols::*;

use serde::{Deserialize, Serialize};

/// The kind of quantity a unit symbol is looked up under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, uniffi::Enum)]
#[serde(rename_all = "camelCase")]
pub enum QuantityKind {
    Mass,
    Volume,
    PetWeight,
}

/// Look up the multiplier that takes `unit` to the base unit of `kind`.
pub fn unit_factor(unit: &str, kind: QuantityKind) -> Option<f64> {
    match kind {
        QuantityKind::Mass => unit.parse::<MassUnit>().ok().map(MassUnit::factor),
        QuantityKind::Volume => unit.parse::<VolumeUnit>().ok().map(VolumeUnit::factor),
        QuantityKind::PetWeight => unit.parse::<WeightUnit>().ok().map(WeightUnit::factor),
    }
}

/// Convert `value` in `unit` to the base unit of `kind`.
///
/// Returns `None` when the value is not finite or the unit is not in the
/// table for `kind`.
pub fn try_convert_to_base_unit(value: f64, unit: &str, kind: QuantityKind) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    unit_factor(unit, kind).map(|factor| value * factor)
}

/// Convert `value` in `unit` to the base unit of `kind`, or `0.0` if that is
/// not possible.
pub fn convert_to_base_unit(value: f64, unit: &str, kind: QuantityKind) -> f64 {
    try_convert_to_base_unit(value, unit, kind).unwrap_or(0.0)
}
