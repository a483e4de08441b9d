//! Typed unit symbols accepted by the conversion table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A unit symbol that is not part of the table for the requested kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} unit: {symbol}")]
pub struct UnknownUnit {
    pub kind: &'static str,
    pub symbol: String,
}

/// Mass units for dosages, concentrations and tablet sizes. Base unit: mg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MassUnit {
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
}

impl MassUnit {
    pub const ALL: [MassUnit; 3] = [MassUnit::Milligram, MassUnit::Gram, MassUnit::Kilogram];

    pub fn symbol(self) -> &'static str {
        match self {
            MassUnit::Milligram => "mg",
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
        }
    }

    /// Multiplier into milligrams.
    pub fn factor(self) -> f64 {
        match self {
            MassUnit::Milligram => 1.0,
            MassUnit::Gram => 1000.0,
            MassUnit::Kilogram => 1_000_000.0,
        }
    }
}

/// Liquid volume units for concentrations. Base unit: ml.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VolumeUnit {
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "L")]
    Liter,
}

impl VolumeUnit {
    pub const ALL: [VolumeUnit; 2] = [VolumeUnit::Milliliter, VolumeUnit::Liter];

    pub fn symbol(self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "ml",
            VolumeUnit::Liter => "L",
        }
    }

    /// Multiplier into milliliters.
    pub fn factor(self) -> f64 {
        match self {
            VolumeUnit::Milliliter => 1.0,
            VolumeUnit::Liter => 1000.0,
        }
    }
}

/// Units a pet's body weight may be recorded in. Base unit: kg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeightUnit {
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "lb")]
    Pound,
}

impl WeightUnit {
    pub const ALL: [WeightUnit; 2] = [WeightUnit::Kilogram, WeightUnit::Pound];

    pub fn symbol(self) -> &'static str {
        match self {
            WeightUnit::Kilogram => "kg",
            WeightUnit::Pound => "lb",
        }
    }

    /// Multiplier into kilograms.
    pub fn factor(self) -> f64 {
        match self {
            WeightUnit::Kilogram => 1.0,
            WeightUnit::Pound => 0.453592,
        }
    }
}

macro_rules! impl_symbol_traits {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownUnit;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|unit| unit.symbol() == s)
                    .ok_or_else(|| UnknownUnit {
                        kind: $kind,
                        symbol: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        }
    };
}

impl_symbol_traits!(MassUnit, "mass");
impl_symbol_traits!(VolumeUnit, "volume");
impl_symbol_traits!(WeightUnit, "pet weight");
