//! Display precision and plausibility warnings for calculated doses.
//!
//! These thresholds are fixed; they are not user settings.

use serde::{Deserialize, Serialize};

use super::DosageUnit;

/// Decimal places shown for a volume in ml.
pub const VOLUME_DECIMALS: usize = 3;
/// Decimal places shown for a tablet count.
pub const TABLET_DECIMALS: usize = 2;

/// Volumes above this (ml) are flagged as very large.
pub const LARGE_VOLUME_ML: f64 = 100.0;
/// Positive volumes below this (ml) are flagged as very small.
pub const SMALL_VOLUME_ML: f64 = 0.01;
/// Tablet counts above this are flagged as unusual.
pub const UNUSUAL_TABLET_COUNT: f64 = 2.0;
/// Positive tablet counts below this mean a tablet has to be cut.
pub const PILL_CUTTING_THRESHOLD: f64 = 0.5;

/// Reasons a successfully calculated dose deserves a second look.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DosageWarning {
    VeryLargeVolume,
    VerySmallVolume,
    UnusualTabletCount,
    RequiresCuttingPill,
}

impl DosageWarning {
    /// User-facing text for the warning.
    pub fn message(self) -> &'static str {
        match self {
            DosageWarning::VeryLargeVolume => {
                "Warning: This volume is very large. Please double-check your units and inputs."
            }
            DosageWarning::VerySmallVolume => {
                "Note: This volume is extremely small (less than 0.01 ml). Ensure your dose units (mg vs g) are correct."
            }
            DosageWarning::UnusualTabletCount => {
                "Note: Administering more than 2 units is unusual. Please double-check the required dose and tablet size."
            }
            DosageWarning::RequiresCuttingPill => {
                "Note: This dose is less than half a tablet. The tablet will need to be cut."
            }
        }
    }
}

/// Pick the warning, if any, for an amount in `unit`.
pub fn warning_for(amount: f64, unit: DosageUnit) -> Option<DosageWarning> {
    match unit {
        DosageUnit::Milliliters if amount > LARGE_VOLUME_ML => Some(DosageWarning::VeryLargeVolume),
        DosageUnit::Milliliters if amount > 0.0 && amount < SMALL_VOLUME_ML => {
            Some(DosageWarning::VerySmallVolume)
        }
        DosageUnit::Tablets if amount > UNUSUAL_TABLET_COUNT => {
            Some(DosageWarning::UnusualTabletCount)
        }
        DosageUnit::Tablets if amount > 0.0 && amount < PILL_CUTTING_THRESHOLD => {
            Some(DosageWarning::RequiresCuttingPill)
        }
        _ => None,
    }
}

/// Format an amount with the precision used for its unit.
pub fn format_amount(amount: f64, unit: DosageUnit) -> String {
    let decimals = match unit {
        DosageUnit::Milliliters => VOLUME_DECIMALS,
        DosageUnit::Tablets => TABLET_DECIMALS,
    };
    format!("{:.*}", decimals, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_thresholds() {
        let ml = DosageUnit::Milliliters;
        assert_eq!(warning_for(100.5, ml), Some(DosageWarning::VeryLargeVolume));
        assert_eq!(warning_for(100.0, ml), None);
        assert_eq!(warning_for(0.005, ml), Some(DosageWarning::VerySmallVolume));
        assert_eq!(warning_for(0.01, ml), None);
        assert_eq!(warning_for(0.0, ml), None);
    }

    #[test]
    fn test_tablet_thresholds() {
        let tablets = DosageUnit::Tablets;
        assert_eq!(warning_for(2.5, tablets), Some(DosageWarning::UnusualTabletCount));
        assert_eq!(warning_for(2.0, tablets), None);
        assert_eq!(warning_for(0.25, tablets), Some(DosageWarning::RequiresCuttingPill));
        assert_eq!(warning_for(0.5, tablets), None);
        assert_eq!(warning_for(0.0, tablets), None);
    }

    #[test]
    fn test_thresholds_do_not_cross_units() {
        assert_eq!(warning_for(3.0, DosageUnit::Milliliters), None);
        assert_eq!(warning_for(0.3, DosageUnit::Milliliters), None);
        assert_eq!(warning_for(150.0, DosageUnit::Tablets), Some(DosageWarning::UnusualTabletCount));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.01, DosageUnit::Milliliters), "0.010");
        assert_eq!(format_amount(1.23456, DosageUnit::Milliliters), "1.235");
        assert_eq!(format_amount(2.0, DosageUnit::Tablets), "2.00");
        assert_eq!(format_amount(0.333333, DosageUnit::Tablets), "0.33");
    }
}
