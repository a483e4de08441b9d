//! Weight-based dosage calculation.
//!
//! Pipeline: parse inputs → pet weight to kg → per-kg dose to mg →
//! total dose (mg) → volume (ml) or tablet count.
//!
//! The calculator is a pure function of a [`Medication`] and its [`Pet`]. It
//! never panics and never fails with an `Err`: problems are reported inside
//! the returned [`DosageResult`], which always carries the unit label of the
//! medication's dose form so callers can render it either way.

mod advisory;

pub use advisory::*;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{parse_positive, present, DoseForm, Medication, Pet};
use crate::units::{convert_to_base_unit, try_convert_to_base_unit, QuantityKind};

/// Why a dose could not be calculated. Checks run in declaration order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DosageError {
    #[error("Dosage per kg is invalid.")]
    InvalidDosage,

    #[error("Pet weight is invalid.")]
    InvalidPetWeight,

    #[error("Pet weight conversion failed.")]
    WeightConversionFailed,

    #[error("Concentration mass value is invalid.")]
    InvalidConcentration,

    #[error("Concentration mass cannot be zero.")]
    ZeroConcentrationMass,

    #[error("Tablet size value is invalid.")]
    InvalidTabletSize,

    #[error("Tablet size cannot be zero.")]
    ZeroTabletSize,

    #[error("Calculation failed. Check all number inputs.")]
    CalculationFailed,

    #[error("Missing required fields for calculation.")]
    MissingFields,
}

/// Unit the calculated amount is expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DosageUnit {
    #[serde(rename = "ml")]
    Milliliters,
    #[serde(rename = "tablets")]
    Tablets,
}

impl DosageUnit {
    /// Liquids are measured in ml, pills are counted.
    pub fn for_form(form: DoseForm) -> Self {
        match form {
            DoseForm::Liquid => DosageUnit::Milliliters,
            DoseForm::Pill => DosageUnit::Tablets,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DosageUnit::Milliliters => "ml",
            DosageUnit::Tablets => "tablets",
        }
    }
}

impl fmt::Display for DosageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a dosage calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DosageResult {
    /// Amount to administer; `0.0` when `error` is set
    pub result: f64,
    /// Label for `result`, fixed by the dose form
    pub unit: DosageUnit,
    /// Failure reason, if the dose could not be calculated
    pub error: Option<DosageError>,
}

impl DosageResult {
    fn success(result: f64, unit: DosageUnit) -> Self {
        Self {
            result,
            unit,
            error: None,
        }
    }

    fn failure(unit: DosageUnit, error: DosageError) -> Self {
        Self {
            result: 0.0,
            unit,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The error text, or an empty string on success.
    pub fn error_message(&self) -> String {
        self.error.map(|e| e.to_string()).unwrap_or_default()
    }

    /// `result` rounded for display (3 decimals for ml, 2 for tablets).
    pub fn display_value(&self) -> String {
        format_amount(self.result, self.unit)
    }

    /// Plausibility warning for a successful result.
    pub fn warning(&self) -> Option<DosageWarning> {
        if self.error.is_some() {
            return None;
        }
        warning_for(self.result, self.unit)
    }
}

/// Calculate how much of `medication` to give `pet` in one dose.
///
/// Tablet size is read in the medication's per-kg dosage unit: a pill
/// prescribed at "10 mg/kg" with a tablet size of "100" holds 100 mg.
pub fn calculate_dosage(medication: &Medication, pet: &Pet) -> DosageResult {
    let unit = DosageUnit::for_form(medication.dose_form);
    match required_amount(medication, pet) {
        Ok(amount) => DosageResult::success(amount, unit),
        Err(error) => DosageResult::failure(unit, error),
    }
}

fn required_amount(medication: &Medication, pet: &Pet) -> Result<f64, DosageError> {
    let dosage_per_kg =
        parse_positive(&medication.dosage_per_kg_value).ok_or(DosageError::InvalidDosage)?;
    let pet_weight = parse_positive(&pet.weight).ok_or(DosageError::InvalidPetWeight)?;

    let pet_weight_kg =
        try_convert_to_base_unit(pet_weight, &pet.weight_unit, QuantityKind::PetWeight)
            .filter(|kg| *kg > 0.0)
            .ok_or(DosageError::WeightConversionFailed)?;

    // An unknown dosage unit contributes 0 mg rather than failing here
    let required_mg_per_kg =
        convert_to_base_unit(dosage_per_kg, &medication.dosage_unit_per_kg, QuantityKind::Mass);
    let total_dose_mg = required_mg_per_kg * pet_weight_kg;

    match medication.dose_form {
        DoseForm::Liquid => liquid_volume_ml(medication, total_dose_mg),
        DoseForm::Pill => tablet_count(medication, total_dose_mg),
    }
}

fn liquid_volume_ml(medication: &Medication, total_dose_mg: f64) -> Result<f64, DosageError> {
    let (Some(value), Some(mass_unit), Some(volume_unit)) = (
        present(&medication.concentration_value),
        present(&medication.concentration_mass_unit),
        present(&medication.concentration_volume_unit),
    ) else {
        return Err(DosageError::MissingFields);
    };

    let concentration = parse_positive(value).ok_or(DosageError::InvalidConcentration)?;
    let concentration_mg = convert_to_base_unit(concentration, mass_unit, QuantityKind::Mass);
    // How many ml the label's volume unit stands for
    let concentration_ml = convert_to_base_unit(1.0, volume_unit, QuantityKind::Volume);

    if concentration_mg == 0.0 {
        return Err(DosageError::ZeroConcentrationMass);
    }

    checked((total_dose_mg / concentration_mg) * concentration_ml)
}

fn tablet_count(medication: &Medication, total_dose_mg: f64) -> Result<f64, DosageError> {
    let Some(size) = present(&medication.tablet_size) else {
        return Err(DosageError::MissingFields);
    };

    let tablet_size = parse_positive(size).ok_or(DosageError::InvalidTabletSize)?;
    let tablet_size_mg =
        convert_to_base_unit(tablet_size, &medication.dosage_unit_per_kg, QuantityKind::Mass);

    if tablet_size_mg == 0.0 {
        return Err(DosageError::ZeroTabletSize);
    }

    checked(total_dose_mg / tablet_size_mg)
}

fn checked(amount: f64) -> Result<f64, DosageError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(DosageError::CalculationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, MedicationDetails, PetDetails};
    use crate::units::{MassUnit, VolumeUnit, WeightUnit};

    fn pet(weight: &str, unit: WeightUnit) -> Pet {
        Pet::new(PetDetails::new("Biscuit", "Dog", weight, unit))
    }

    fn liquid(dosage: &str, conc: &str, mass: MassUnit, volume: VolumeUnit) -> Medication {
        Medication::new(MedicationDetails::liquid(
            "Amoxicillin",
            dosage,
            MassUnit::Milligram,
            Frequency::TwiceDaily,
            conc,
            mass,
            volume,
        ))
    }

    fn pill(dosage: &str, unit: MassUnit, size: &str) -> Medication {
        Medication::new(MedicationDetails::pill(
            "Carprofen",
            dosage,
            unit,
            Frequency::OnceDaily,
            size,
        ))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_liquid_small_dog() {
        let med = liquid("5", "5", MassUnit::Gram, VolumeUnit::Milliliter);
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));

        assert!(result.is_ok());
        assert_eq!(result.unit, DosageUnit::Milliliters);
        assert_close(result.result, 0.01);
    }

    #[test]
    fn test_liquid_large_dog() {
        let med = liquid("5", "5", MassUnit::Gram, VolumeUnit::Milliliter);
        let result = calculate_dosage(&med, &pet("100", WeightUnit::Kilogram));
        assert_close(result.result, 0.1);
    }

    #[test]
    fn test_liquid_per_liter_concentration() {
        // 50 mg/kg × 4 kg = 200 mg; 1 g per L = 1 mg per ml → 200 ml
        let med = liquid("50", "1", MassUnit::Gram, VolumeUnit::Liter);
        let result = calculate_dosage(&med, &pet("4", WeightUnit::Kilogram));
        assert_close(result.result, 200.0);
    }

    #[test]
    fn test_pill_exact_two_tablets() {
        let med = pill("10", MassUnit::Milligram, "100");
        let result = calculate_dosage(&med, &pet("20", WeightUnit::Kilogram));

        assert_eq!(result.unit, DosageUnit::Tablets);
        assert_eq!(result.error, None);
        assert_close(result.result, 2.0);
    }

    #[test]
    fn test_pill_pounds() {
        // 22.046 lb ≈ 10 kg; 2 mg/kg → 20 mg; 10 mg tablets → 2
        let med = pill("2", MassUnit::Milligram, "10");
        let result = calculate_dosage(&med, &pet("22.0462", WeightUnit::Pound));
        assert!((result.result - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_tablet_size_shares_dosage_unit() {
        // 0.01 g/kg × 20 kg = 200 mg; tablet "0.1" g = 100 mg → 2
        let med = pill("0.01", MassUnit::Gram, "0.1");
        let result = calculate_dosage(&med, &pet("20", WeightUnit::Kilogram));
        assert_close(result.result, 2.0);
    }

    #[test]
    fn test_invalid_dosage_checked_first() {
        let med = pill("0", MassUnit::Milligram, "100");
        let result = calculate_dosage(&med, &pet("abc", WeightUnit::Kilogram));
        assert_eq!(result.error, Some(DosageError::InvalidDosage));
        assert_eq!(result.error_message(), "Dosage per kg is invalid.");
    }

    #[test]
    fn test_invalid_pet_weight() {
        let med = liquid("5", "5", MassUnit::Gram, VolumeUnit::Milliliter);
        let result = calculate_dosage(&med, &pet("abc", WeightUnit::Kilogram));

        assert_eq!(result.result, 0.0);
        assert_eq!(result.unit, DosageUnit::Milliliters);
        assert_eq!(result.error_message(), "Pet weight is invalid.");
    }

    #[test]
    fn test_negative_weight_is_invalid_not_zero() {
        let med = pill("10", MassUnit::Milligram, "100");
        let result = calculate_dosage(&med, &pet("-5", WeightUnit::Kilogram));
        assert_eq!(result.error, Some(DosageError::InvalidPetWeight));
        assert_eq!(result.unit, DosageUnit::Tablets);
    }

    #[test]
    fn test_unknown_weight_unit() {
        let med = pill("10", MassUnit::Milligram, "100");
        let mut pet = pet("20", WeightUnit::Kilogram);
        pet.weight_unit = "stone".into();

        let result = calculate_dosage(&med, &pet);
        assert_eq!(result.error_message(), "Pet weight conversion failed.");
    }

    #[test]
    fn test_zero_concentration_value() {
        let med = liquid("5", "0", MassUnit::Gram, VolumeUnit::Milliliter);
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));
        assert_eq!(result.error_message(), "Concentration mass value is invalid.");
    }

    #[test]
    fn test_unknown_concentration_mass_unit() {
        let mut med = liquid("5", "5", MassUnit::Gram, VolumeUnit::Milliliter);
        med.concentration_mass_unit = Some("oz".into());
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));
        assert_eq!(result.error, Some(DosageError::ZeroConcentrationMass));
    }

    #[test]
    fn test_invalid_tablet_size() {
        let med = pill("10", MassUnit::Milligram, "half");
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));
        assert_eq!(result.error_message(), "Tablet size value is invalid.");
    }

    #[test]
    fn test_unknown_dosage_unit_zeroes_tablet_size() {
        let mut med = pill("10", MassUnit::Milligram, "100");
        med.dosage_unit_per_kg = "grain".into();
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));
        assert_eq!(result.error, Some(DosageError::ZeroTabletSize));
    }

    #[test]
    fn test_unknown_dosage_unit_gives_zero_volume() {
        let mut med = liquid("5", "5", MassUnit::Gram, VolumeUnit::Milliliter);
        med.dosage_unit_per_kg = "grain".into();
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));
        assert_eq!(result.error, None);
        assert_eq!(result.result, 0.0);
    }

    #[test]
    fn test_unknown_volume_unit_gives_zero_volume() {
        let mut med = liquid("5", "5", MassUnit::Gram, VolumeUnit::Milliliter);
        med.concentration_volume_unit = Some("tsp".into());
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));
        assert!(result.is_ok());
        assert_eq!(result.result, 0.0);
        assert_eq!(result.warning(), None);
    }

    #[test]
    fn test_overflow_fails_calculation() {
        let med = pill("1e300", MassUnit::Kilogram, "1e-300");
        let result = calculate_dosage(&med, &pet("1e300", WeightUnit::Kilogram));
        assert_eq!(result.error, Some(DosageError::CalculationFailed));
        assert_eq!(result.result, 0.0);
    }

    #[test]
    fn test_missing_liquid_fields() {
        let mut med = liquid("5", "5", MassUnit::Gram, VolumeUnit::Milliliter);
        med.concentration_volume_unit = None;
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));
        assert_eq!(result.error_message(), "Missing required fields for calculation.");
        assert_eq!(result.unit, DosageUnit::Milliliters);
    }

    #[test]
    fn test_empty_tablet_size_is_missing() {
        let mut med = pill("10", MassUnit::Milligram, "100");
        med.tablet_size = Some(String::new());
        let result = calculate_dosage(&med, &pet("10", WeightUnit::Kilogram));
        assert_eq!(result.error, Some(DosageError::MissingFields));
        assert_eq!(result.unit, DosageUnit::Tablets);
    }

    #[test]
    fn test_pill_ignores_liquid_fields() {
        let mut med = pill("10", MassUnit::Milligram, "100");
        med.concentration_value = Some("garbage".into());
        let result = calculate_dosage(&med, &pet("20", WeightUnit::Kilogram));
        assert!(result.is_ok());
    }

    #[test]
    fn test_success_has_empty_message() {
        let med = pill("10", MassUnit::Milligram, "100");
        let result = calculate_dosage(&med, &pet("20", WeightUnit::Kilogram));
        assert_eq!(result.error_message(), "");
    }
}
