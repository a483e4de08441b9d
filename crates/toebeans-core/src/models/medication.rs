//! Medication and administration history models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::units::{MassUnit, VolumeUnit};

/// How a medication is administered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum DoseForm {
    /// Suspension or drops, dosed by volume
    Liquid,
    /// Tablet or capsule, dosed by count
    Pill,
}

/// Administration frequencies offered by the prescription form.
///
/// Stored medications keep the label as free text, so records written with
/// other labels still load. This type is the typed view of the known ones.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Frequency {
    #[default]
    #[serde(rename = "Once daily")]
    OnceDaily,
    #[serde(rename = "2x daily")]
    TwiceDaily,
    #[serde(rename = "3x daily")]
    ThriceDaily,
    #[serde(rename = "Every 8 hours")]
    Every8Hours,
    #[serde(rename = "Every 12 hours")]
    Every12Hours,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::OnceDaily,
        Frequency::TwiceDaily,
        Frequency::ThriceDaily,
        Frequency::Every8Hours,
        Frequency::Every12Hours,
    ];

    /// Display label, identical to the persisted form.
    pub fn label(self) -> &'static str {
        match self {
            Frequency::OnceDaily => "Once daily",
            Frequency::TwiceDaily => "2x daily",
            Frequency::ThriceDaily => "3x daily",
            Frequency::Every8Hours => "Every 8 hours",
            Frequency::Every12Hours => "Every 12 hours",
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|f| f.label() == s)
            .ok_or_else(|| format!("Unknown frequency: {s}"))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_frequency() -> String {
    Frequency::default().label().to_string()
}

/// A single recorded administration. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdministrationRecord {
    /// When the dose was given
    pub timestamp: DateTime<Utc>,
}

/// A medication prescribed to a pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Opaque ID, unique within the owning pet
    pub id: String,
    /// Medication name
    pub name: String,
    /// Liquid or pill
    pub dose_form: DoseForm,
    /// Required dose per kg of body weight, as entered
    pub dosage_per_kg_value: String,
    /// Mass unit of the per-kg dose; pills also state their tablet size in it
    pub dosage_unit_per_kg: String,
    /// Administration frequency label (see [`Frequency`] for the known ones)
    #[serde(default = "default_frequency")]
    pub frequency: String,
    /// Liquid: mass part of the label concentration (e.g. the "5" in 5 g / ml)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_value: Option<String>,
    /// Liquid: mass unit of the concentration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_mass_unit: Option<String>,
    /// Liquid: volume unit of the concentration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_volume_unit: Option<String>,
    /// Pill: active drug per tablet, in `dosage_unit_per_kg`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet_size: Option<String>,
    /// Append-only administration log
    #[serde(default)]
    pub administration_history: Vec<AdministrationRecord>,
}

/// The user-editable fields of a medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDetails {
    pub name: String,
    pub dose_form: DoseForm,
    pub dosage_per_kg_value: String,
    pub dosage_unit_per_kg: String,
    pub frequency: String,
    pub concentration_value: Option<String>,
    pub concentration_mass_unit: Option<String>,
    pub concentration_volume_unit: Option<String>,
    pub tablet_size: Option<String>,
}

impl MedicationDetails {
    /// Details for a liquid medication with a label concentration of
    /// `concentration_value concentration_mass_unit / concentration_volume_unit`.
    pub fn liquid(
        name: impl Into<String>,
        dosage_per_kg_value: impl Into<String>,
        dosage_unit_per_kg: MassUnit,
        frequency: Frequency,
        concentration_value: impl Into<String>,
        concentration_mass_unit: MassUnit,
        concentration_volume_unit: VolumeUnit,
    ) -> Self {
        Self {
            name: name.into(),
            dose_form: DoseForm::Liquid,
            dosage_per_kg_value: dosage_per_kg_value.into(),
            dosage_unit_per_kg: dosage_unit_per_kg.symbol().to_string(),
            frequency: frequency.label().to_string(),
            concentration_value: Some(concentration_value.into()),
            concentration_mass_unit: Some(concentration_mass_unit.symbol().to_string()),
            concentration_volume_unit: Some(concentration_volume_unit.symbol().to_string()),
            tablet_size: None,
        }
    }

    /// Details for a pill; `tablet_size` is read in `dosage_unit_per_kg`.
    pub fn pill(
        name: impl Into<String>,
        dosage_per_kg_value: impl Into<String>,
        dosage_unit_per_kg: MassUnit,
        frequency: Frequency,
        tablet_size: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dose_form: DoseForm::Pill,
            dosage_per_kg_value: dosage_per_kg_value.into(),
            dosage_unit_per_kg: dosage_unit_per_kg.symbol().to_string(),
            frequency: frequency.label().to_string(),
            concentration_value: None,
            concentration_mass_unit: None,
            concentration_volume_unit: None,
            tablet_size: Some(tablet_size.into()),
        }
    }
}

impl Medication {
    /// Create a new medication with a fresh ID and empty history.
    pub fn new(details: MedicationDetails) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: details.name,
            dose_form: details.dose_form,
            dosage_per_kg_value: details.dosage_per_kg_value,
            dosage_unit_per_kg: details.dosage_unit_per_kg,
            frequency: details.frequency,
            concentration_value: details.concentration_value,
            concentration_mass_unit: details.concentration_mass_unit,
            concentration_volume_unit: details.concentration_volume_unit,
            tablet_size: details.tablet_size,
            administration_history: Vec::new(),
        }
    }

    /// Overwrite the editable fields, keeping the ID and history.
    pub fn apply(&mut self, details: MedicationDetails) {
        self.name = details.name;
        self.dose_form = details.dose_form;
        self.dosage_per_kg_value = details.dosage_per_kg_value;
        self.dosage_unit_per_kg = details.dosage_unit_per_kg;
        self.frequency = details.frequency;
        self.concentration_value = details.concentration_value;
        self.concentration_mass_unit = details.concentration_mass_unit;
        self.concentration_volume_unit = details.concentration_volume_unit;
        self.tablet_size = details.tablet_size;
    }

    /// Current editable fields.
    pub fn details(&self) -> MedicationDetails {
        MedicationDetails {
            name: self.name.clone(),
            dose_form: self.dose_form,
            dosage_per_kg_value: self.dosage_per_kg_value.clone(),
            dosage_unit_per_kg: self.dosage_unit_per_kg.clone(),
            frequency: self.frequency.clone(),
            concentration_value: self.concentration_value.clone(),
            concentration_mass_unit: self.concentration_mass_unit.clone(),
            concentration_volume_unit: self.concentration_volume_unit.clone(),
            tablet_size: self.tablet_size.clone(),
        }
    }

    /// Append a record stamped with the current instant.
    ///
    /// The stamp never precedes the previous record, so the history stays
    /// ordered even if the wall clock steps backwards.
    pub fn record_administration(&mut self) -> AdministrationRecord {
        let mut timestamp = Utc::now();
        if let Some(last) = self.last_administered() {
            timestamp = timestamp.max(last);
        }
        let record = AdministrationRecord { timestamp };
        self.administration_history.push(record.clone());
        record
    }

    /// Drop the whole administration history. Returns how many records went.
    pub fn clear_administration_history(&mut self) -> usize {
        let cleared = self.administration_history.len();
        self.administration_history = Vec::new();
        cleared
    }

    /// The frequency as a known option, if it is one.
    pub fn frequency_kind(&self) -> Option<Frequency> {
        self.frequency.parse().ok()
    }

    /// Timestamp of the most recent administration.
    pub fn last_administered(&self) -> Option<DateTime<Utc>> {
        self.administration_history.last().map(|r| r.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liquid() -> Medication {
        Medication::new(MedicationDetails::liquid(
            "Amoxicillin",
            "5",
            MassUnit::Milligram,
            Frequency::TwiceDaily,
            "5",
            MassUnit::Gram,
            VolumeUnit::Milliliter,
        ))
    }

    #[test]
    fn test_liquid_details() {
        let med = liquid();
        assert_eq!(med.dose_form, DoseForm::Liquid);
        assert_eq!(med.dosage_unit_per_kg, "mg");
        assert_eq!(med.concentration_mass_unit.as_deref(), Some("g"));
        assert_eq!(med.concentration_volume_unit.as_deref(), Some("ml"));
        assert_eq!(med.tablet_size, None);
        assert!(med.administration_history.is_empty());
    }

    #[test]
    fn test_record_administration_appends() {
        let mut med = liquid();
        let before = med.details();

        let first = med.record_administration();
        let second = med.record_administration();

        assert_eq!(med.administration_history.len(), 2);
        assert!(second.timestamp >= first.timestamp);
        assert_eq!(med.last_administered(), Some(second.timestamp));
        assert_eq!(med.details(), before);
    }

    #[test]
    fn test_record_never_precedes_last() {
        let mut med = liquid();
        let future = Utc::now() + chrono::Duration::hours(1);
        med.administration_history.push(AdministrationRecord { timestamp: future });

        let record = med.record_administration();
        assert_eq!(record.timestamp, future);
    }

    #[test]
    fn test_clear_history() {
        let mut med = liquid();
        med.record_administration();
        med.record_administration();
        let before = med.details();

        assert_eq!(med.clear_administration_history(), 2);
        assert!(med.administration_history.is_empty());
        assert_eq!(med.details(), before);
        assert_eq!(med.clear_administration_history(), 0);
    }

    #[test]
    fn test_persisted_shape() {
        let med = Medication::new(MedicationDetails::pill(
            "Carprofen",
            "4.4",
            MassUnit::Milligram,
            Frequency::Every12Hours,
            "25",
        ));
        let value = serde_json::to_value(&med).unwrap();

        assert_eq!(value["doseForm"], "Pill");
        assert_eq!(value["dosagePerKgValue"], "4.4");
        assert_eq!(value["dosageUnitPerKg"], "mg");
        assert_eq!(value["frequency"], "Every 12 hours");
        assert_eq!(value["tabletSize"], "25");
        assert!(value.get("concentrationValue").is_none());
        assert_eq!(value["administrationHistory"], serde_json::json!([]));
    }

    #[test]
    fn test_deserialize_browser_timestamps() {
        let json = r#"{
            "id": "id-k2j3h4g",
            "name": "Gabapentin",
            "doseForm": "Liquid",
            "dosagePerKgValue": "10",
            "dosageUnitPerKg": "mg",
            "frequency": "3x daily",
            "concentrationValue": "50",
            "concentrationMassUnit": "mg",
            "concentrationVolumeUnit": "ml",
            "tabletSize": "",
            "administrationHistory": [{"timestamp": "2024-03-01T08:30:00.000Z"}]
        }"#;
        let med: Medication = serde_json::from_str(json).unwrap();

        assert_eq!(med.frequency_kind(), Some(Frequency::ThriceDaily));
        assert_eq!(med.tablet_size.as_deref(), Some(""));
        assert_eq!(med.administration_history.len(), 1);
    }

    #[test]
    fn test_frequency_labels_match_serde() {
        for frequency in Frequency::ALL {
            let json = serde_json::to_string(&frequency).unwrap();
            assert_eq!(json, format!("\"{}\"", frequency.label()));
            assert_eq!(frequency.label().parse::<Frequency>(), Ok(frequency));
        }
    }

    #[test]
    fn test_unlisted_frequency_is_kept() {
        let json = r#"{
            "id": "id-q8w7e6r",
            "name": "Prednisolone",
            "doseForm": "Pill",
            "dosagePerKgValue": "0.5",
            "dosageUnitPerKg": "mg",
            "frequency": "Every other day",
            "tabletSize": "5"
        }"#;
        let med: Medication = serde_json::from_str(json).unwrap();

        assert_eq!(med.frequency, "Every other day");
        assert_eq!(med.frequency_kind(), None);
        assert_eq!(serde_json::to_value(&med).unwrap()["frequency"], "Every other day");
    }

    #[test]
    fn test_missing_frequency_defaults() {
        let json = r#"{"id":"m1","name":"X","doseForm":"Pill","dosagePerKgValue":"1","dosageUnitPerKg":"mg"}"#;
        let med: Medication = serde_json::from_str(json).unwrap();
        assert_eq!(med.frequency_kind(), Some(Frequency::OnceDaily));
    }
}
