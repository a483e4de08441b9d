//! Pet models.

use serde::{Deserialize, Serialize};

use super::medication::Medication;
use crate::units::WeightUnit;

/// A pet record, the root of the persisted data model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Opaque unique ID, generated on creation
    pub id: String,
    /// Pet name
    pub name: String,
    /// Species (free text, e.g. "Dog", "Cat")
    pub species: String,
    /// Body weight as entered; parsed when a dose is calculated
    pub weight: String,
    /// Weight unit symbol ("kg" or "lb")
    pub weight_unit: String,
    /// Prescribed medications, in insertion order
    #[serde(default)]
    pub medications: Vec<Medication>,
}

/// The user-editable fields of a pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PetDetails {
    pub name: String,
    pub species: String,
    pub weight: String,
    pub weight_unit: String,
}

impl PetDetails {
    /// Create pet details with a typed weight unit.
    pub fn new(
        name: impl Into<String>,
        species: impl Into<String>,
        weight: impl Into<String>,
        weight_unit: WeightUnit,
    ) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            weight: weight.into(),
            weight_unit: weight_unit.symbol().to_string(),
        }
    }
}

impl Pet {
    /// Create a new pet with a fresh ID and no medications.
    pub fn new(details: PetDetails) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: details.name,
            species: details.species,
            weight: details.weight,
            weight_unit: details.weight_unit,
            medications: Vec::new(),
        }
    }

    /// Overwrite the editable fields, keeping the ID and medications.
    pub fn apply(&mut self, details: PetDetails) {
        self.name = details.name;
        self.species = details.species;
        self.weight = details.weight;
        self.weight_unit = details.weight_unit;
    }

    /// Current editable fields.
    pub fn details(&self) -> PetDetails {
        PetDetails {
            name: self.name.clone(),
            species: self.species.clone(),
            weight: self.weight.clone(),
            weight_unit: self.weight_unit.clone(),
        }
    }

    /// Look up a medication by ID.
    pub fn medication(&self, medication_id: &str) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id == medication_id)
    }

    /// Look up a medication by ID for mutation.
    pub fn medication_mut(&mut self, medication_id: &str) -> Option<&mut Medication> {
        self.medications.iter_mut().find(|m| m.id == medication_id)
    }
}
