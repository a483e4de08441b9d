//! The pet collection and the commands that mutate it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::medication::{AdministrationRecord, Medication, MedicationDetails};
use super::pet::{Pet, PetDetails};

/// Errors from collection commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Pet not found: {0}")]
    PetNotFound(String),

    #[error("Medication {medication_id} not found for pet {pet_id}")]
    MedicationNotFound {
        pet_id: String,
        medication_id: String,
    },
}

pub type CollectionResult<T> = Result<T, CollectionError>;

/// Every pet the user has registered, in insertion order.
///
/// This is the unit of persistence: it is loaded and saved whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PetCollection {
    pets: Vec<Pet>,
}

impl PetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    /// Look up a pet by ID.
    pub fn get(&self, pet_id: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == pet_id)
    }

    fn pet_mut(&mut self, pet_id: &str) -> CollectionResult<&mut Pet> {
        self.pets
            .iter_mut()
            .find(|p| p.id == pet_id)
            .ok_or_else(|| CollectionError::PetNotFound(pet_id.to_string()))
    }

    fn medication_mut(
        &mut self,
        pet_id: &str,
        medication_id: &str,
    ) -> CollectionResult<&mut Medication> {
        self.pet_mut(pet_id)?
            .medication_mut(medication_id)
            .ok_or_else(|| CollectionError::MedicationNotFound {
                pet_id: pet_id.to_string(),
                medication_id: medication_id.to_string(),
            })
    }

    // =========================================================================
    // Pet Commands
    // =========================================================================

    /// Register a new pet and return it.
    pub fn add_pet(&mut self, details: PetDetails) -> &Pet {
        self.pets.push(Pet::new(details));
        &self.pets[self.pets.len() - 1]
    }

    /// Replace a pet's editable fields.
    pub fn update_pet(&mut self, pet_id: &str, details: PetDetails) -> CollectionResult<&Pet> {
        let pet = self.pet_mut(pet_id)?;
        pet.apply(details);
        Ok(pet)
    }

    /// Remove a pet together with all of its medications.
    pub fn delete_pet(&mut self, pet_id: &str) -> CollectionResult<Pet> {
        let index = self
            .pets
            .iter()
            .position(|p| p.id == pet_id)
            .ok_or_else(|| CollectionError::PetNotFound(pet_id.to_string()))?;
        Ok(self.pets.remove(index))
    }

    // =========================================================================
    // Medication Commands
    // =========================================================================

    /// Attach a new medication to a pet and return it.
    pub fn add_medication(
        &mut self,
        pet_id: &str,
        details: MedicationDetails,
    ) -> CollectionResult<&Medication> {
        let pet = self.pet_mut(pet_id)?;
        pet.medications.push(Medication::new(details));
        let index = pet.medications.len() - 1;
        Ok(&pet.medications[index])
    }

    /// Replace a medication's editable fields; history is untouched.
    pub fn update_medication(
        &mut self,
        pet_id: &str,
        medication_id: &str,
        details: MedicationDetails,
    ) -> CollectionResult<&Medication> {
        let medication = self.medication_mut(pet_id, medication_id)?;
        medication.apply(details);
        Ok(medication)
    }

    /// Remove a medication from a pet.
    pub fn delete_medication(
        &mut self,
        pet_id: &str,
        medication_id: &str,
    ) -> CollectionResult<Medication> {
        let pet = self.pet_mut(pet_id)?;
        let index = pet
            .medications
            .iter()
            .position(|m| m.id == medication_id)
            .ok_or_else(|| CollectionError::MedicationNotFound {
                pet_id: pet_id.to_string(),
                medication_id: medication_id.to_string(),
            })?;
        Ok(pet.medications.remove(index))
    }

    /// Append an administration record stamped now.
    pub fn record_administration(
        &mut self,
        pet_id: &str,
        medication_id: &str,
    ) -> CollectionResult<AdministrationRecord> {
        Ok(self
            .medication_mut(pet_id, medication_id)?
            .record_administration())
    }

    /// Empty a medication's administration history.
    pub fn clear_administration_history(
        &mut self,
        pet_id: &str,
        medication_id: &str,
    ) -> CollectionResult<usize> {
        Ok(self
            .medication_mut(pet_id, medication_id)?
            .clear_administration_history())
    }
}

impl From<Vec<Pet>> for PetCollection {
    fn from(pets: Vec<Pet>) -> Self {
        Self { pets }
    }
}
