//! Toebeans Core Library
//!
//! Local-first pet medication tracker with weight-based dose calculation.
//!
//! # Architecture
//!
//! ```text
//!   Presentation layer (forms, lists, cards)
//!          │ commands                      ▲ display values
//!          ▼                               │
//!   ┌──────────────────┐          ┌────────┴─────────┐
//!   │  PetCollection   │─────────▶│ Dosage Calculator │
//!   │ pets → meds →    │  (pure,  │ units → mg → ml / │
//!   │ admin history    │  re-run) │ tablet count      │
//!   └────────┬─────────┘          └──────────────────┘
//!            │ load / save (whole collection, JSON)
//!            ▼
//!   SQLite kv_store["toebeans_pets"]
//! ```
//!
//! Calculation results are never persisted.
//!
//! # Modules
//!
//! - [`units`]: Unit conversion table (mass → mg, volume → ml, pet weight → kg)
//! - [`dosage`]: Dosage calculator and display/warning policy
//! - [`models`]: Domain types (Pet, Medication, AdministrationRecord, PetCollection)
//! - [`db`]: SQLite key-value persistence of the pet collection

pub mod db;
pub mod dosage;
pub mod models;
pub mod units;

// Re-export commonly used types
pub use db::{Database, PETS_NAMESPACE};
pub use dosage::{calculate_dosage, DosageError, DosageResult, DosageUnit, DosageWarning};
pub use models::{
    AdministrationRecord, CollectionError, DoseForm, Frequency, Medication, MedicationDetails,
    Pet, PetCollection, PetDetails,
};
pub use units::{MassUnit, QuantityKind, VolumeUnit, WeightUnit};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ToebeansError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for ToebeansError {
    fn from(e: db::DbError) -> Self {
        ToebeansError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for ToebeansError {
    fn from(e: serde_json::Error) -> Self {
        ToebeansError::SerializationError(e.to_string())
    }
}

impl From<CollectionError> for ToebeansError {
    fn from(e: CollectionError) -> Self {
        ToebeansError::NotFound(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ToebeansError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ToebeansError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ToebeansCore>, ToebeansError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(ToebeansCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<ToebeansCore>, ToebeansError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ToebeansCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Stateless Functions (exported to FFI)
// =========================================================================

/// Convert a value to the base unit of its kind; `0.0` if impossible.
#[uniffi::export]
pub fn convert_to_base_unit(value: f64, unit: String, kind: QuantityKind) -> f64 {
    units::convert_to_base_unit(value, &unit, kind)
}

/// Calculate a dose from unsaved form input, without touching storage.
#[uniffi::export]
pub fn preview_dosage(medication: FfiMedicationInput, pet: FfiPetInput) -> FfiDosageResult {
    let medication = Medication::new(medication.into());
    let pet = Pet::new(pet.into());
    calculate_dosage(&medication, &pet).into()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
///
/// Every command holds the lock for its whole load → mutate → save cycle,
/// so concurrent commands cannot interleave.
#[derive(uniffi::Object)]
pub struct ToebeansCore {
    db: Arc<Mutex<Database>>,
}

impl ToebeansCore {
    /// Apply `command` to the stored collection and save it if it succeeds.
    fn mutate<T>(
        &self,
        command: impl FnOnce(&mut PetCollection) -> Result<T, CollectionError>,
    ) -> Result<T, ToebeansError> {
        let db = self.db.lock()?;
        let mut pets = db.load_pets()?;
        let output = command(&mut pets)?;
        db.save_pets(&pets)?;
        Ok(output)
    }

    fn read<T>(&self, query: impl FnOnce(&PetCollection) -> T) -> Result<T, ToebeansError> {
        let db = self.db.lock()?;
        let pets = db.load_pets()?;
        Ok(query(&pets))
    }
}

#[uniffi::export]
impl ToebeansCore {
    // =========================================================================
    // Pet Operations
    // =========================================================================

    /// List all pets in insertion order.
    pub fn list_pets(&self) -> Result<Vec<FfiPet>, ToebeansError> {
        self.read(|pets| pets.pets().iter().map(FfiPet::from).collect())
    }

    /// Get a pet by ID.
    pub fn get_pet(&self, pet_id: String) -> Result<Option<FfiPet>, ToebeansError> {
        self.read(|pets| pets.get(&pet_id).map(FfiPet::from))
    }

    /// Register a new pet.
    pub fn add_pet(&self, pet: FfiPetInput) -> Result<FfiPet, ToebeansError> {
        let added = self.mutate(|pets| Ok(FfiPet::from(pets.add_pet(pet.into()))))?;
        tracing::info!(pet_id = %added.id, "added pet");
        Ok(added)
    }

    /// Replace a pet's name, species and weight.
    pub fn update_pet(&self, pet_id: String, pet: FfiPetInput) -> Result<FfiPet, ToebeansError> {
        self.mutate(|pets| pets.update_pet(&pet_id, pet.into()).map(FfiPet::from))
    }

    /// Delete a pet and all of its medications.
    pub fn delete_pet(&self, pet_id: String) -> Result<(), ToebeansError> {
        let removed = self.mutate(|pets| pets.delete_pet(&pet_id))?;
        tracing::info!(
            pet_id = %pet_id,
            medications = removed.medications.len(),
            "deleted pet"
        );
        Ok(())
    }

    // =========================================================================
    // Medication Operations
    // =========================================================================

    /// Attach a new medication to a pet.
    pub fn add_medication(
        &self,
        pet_id: String,
        medication: FfiMedicationInput,
    ) -> Result<FfiMedication, ToebeansError> {
        self.mutate(|pets| {
            pets.add_medication(&pet_id, medication.into())
                .map(FfiMedication::from)
        })
    }

    /// Replace a medication's prescription fields; history is kept.
    pub fn update_medication(
        &self,
        pet_id: String,
        medication_id: String,
        medication: FfiMedicationInput,
    ) -> Result<FfiMedication, ToebeansError> {
        self.mutate(|pets| {
            pets.update_medication(&pet_id, &medication_id, medication.into())
                .map(FfiMedication::from)
        })
    }

    /// Remove a medication from a pet.
    pub fn delete_medication(
        &self,
        pet_id: String,
        medication_id: String,
    ) -> Result<(), ToebeansError> {
        self.mutate(|pets| pets.delete_medication(&pet_id, &medication_id))?;
        tracing::info!(pet_id = %pet_id, medication_id = %medication_id, "deleted medication");
        Ok(())
    }

    // =========================================================================
    // Administration History
    // =========================================================================

    /// Record that a dose was given now.
    pub fn record_administration(
        &self,
        pet_id: String,
        medication_id: String,
    ) -> Result<FfiAdministrationRecord, ToebeansError> {
        self.mutate(|pets| {
            pets.record_administration(&pet_id, &medication_id)
                .map(FfiAdministrationRecord::from)
        })
    }

    /// Clear a medication's administration history. Returns records removed.
    pub fn clear_administration_history(
        &self,
        pet_id: String,
        medication_id: String,
    ) -> Result<u32, ToebeansError> {
        let cleared =
            self.mutate(|pets| pets.clear_administration_history(&pet_id, &medication_id))?;
        tracing::info!(medication_id = %medication_id, cleared, "cleared administration history");
        Ok(u32::try_from(cleared).unwrap_or(u32::MAX))
    }

    // =========================================================================
    // Dosage
    // =========================================================================

    /// Calculate the dose of a stored medication for its pet.
    pub fn calculate_dosage(
        &self,
        pet_id: String,
        medication_id: String,
    ) -> Result<FfiDosageResult, ToebeansError> {
        let result = self.read(|pets| {
            let pet = pets
                .get(&pet_id)
                .ok_or_else(|| CollectionError::PetNotFound(pet_id.clone()))?;
            let medication = pet.medication(&medication_id).ok_or_else(|| {
                CollectionError::MedicationNotFound {
                    pet_id: pet_id.clone(),
                    medication_id: medication_id.clone(),
                }
            })?;
            Ok::<_, CollectionError>(calculate_dosage(medication, pet))
        })??;
        Ok(result.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe editable pet fields.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPetInput {
    pub name: String,
    pub species: String,
    pub weight: String,
    pub weight_unit: String,
}

impl From<FfiPetInput> for PetDetails {
    fn from(input: FfiPetInput) -> Self {
        PetDetails {
            name: input.name,
            species: input.species,
            weight: input.weight,
            weight_unit: input.weight_unit,
        }
    }
}

/// FFI-safe pet.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPet {
    pub id: String,
    pub name: String,
    pub species: String,
    pub weight: String,
    pub weight_unit: String,
    pub medications: Vec<FfiMedication>,
}

impl From<&Pet> for FfiPet {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id.clone(),
            name: pet.name.clone(),
            species: pet.species.clone(),
            weight: pet.weight.clone(),
            weight_unit: pet.weight_unit.clone(),
            medications: pet.medications.iter().map(FfiMedication::from).collect(),
        }
    }
}

/// FFI-safe editable medication fields.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationInput {
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

impl From<FfiMedicationInput> for MedicationDetails {
    fn from(input: FfiMedicationInput) -> Self {
        MedicationDetails {
            name: input.name,
            dose_form: input.dose_form,
            dosage_per_kg_value: input.dosage_per_kg_value,
            dosage_unit_per_kg: input.dosage_unit_per_kg,
            frequency: input.frequency,
            concentration_value: input.concentration_value,
            concentration_mass_unit: input.concentration_mass_unit,
            concentration_volume_unit: input.concentration_volume_unit,
            tablet_size: input.tablet_size,
        }
    }
}

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub name: String,
    pub dose_form: DoseForm,
    pub dosage_per_kg_value: String,
    pub dosage_unit_per_kg: String,
    pub frequency: String,
    pub concentration_value: Option<String>,
    pub concentration_mass_unit: Option<String>,
    pub concentration_volume_unit: Option<String>,
    pub tablet_size: Option<String>,
    pub administration_history: Vec<FfiAdministrationRecord>,
}

impl From<&Medication> for FfiMedication {
    fn from(med: &Medication) -> Self {
        Self {
            id: med.id.clone(),
            name: med.name.clone(),
            dose_form: med.dose_form,
            dosage_per_kg_value: med.dosage_per_kg_value.clone(),
            dosage_unit_per_kg: med.dosage_unit_per_kg.clone(),
            frequency: med.frequency.clone(),
            concentration_value: med.concentration_value.clone(),
            concentration_mass_unit: med.concentration_mass_unit.clone(),
            concentration_volume_unit: med.concentration_volume_unit.clone(),
            tablet_size: med.tablet_size.clone(),
            administration_history: med
                .administration_history
                .iter()
                .cloned()
                .map(FfiAdministrationRecord::from)
                .collect(),
        }
    }
}

/// FFI-safe administration record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAdministrationRecord {
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl From<AdministrationRecord> for FfiAdministrationRecord {
    fn from(record: AdministrationRecord) -> Self {
        Self {
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

/// FFI-safe dosage result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDosageResult {
    pub result: f64,
    /// "ml" or "tablets"
    pub unit: String,
    /// Empty on success
    pub error: String,
    /// `result` rounded for display
    pub display_value: String,
    pub warning: Option<String>,
}

impl From<DosageResult> for FfiDosageResult {
    fn from(result: DosageResult) -> Self {
        Self {
            result: result.result,
            unit: result.unit.label().to_string(),
            error: result.error_message(),
            display_value: result.display_value(),
            warning: result.warning().map(|w| w.message().to_string()),
        }
    }
}
