//! Pet collection persistence.

use super::{Database, DbResult};
use crate::models::PetCollection;

/// Storage key the pet collection lives under.
pub const PETS_NAMESPACE: &str = "toebeans_pets";

impl Database {
    /// Load the pet collection. An empty store yields an empty collection.
    pub fn load_pets(&self) -> DbResult<PetCollection> {
        let pets = match self.get_value(PETS_NAMESPACE)? {
            Some(json) => serde_json::from_str::<PetCollection>(&json)?,
            None => PetCollection::new(),
        };
        tracing::debug!(pets = pets.len(), "loaded pet collection");
        Ok(pets)
    }

    /// Persist the whole pet collection, replacing what was stored.
    pub fn save_pets(&self, pets: &PetCollection) -> DbResult<()> {
        let json = serde_json::to_string(pets)?;
        self.put_value(PETS_NAMESPACE, &json)?;
        tracing::debug!(pets = pets.len(), bytes = json.len(), "saved pet collection");
        Ok(())
    }
}
