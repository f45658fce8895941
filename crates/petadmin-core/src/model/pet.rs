// ── Pet domain types ──

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, Photo, PhotoUpload, Related, Tutor};

/// List-row representation of a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: EntityId,
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub photo: Option<Photo>,
}

/// A pet together with its tutors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetDetail {
    #[serde(flatten)]
    pub pet: Pet,
    pub tutors: Vec<Tutor>,
}

/// Form data for creating or updating a pet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetInput {
    pub name: String,
    pub breed: String,
    pub age: u32,
    /// Uploaded after the record write succeeds.
    pub photo: Option<PhotoUpload>,
}

impl Entity for Pet {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Entity for PetDetail {
    fn id(&self) -> EntityId {
        self.pet.id
    }
}

impl Related for PetDetail {
    fn related_ids(&self) -> Vec<EntityId> {
        self.tutors.iter().map(|t| t.id).collect()
    }

    fn remove_related(&mut self, id: EntityId) -> bool {
        let before = self.tutors.len();
        self.tutors.retain(|t| t.id != id);
        self.tutors.len() != before
    }
}
