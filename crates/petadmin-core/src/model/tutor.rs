// ── Tutor domain types ──

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, Pet, Photo, PhotoUpload, Related};

/// List-row representation of a tutor (a pet's responsible caretaker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutor {
    pub id: EntityId,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub cpf: Option<String>,
    pub photo: Option<Photo>,
}

/// A tutor together with the pets they are responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorDetail {
    #[serde(flatten)]
    pub tutor: Tutor,
    pub pets: Vec<Pet>,
}

/// Form data for creating or updating a tutor.
///
/// Phone and CPF may carry punctuation; the facade strips it before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub cpf: Option<String>,
    pub photo: Option<PhotoUpload>,
}

impl Entity for Tutor {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Entity for TutorDetail {
    fn id(&self) -> EntityId {
        self.tutor.id
    }
}

impl Related for TutorDetail {
    fn related_ids(&self) -> Vec<EntityId> {
        self.pets.iter().map(|p| p.id).collect()
    }

    fn remove_related(&mut self, id: EntityId) -> bool {
        let before = self.pets.len();
        self.pets.retain(|p| p.id != id);
        self.pets.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(id: EntityId) -> Pet {
        Pet {
            id,
            name: format!("pet-{id}"),
            breed: "SRD".into(),
            age: 1,
            photo: None,
        }
    }

    #[test]
    fn remove_related_drops_only_matching_pet() {
        let mut detail = TutorDetail {
            tutor: Tutor {
                id: 5,
                name: "Ana".into(),
                email: None,
                phone: "65999990000".into(),
                address: None,
                cpf: None,
                photo: None,
            },
            pets: vec![pet(1), pet(2)],
        };

        assert!(detail.remove_related(2));
        assert_eq!(detail.related_ids(), vec![1]);
        assert!(!detail.remove_related(9));
        assert_eq!(detail.id(), 5);
    }
}
