// ── Domain model ──
//
// Canonical types shared by facades, stores, and UI consumers. Wire
// shapes live in `petadmin_api::types`; `crate::convert` bridges them.

mod photo;
mod pet;
mod tutor;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

pub use photo::{Photo, PhotoUpload};
pub use pet::{Pet, PetDetail, PetInput};
pub use tutor::{Tutor, TutorDetail, TutorInput};

/// Backend-assigned record identifier.
pub type EntityId = u64;

/// The entity kinds managed by the registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Pet,
    Tutor,
}

impl EntityKind {
    /// Plural noun used in messages ("pets", "tutors").
    pub fn plural(self) -> &'static str {
        match self {
            Self::Pet => "pets",
            Self::Tutor => "tutors",
        }
    }
}

/// Anything with a backend identifier.
pub trait Entity {
    fn id(&self) -> EntityId;
}

/// A detail record that embeds summaries of related entities
/// (a pet's tutors, a tutor's pets).
pub trait Related: Entity {
    /// Identifiers of the embedded related entities, in server order.
    fn related_ids(&self) -> Vec<EntityId>;

    /// Drop one embedded related entity. Returns `true` if it was present.
    fn remove_related(&mut self, id: EntityId) -> bool;
}
