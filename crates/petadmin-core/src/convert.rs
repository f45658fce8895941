// ── Wire → domain conversions ──
//
// `From` impls translating `petadmin_api::types` DTOs into the canonical
// domain model, plus the reverse direction for form input.

use petadmin_api::types::{
    PetRequest, PetResponse, PhotoFile, PhotoResponse, TutorRequest, TutorResponse,
};

use crate::model::{Pet, PetDetail, PetInput, Photo, PhotoUpload, Tutor, TutorDetail, TutorInput};
use crate::validate::{digits_only, non_blank};

// ── Photos ───────────────────────────────────────────────────────────

impl From<PhotoResponse> for Photo {
    fn from(p: PhotoResponse) -> Self {
        Self {
            id: p.id,
            file_name: p.name,
            content_type: p.content_type,
            url: p.url,
        }
    }
}

impl From<&PhotoUpload> for PhotoFile {
    fn from(p: &PhotoUpload) -> Self {
        Self {
            file_name: p.file_name.clone(),
            content_type: p.content_type.clone(),
            bytes: p.bytes.clone(),
        }
    }
}

// ── Pets ─────────────────────────────────────────────────────────────

impl From<PetResponse> for Pet {
    fn from(p: PetResponse) -> Self {
        Self {
            id: p.id,
            name: p.name,
            breed: p.breed.unwrap_or_default(),
            age: p.age.unwrap_or_default(),
            photo: p.photo.map(Photo::from),
        }
    }
}

impl From<PetResponse> for PetDetail {
    fn from(mut p: PetResponse) -> Self {
        let tutors = std::mem::take(&mut p.tutors)
            .into_iter()
            .map(Tutor::from)
            .collect();
        Self {
            pet: Pet::from(p),
            tutors,
        }
    }
}

impl From<&PetInput> for PetRequest {
    fn from(input: &PetInput) -> Self {
        Self {
            name: input.name.trim().to_owned(),
            breed: input.breed.trim().to_owned(),
            age: input.age,
        }
    }
}

// ── Tutors ───────────────────────────────────────────────────────────

impl From<TutorResponse> for Tutor {
    fn from(t: TutorResponse) -> Self {
        Self {
            id: t.id,
            name: t.name,
            email: t.email,
            phone: t.phone.unwrap_or_default(),
            address: t.address,
            cpf: t.cpf,
            photo: t.photo.map(Photo::from),
        }
    }
}

impl From<TutorResponse> for TutorDetail {
    fn from(mut t: TutorResponse) -> Self {
        let pets = std::mem::take(&mut t.pets)
            .into_iter()
            .map(Pet::from)
            .collect();
        Self {
            tutor: Tutor::from(t),
            pets,
        }
    }
}

impl From<&TutorInput> for TutorRequest {
    fn from(input: &TutorInput) -> Self {
        Self {
            name: input.name.trim().to_owned(),
            email: non_blank(input.email.as_deref()).map(str::to_owned),
            phone: digits_only(&input.phone),
            address: non_blank(input.address.as_deref()).map(str::to_owned),
            cpf: non_blank(input.cpf.as_deref()).map(digits_only),
        }
    }
}
