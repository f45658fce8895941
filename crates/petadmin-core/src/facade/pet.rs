use std::sync::Arc;

use petadmin_api::ApiClient;
use petadmin_api::types::{ListQuery, PetRequest, PhotoFile};
use tracing::{debug, warn};

use super::{EntityFacade, PageResult, RelationFacade, lift, name_filter, to_page};
use crate::error::CoreError;
use crate::model::{EntityId, EntityKind, Pet, PetDetail, PetInput};
use crate::validate::validate_pet;

/// Pet operations over the shared API client.
#[derive(Clone)]
pub struct PetFacade {
    client: Arc<ApiClient>,
}

impl PetFacade {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Upload the attached photo, if any, onto a freshly written pet.
    async fn attach_photo(&self, mut pet: Pet, input: &PetInput) -> Result<Pet, CoreError> {
        let Some(ref photo) = input.photo else {
            return Ok(pet);
        };
        debug!(id = pet.id, file = %photo.file_name, "uploading pet photo");
        let stored = self
            .client
            .upload_pet_photo(pet.id, &PhotoFile::from(photo))
            .await
            .inspect_err(|e| warn!(id = pet.id, error = %e, "pet saved but photo upload failed"))?;
        pet.photo = Some(stored.into());
        Ok(pet)
    }
}

impl EntityFacade for PetFacade {
    type Summary = Pet;
    type Detail = PetDetail;
    type CreateInput = PetInput;
    type UpdateInput = PetInput;

    const KIND: EntityKind = EntityKind::Pet;

    async fn list(
        &self,
        page: u32,
        size: u32,
        term: Option<&str>,
    ) -> Result<PageResult<Pet>, CoreError> {
        let query = ListQuery {
            page,
            size,
            name: name_filter(term),
        };
        let page = self.client.list_pets(&query).await?;
        Ok(to_page(page))
    }

    async fn get_detail(&self, id: EntityId) -> Result<PetDetail, CoreError> {
        self.client
            .get_pet(id)
            .await
            .map(PetDetail::from)
            .map_err(|e| lift(e, Self::KIND, id))
    }

    async fn create(&self, input: PetInput) -> Result<Pet, CoreError> {
        validate_pet(&input)?;
        let created = self.client.create_pet(&PetRequest::from(&input)).await?;
        self.attach_photo(created.into(), &input).await
    }

    async fn update(&self, id: EntityId, input: PetInput) -> Result<Pet, CoreError> {
        validate_pet(&input)?;
        let updated = self
            .client
            .update_pet(id, &PetRequest::from(&input))
            .await
            .map_err(|e| lift(e, Self::KIND, id))?;
        self.attach_photo(updated.into(), &input).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
        self.client
            .delete_pet(id)
            .await
            .map_err(|e| lift(e, Self::KIND, id))
    }
}

/// Pets link to tutors through the tutor-side endpoint.
impl RelationFacade for PetFacade {
    async fn link(&self, pet: EntityId, tutor: EntityId) -> Result<(), CoreError> {
        Ok(self.client.link_pet(tutor, pet).await?)
    }

    async fn unlink(&self, pet: EntityId, tutor: EntityId) -> Result<(), CoreError> {
        Ok(self.client.unlink_pet(tutor, pet).await?)
    }
}
