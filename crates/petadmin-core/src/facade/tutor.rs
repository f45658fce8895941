use std::sync::Arc;

use petadmin_api::ApiClient;
use petadmin_api::types::{ListQuery, PhotoFile, TutorRequest};
use tracing::{debug, warn};

use super::{EntityFacade, PageResult, RelationFacade, lift, name_filter, to_page};
use crate::error::CoreError;
use crate::model::{EntityId, EntityKind, Tutor, TutorDetail, TutorInput};
use crate::validate::validate_tutor;

/// Tutor operations over the shared API client.
#[derive(Clone)]
pub struct TutorFacade {
    client: Arc<ApiClient>,
}

impl TutorFacade {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn attach_photo(&self, mut tutor: Tutor, input: &TutorInput) -> Result<Tutor, CoreError> {
        let Some(ref photo) = input.photo else {
            return Ok(tutor);
        };
        debug!(id = tutor.id, file = %photo.file_name, "uploading tutor photo");
        let stored = self
            .client
            .upload_tutor_photo(tutor.id, &PhotoFile::from(photo))
            .await
            .inspect_err(|e| warn!(id = tutor.id, error = %e, "tutor saved but photo upload failed"))?;
        tutor.photo = Some(stored.into());
        Ok(tutor)
    }
}

impl EntityFacade for TutorFacade {
    type Summary = Tutor;
    type Detail = TutorDetail;
    type CreateInput = TutorInput;
    type UpdateInput = TutorInput;

    const KIND: EntityKind = EntityKind::Tutor;

    async fn list(
        &self,
        page: u32,
        size: u32,
        term: Option<&str>,
    ) -> Result<PageResult<Tutor>, CoreError> {
        let query = ListQuery {
            page,
            size,
            name: name_filter(term),
        };
        let page = self.client.list_tutors(&query).await?;
        Ok(to_page(page))
    }

    async fn get_detail(&self, id: EntityId) -> Result<TutorDetail, CoreError> {
        self.client
            .get_tutor(id)
            .await
            .map(TutorDetail::from)
            .map_err(|e| lift(e, Self::KIND, id))
    }

    async fn create(&self, input: TutorInput) -> Result<Tutor, CoreError> {
        validate_tutor(&input)?;
        let created = self.client.create_tutor(&TutorRequest::from(&input)).await?;
        self.attach_photo(created.into(), &input).await
    }

    async fn update(&self, id: EntityId, input: TutorInput) -> Result<Tutor, CoreError> {
        validate_tutor(&input)?;
        let updated = self
            .client
            .update_tutor(id, &TutorRequest::from(&input))
            .await
            .map_err(|e| lift(e, Self::KIND, id))?;
        self.attach_photo(updated.into(), &input).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
        self.client
            .delete_tutor(id)
            .await
            .map_err(|e| lift(e, Self::KIND, id))
    }
}

impl RelationFacade for TutorFacade {
    async fn link(&self, tutor: EntityId, pet: EntityId) -> Result<(), CoreError> {
        Ok(self.client.link_pet(tutor, pet).await?)
    }

    async fn unlink(&self, tutor: EntityId, pet: EntityId) -> Result<(), CoreError> {
        Ok(self.client.unlink_pet(tutor, pet).await?)
    }
}
