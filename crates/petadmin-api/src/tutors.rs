// Tutor endpoints (`/v1/tutores`), including the tutor↔pet link routes.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListQuery, Page, PhotoFile, PhotoResponse, TutorRequest, TutorResponse};

impl ApiClient {
    /// List tutors, optionally filtered by name.
    pub async fn list_tutors(&self, query: &ListQuery) -> Result<Page<TutorResponse>, Error> {
        self.get_with_params("v1/tutores", &query.params()).await
    }

    /// Fetch one tutor including the pets they are responsible for.
    pub async fn get_tutor(&self, id: u64) -> Result<TutorResponse, Error> {
        self.get(&format!("v1/tutores/{id}")).await
    }

    pub async fn create_tutor(&self, body: &TutorRequest) -> Result<TutorResponse, Error> {
        self.post("v1/tutores", body).await
    }

    pub async fn update_tutor(
        &self,
        id: u64,
        body: &TutorRequest,
    ) -> Result<TutorResponse, Error> {
        self.put(&format!("v1/tutores/{id}"), body).await
    }

    pub async fn delete_tutor(&self, id: u64) -> Result<(), Error> {
        self.delete(&format!("v1/tutores/{id}")).await
    }

    /// Attach a photo to an existing tutor.
    pub async fn upload_tutor_photo(
        &self,
        id: u64,
        photo: &PhotoFile,
    ) -> Result<PhotoResponse, Error> {
        self.post_photo(&format!("v1/tutores/{id}/fotos"), photo)
            .await
    }

    /// Make `tutor_id` responsible for `pet_id`.
    pub async fn link_pet(&self, tutor_id: u64, pet_id: u64) -> Result<(), Error> {
        self.post_empty(&format!("v1/tutores/{tutor_id}/pets/{pet_id}"))
            .await
    }

    /// Remove the responsibility link between `tutor_id` and `pet_id`.
    pub async fn unlink_pet(&self, tutor_id: u64, pet_id: u64) -> Result<(), Error> {
        self.delete(&format!("v1/tutores/{tutor_id}/pets/{pet_id}"))
            .await
    }
}
