// Pet endpoints (`/v1/pets`).

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListQuery, Page, PetRequest, PetResponse, PhotoFile, PhotoResponse};

impl ApiClient {
    /// List pets, optionally filtered by name.
    pub async fn list_pets(&self, query: &ListQuery) -> Result<Page<PetResponse>, Error> {
        self.get_with_params("v1/pets", &query.params()).await
    }

    /// Fetch one pet including its tutors.
    pub async fn get_pet(&self, id: u64) -> Result<PetResponse, Error> {
        self.get(&format!("v1/pets/{id}")).await
    }

    pub async fn create_pet(&self, body: &PetRequest) -> Result<PetResponse, Error> {
        self.post("v1/pets", body).await
    }

    pub async fn update_pet(&self, id: u64, body: &PetRequest) -> Result<PetResponse, Error> {
        self.put(&format!("v1/pets/{id}"), body).await
    }

    pub async fn delete_pet(&self, id: u64) -> Result<(), Error> {
        self.delete(&format!("v1/pets/{id}")).await
    }

    /// Attach a photo to an existing pet.
    pub async fn upload_pet_photo(
        &self,
        id: u64,
        photo: &PhotoFile,
    ) -> Result<PhotoResponse, Error> {
        self.post_photo(&format!("v1/pets/{id}/fotos"), photo).await
    }
}
