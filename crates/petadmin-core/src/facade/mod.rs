// ── CRUD facades ──
//
// The contract an `EntityStore` consumes: one facade per entity kind,
// translating domain input into backend calls. Facades are stateless
// apart from the shared API client.

mod pet;
mod tutor;

use std::fmt::Debug;
use std::future::Future;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{Entity, EntityId, EntityKind, Related};

pub use pet::PetFacade;
pub use tutor::TutorFacade;

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Total records matching the query, across all pages.
    pub total: u64,
    pub total_pages: u32,
}

/// List/detail/write operations for one entity kind.
pub trait EntityFacade: Send + Sync + 'static {
    type Summary: Entity + Clone + Debug + PartialEq + Send + Sync + 'static;
    type Detail: Related + Clone + Debug + PartialEq + Send + Sync + 'static;
    type CreateInput: Send + Sync + 'static;
    type UpdateInput: Send + Sync + 'static;

    const KIND: EntityKind;

    /// Fetch one zero-indexed page, optionally filtered by name.
    fn list(
        &self,
        page: u32,
        size: u32,
        term: Option<&str>,
    ) -> impl Future<Output = Result<PageResult<Self::Summary>, CoreError>> + Send;

    /// Fails with `CoreError::NotFound` when `id` does not exist.
    fn get_detail(
        &self,
        id: EntityId,
    ) -> impl Future<Output = Result<Self::Detail, CoreError>> + Send;

    fn create(
        &self,
        input: Self::CreateInput,
    ) -> impl Future<Output = Result<Self::Summary, CoreError>> + Send;

    fn update(
        &self,
        id: EntityId,
        input: Self::UpdateInput,
    ) -> impl Future<Output = Result<Self::Summary, CoreError>> + Send;

    fn delete(&self, id: EntityId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Link/unlink between a parent record and a related child
/// (tutor ↔ pet, from either side).
pub trait RelationFacade: EntityFacade {
    fn link(
        &self,
        parent: EntityId,
        child: EntityId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn unlink(
        &self,
        parent: EntityId,
        child: EntityId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Translate a transport error, naming the record when it is a 404.
fn lift(err: petadmin_api::Error, kind: EntityKind, id: EntityId) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: kind.to_string(),
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}

fn to_page<D, T: From<D>>(page: petadmin_api::types::Page<D>) -> PageResult<T> {
    PageResult {
        items: page.content.into_iter().map(T::from).collect(),
        total: page.total,
        total_pages: page.page_count,
    }
}

/// Empty or whitespace-only search terms mean "no filter".
fn name_filter(term: Option<&str>) -> Option<String> {
    crate::validate::non_blank(term).map(str::to_owned)
}
