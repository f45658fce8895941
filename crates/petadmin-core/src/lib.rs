//! Reactive data layer between `petadmin-api` and UI consumers.
//!
//! This crate owns the domain model, facades, and reactive stores for the
//! pet registry admin workspace:
//!
//! - **[`EntityStore`]** — Generic store for one entity kind, built on a
//!   `tokio::sync::watch` channel. Handles pagination, debounced
//!   switch-to-latest search, and CRUD with local list updates. Responses
//!   are applied only while their request generation is current.
//!
//! - **[`EntityFacade`] / [`RelationFacade`]** — The CRUD contract a store
//!   consumes. [`PetFacade`] and [`TutorFacade`] validate input, translate
//!   it to the backend's wire shape, and sequence photo uploads.
//!
//! - **[`hook`]** — [`use_store`] attaches a consumer: snapshots,
//!   [`Projection`]s that only fire on real changes, bound actions, and
//!   teardown on drop.
//!
//! - **[`Registry`]** — Session owner holding one pet store and one tutor
//!   store. [`Registry::oneshot()`] is the single-invocation mode the CLI uses.
//!
//! - **Domain model** ([`model`]) — `Pet`, `Tutor`, their detail forms, and
//!   form input types, plus pure [`validate`] helpers (CPF, email, phone).

pub mod config;
pub mod convert;
pub mod error;
pub mod facade;
pub mod hook;
pub mod model;
pub mod registry;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, Credentials, TlsVerification};
pub use error::CoreError;
pub use facade::{EntityFacade, PageResult, PetFacade, RelationFacade, TutorFacade};
pub use hook::{Projection, StoreHook, StoreSubscription, use_store};
pub use registry::Registry;
pub use store::{
    EntityStore, PageInfo, PetStore, PipelineStatus, StateOf, StoreOptions, StoreState,
    TutorStore,
};

pub use model::{
    Entity, EntityId, EntityKind, Pet, PetDetail, PetInput, Photo, PhotoUpload, Related, Tutor,
    TutorDetail, TutorInput,
};
