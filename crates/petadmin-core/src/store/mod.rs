// ── Reactive entity store ──
//
// One generic store per entity kind. Canonical state lives in a `watch`
// channel; every mutation publishes a fresh immutable snapshot.

mod entity_store;
mod search;
mod state;

use std::time::Duration;

pub use entity_store::EntityStore;
pub use search::PipelineStatus;
pub use state::{PageInfo, StoreState};

use crate::facade::{EntityFacade, PetFacade, TutorFacade};

/// The state type published by a store over facade `F`.
pub type StateOf<F> = StoreState<<F as EntityFacade>::Summary, <F as EntityFacade>::Detail>;

pub type PetStore = EntityStore<PetFacade>;
pub type TutorStore = EntityStore<TutorFacade>;

/// Store tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Page size used by searches until `load_page` records another.
    pub page_size: u32,
    /// Quiet period before a search term is committed.
    pub search_debounce: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            search_debounce: Duration::from_millis(100),
        }
    }
}
