// ── Generic entity store ──
//
// Holds one entity kind's list/detail state and arbitrates the async
// operations that mutate it. Responses are applied under the `watch`
// write lock and only when their generation is still current, so a
// late response never overwrites a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::search::{PipelineStatus, SearchInput, search_task};
use super::{StateOf, StoreOptions};
use crate::error::CoreError;
use crate::facade::{EntityFacade, PageResult, RelationFacade};
use crate::model::{Entity, EntityId, Related};
use crate::validate::non_blank;

/// Which in-flight requests a write supersedes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Lane {
    List,
    Detail,
}

/// Monotonic request generations, one per lane.
///
/// Only read or bumped inside `state` write closures, so the watch lock
/// orders every check against every bump.
#[derive(Debug, Default)]
struct Generations {
    list: AtomicU64,
    detail: AtomicU64,
}

impl Generations {
    fn counter(&self, lane: Lane) -> &AtomicU64 {
        match lane {
            Lane::List => &self.list,
            Lane::Detail => &self.detail,
        }
    }

    fn bump(&self, lane: Lane) -> u64 {
        self.counter(lane).fetch_add(1, Ordering::Relaxed) + 1
    }

    fn is_current(&self, lane: Lane, generation: u64) -> bool {
        self.counter(lane).load(Ordering::Relaxed) == generation
    }
}

/// State shared between the store handle and its search task.
pub(super) struct StoreInner<F: EntityFacade> {
    pub(super) facade: Arc<F>,
    state: watch::Sender<Arc<StateOf<F>>>,
    generations: Generations,
    page_size: AtomicU32,
    last_loaded: watch::Sender<Option<DateTime<Utc>>>,
    pub(super) status: watch::Sender<PipelineStatus>,
}

impl<F: EntityFacade> StoreInner<F> {
    pub(super) fn page_size(&self) -> u32 {
        self.page_size.load(Ordering::Relaxed)
    }

    /// Unconditional write that does not touch generations.
    fn modify(&self, f: impl FnOnce(&mut StateOf<F>)) {
        self.state.send_modify(|s| f(Arc::make_mut(s)));
    }

    /// Start a request on `lane`: bump its generation and apply `f`.
    pub(super) fn begin(&self, lane: Lane, f: impl FnOnce(&mut StateOf<F>)) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|s| {
            generation = self.generations.bump(lane);
            f(Arc::make_mut(s));
        });
        generation
    }

    /// Apply a response only if no newer request or local write has
    /// started on `lane` since `generation`. Returns whether it applied.
    pub(super) fn complete(
        &self,
        lane: Lane,
        generation: u64,
        f: impl FnOnce(&mut StateOf<F>),
    ) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if !self.generations.is_current(lane, generation) {
                return false;
            }
            f(Arc::make_mut(s));
            true
        });
        if !applied {
            trace!(kind = %F::KIND, ?lane, generation, "discarding stale response");
        }
        applied
    }

    /// Apply a local write that invalidates in-flight requests on `lanes`.
    fn supersede(&self, lanes: &[Lane], f: impl FnOnce(&mut StateOf<F>)) {
        self.state.send_modify(|s| {
            for &lane in lanes {
                self.generations.bump(lane);
            }
            f(Arc::make_mut(s));
        });
    }

    /// Apply a list response for `page` requested under `generation`.
    /// Returns `true` only when a successful response was applied.
    pub(super) fn complete_list(
        &self,
        generation: u64,
        page: u32,
        result: Result<PageResult<F::Summary>, CoreError>,
        fallback: &str,
    ) -> bool {
        match result {
            Ok(PageResult {
                items, total_pages, ..
            }) => {
                let applied = self.complete(Lane::List, generation, |s| {
                    s.items = items;
                    s.current_page = page;
                    s.total_pages = total_pages;
                    s.loading = false;
                    s.error = None;
                });
                if applied {
                    self.last_loaded.send_replace(Some(Utc::now()));
                }
                applied
            }
            Err(e) => {
                warn!(kind = %F::KIND, error = %e, "list request failed");
                let message = e.message_or(fallback);
                self.complete(Lane::List, generation, |s| {
                    s.error = Some(message);
                    s.loading = false;
                });
                false
            }
        }
    }

    /// Roll back a search dispatched under `generation` if nothing has
    /// superseded it. A term committed after `reset` cleared the state
    /// would otherwise leave its term and `loading` behind.
    pub(super) fn abandon_search(&self, generation: u64) {
        let undone = self.state.send_if_modified(|s| {
            if !self.generations.is_current(Lane::List, generation) {
                return false;
            }
            self.generations.bump(Lane::List);
            let state = Arc::make_mut(s);
            state.search_term.clear();
            state.current_page = 0;
            state.loading = false;
            true
        });
        if undone {
            debug!(kind = %F::KIND, generation, "abandoned search dispatched before reset");
        }
    }

    /// Record a failed write and clear the loading flag it set.
    fn fail(&self, error: &CoreError, fallback: &str, lane: Lane) {
        warn!(kind = %F::KIND, error = %error, "{fallback}");
        let message = error.message_or(fallback);
        self.modify(|s| {
            s.error = Some(message);
            match lane {
                Lane::List => s.loading = false,
                Lane::Detail => s.loading_details = false,
            }
        });
    }
}

// ── EntityStore ──────────────────────────────────────────────────────

/// Single source of truth for one entity kind's list and detail state.
///
/// Construct once per session and share the `Arc`. Readers take
/// snapshots or subscribe; only the store's own methods write.
pub struct EntityStore<F: EntityFacade> {
    inner: Arc<StoreInner<F>>,
    options: StoreOptions,
    search_tx: mpsc::UnboundedSender<SearchInput>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<F: EntityFacade> EntityStore<F> {
    /// Create a store and spawn its search pipeline on the current runtime.
    pub fn new(facade: F, options: StoreOptions) -> Arc<Self> {
        let (state, _) = watch::channel(Arc::new(StateOf::<F>::default()));
        let (last_loaded, _) = watch::channel(None);
        let (status, _) = watch::channel(PipelineStatus::default());
        let inner = Arc::new(StoreInner {
            facade: Arc::new(facade),
            state,
            generations: Generations::default(),
            page_size: AtomicU32::new(options.page_size),
            last_loaded,
            status,
        });

        let (search_tx, search_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(search_task(
            Arc::clone(&inner),
            search_rx,
            options.search_debounce,
            cancel.clone(),
        ));

        Arc::new(Self {
            inner,
            options,
            search_tx,
            cancel,
            task: Mutex::new(Some(task)),
        })
    }

    pub fn facade(&self) -> &F {
        &self.inner.facade
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Current state (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<StateOf<F>> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<StateOf<F>>> {
        self.inner.state.subscribe()
    }

    /// Number of live state receivers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.state.receiver_count()
    }

    /// When a list response was last applied.
    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_loaded.borrow()
    }

    pub fn search_status(&self) -> PipelineStatus {
        *self.inner.status.borrow()
    }

    /// Resolves once no search input is queued, debouncing, or in flight.
    pub async fn search_settled(&self) {
        let mut rx = self.inner.status.subscribe();
        let _ = rx.wait_for(PipelineStatus::is_idle).await;
    }

    pub(crate) fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch one page using the committed search term.
    ///
    /// `loading` is only raised when nothing is cached, so paging through
    /// visible data does not flash an empty view.
    pub async fn load_page(&self, page: u32, page_size: u32) {
        let inner = &self.inner;
        inner.page_size.store(page_size, Ordering::Relaxed);

        let mut term = String::new();
        let generation = inner.begin(Lane::List, |s| {
            s.error = None;
            if s.items.is_empty() {
                s.loading = true;
            }
            term.clone_from(&s.search_term);
        });

        debug!(kind = %F::KIND, page, page_size, term = %term, generation, "loading page");
        let result = inner
            .facade
            .list(page, page_size, non_blank(Some(term.as_str())))
            .await;
        let fallback = format!("Failed to load {}", F::KIND.plural());
        inner.complete_list(generation, page, result, &fallback);
    }

    /// Queue a search term. The fetch happens once input has been quiet
    /// for the debounce period and the term differs from the last one.
    pub fn search(&self, term: impl Into<String>) {
        let status = &self.inner.status;
        status.send_modify(|s| s.queued += 1);
        if self.search_tx.send(SearchInput::Term(term.into())).is_err() {
            status.send_modify(|s| s.queued = s.queued.saturating_sub(1));
            debug!(kind = %F::KIND, "search pipeline stopped, dropping term");
        }
    }

    pub async fn load_detail(&self, id: EntityId) {
        let inner = &self.inner;
        let generation = inner.begin(Lane::Detail, |s| s.loading_details = true);

        debug!(kind = %F::KIND, id, generation, "loading detail");
        match inner.facade.get_detail(id).await {
            Ok(detail) => {
                inner.complete(Lane::Detail, generation, |s| {
                    s.selected = Some(detail);
                    s.loading_details = false;
                    s.error = None;
                });
            }
            Err(e) => {
                warn!(kind = %F::KIND, id, error = %e, "detail request failed");
                let message = e.message_or(&format!("Failed to load {} details", F::KIND));
                inner.complete(Lane::Detail, generation, |s| {
                    s.error = Some(message);
                    s.loading_details = false;
                });
            }
        }
    }

    /// Load the following page. Returns `false` on the last page.
    pub async fn next_page(&self) -> bool {
        let state = self.snapshot();
        if !state.has_next_page() {
            return false;
        }
        self.load_page(state.current_page + 1, self.inner.page_size())
            .await;
        true
    }

    /// Load the preceding page. Returns `false` on the first page.
    pub async fn previous_page(&self) -> bool {
        let state = self.snapshot();
        if !state.has_previous_page() {
            return false;
        }
        self.load_page(state.current_page - 1, self.inner.page_size())
            .await;
        true
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Create a record and prepend it to `items` without re-fetching.
    pub async fn create(&self, input: F::CreateInput) -> Result<F::Summary, CoreError> {
        let inner = &self.inner;
        inner.modify(|s| s.loading = true);

        debug!(kind = %F::KIND, "creating");
        match inner.facade.create(input).await {
            Ok(created) => {
                inner.supersede(&[Lane::List], |s| {
                    s.items.insert(0, created.clone());
                    s.loading = false;
                    s.error = None;
                });
                Ok(created)
            }
            Err(e) => {
                inner.fail(&e, &format!("Failed to create {}", F::KIND), Lane::List);
                Err(e)
            }
        }
    }

    /// Update a record and replace it in `items`, keeping list order.
    pub async fn update(
        &self,
        id: EntityId,
        input: F::UpdateInput,
    ) -> Result<F::Summary, CoreError> {
        let inner = &self.inner;
        inner.modify(|s| s.loading = true);

        debug!(kind = %F::KIND, id, "updating");
        match inner.facade.update(id, input).await {
            Ok(updated) => {
                inner.supersede(&[Lane::List], |s| {
                    if let Some(slot) = s.items.iter_mut().find(|item| item.id() == id) {
                        *slot = updated.clone();
                    }
                    s.loading = false;
                    s.error = None;
                });
                Ok(updated)
            }
            Err(e) => {
                inner.fail(&e, &format!("Failed to update {}", F::KIND), Lane::List);
                Err(e)
            }
        }
    }

    /// Delete a record and drop it from `items` (and from `selected`).
    pub async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
        let inner = &self.inner;
        inner.modify(|s| s.loading = true);

        debug!(kind = %F::KIND, id, "deleting");
        match inner.facade.delete(id).await {
            Ok(()) => {
                inner.state.send_modify(|s| {
                    inner.generations.bump(Lane::List);
                    let state = Arc::make_mut(s);
                    state.items.retain(|item| item.id() != id);
                    if state.selected.as_ref().is_some_and(|d| d.id() == id) {
                        inner.generations.bump(Lane::Detail);
                        state.selected = None;
                        state.loading_details = false;
                    }
                    state.loading = false;
                    state.error = None;
                });
                Ok(())
            }
            Err(e) => {
                inner.fail(&e, &format!("Failed to delete {}", F::KIND), Lane::List);
                Err(e)
            }
        }
    }

    // ── Local state ──────────────────────────────────────────────────

    pub fn clear_error(&self) {
        self.inner.modify(|s| s.error = None);
    }

    /// Drop the selected detail; an in-flight detail fetch is discarded.
    pub fn clear_selected(&self) {
        self.inner.supersede(&[Lane::Detail], |s| {
            s.selected = None;
            s.loading_details = false;
        });
    }

    /// Return to the initial state and forget the search pipeline's
    /// pending input. In-flight responses are discarded.
    pub fn reset(&self) {
        self.reset_state();
        let _ = self.search_tx.send(SearchInput::Reset);
    }

    fn reset_state(&self) {
        let inner = &self.inner;
        inner.state.send_modify(|s| {
            inner.generations.bump(Lane::List);
            inner.generations.bump(Lane::Detail);
            *s = Arc::new(StateOf::<F>::default());
        });
        inner.page_size.store(self.options.page_size, Ordering::Relaxed);
        inner.last_loaded.send_replace(None);
    }

    /// Stop the search pipeline and wait for it to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        if let Some(task) = self.task.lock().await.take() {
            let _ = task.await;
        }
    }
}

// ── Relations ────────────────────────────────────────────────────────

impl<F: RelationFacade> EntityStore<F> {
    /// Link `child` to `parent`, then re-fetch the parent's detail.
    pub async fn link(&self, parent: EntityId, child: EntityId) -> Result<(), CoreError> {
        let inner = &self.inner;
        inner.modify(|s| s.loading_details = true);

        debug!(kind = %F::KIND, parent, child, "linking");
        if let Err(e) = inner.facade.link(parent, child).await {
            inner.fail(&e, &format!("Failed to link {}", F::KIND), Lane::Detail);
            return Err(e);
        }
        self.load_detail(parent).await;
        Ok(())
    }

    /// Unlink `child` from `parent`. When `parent` is the selected detail
    /// the child is removed in memory; otherwise the parent is re-fetched.
    pub async fn unlink(&self, parent: EntityId, child: EntityId) -> Result<(), CoreError> {
        let inner = &self.inner;
        inner.modify(|s| s.loading_details = true);

        debug!(kind = %F::KIND, parent, child, "unlinking");
        if let Err(e) = inner.facade.unlink(parent, child).await {
            inner.fail(&e, &format!("Failed to unlink {}", F::KIND), Lane::Detail);
            return Err(e);
        }

        let patched = inner.state.send_if_modified(|s| {
            if !s.selected.as_ref().is_some_and(|d| d.id() == parent) {
                return false;
            }
            inner.generations.bump(Lane::Detail);
            let state = Arc::make_mut(s);
            if let Some(detail) = state.selected.as_mut() {
                detail.remove_related(child);
            }
            state.loading_details = false;
            state.error = None;
            true
        });
        if !patched {
            self.load_detail(parent).await;
        }
        Ok(())
    }
}

impl<F: EntityFacade> Drop for EntityStore<F> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{EntityKind, Pet, PetDetail};

    /// Pages arrive after a second; nothing else is used.
    struct SlowPets;

    impl EntityFacade for SlowPets {
        type Summary = Pet;
        type Detail = PetDetail;
        type CreateInput = ();
        type UpdateInput = ();

        const KIND: EntityKind = EntityKind::Pet;

        async fn list(
            &self,
            _page: u32,
            _size: u32,
            _term: Option<&str>,
        ) -> Result<PageResult<Pet>, CoreError> {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(PageResult {
                items: Vec::new(),
                total: 0,
                total_pages: 0,
            })
        }

        async fn get_detail(&self, id: EntityId) -> Result<PetDetail, CoreError> {
            Err(CoreError::NotFound {
                entity_type: "pet".into(),
                identifier: id.to_string(),
            })
        }

        async fn create(&self, (): ()) -> Result<Pet, CoreError> {
            Err(CoreError::Internal("unused".into()))
        }

        async fn update(&self, _id: EntityId, (): ()) -> Result<Pet, CoreError> {
            Err(CoreError::Internal("unused".into()))
        }

        async fn delete(&self, _id: EntityId) -> Result<(), CoreError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reset_undoes_search_dispatched_after_state_was_cleared() {
        let store = EntityStore::new(SlowPets, StoreOptions::default());
        let mut status = store.inner.status.subscribe();

        store.search("rex");
        status.wait_for(|s| s.debouncing).await.unwrap();

        // The state half of reset lands, then the pipeline commits the
        // debounced term before it receives the reset message.
        store.reset_state();
        status.wait_for(|s| s.fetching).await.unwrap();
        let raced = store.snapshot();
        assert_eq!(raced.search_term, "rex");
        assert!(raced.loading);

        store.search_tx.send(SearchInput::Reset).unwrap();
        store.search_settled().await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(*store.snapshot(), StateOf::<SlowPets>::default());
        assert!(store.search_status().is_idle());
    }
}
