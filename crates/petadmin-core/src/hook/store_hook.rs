use std::sync::Arc;

use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::trace;

use super::{Projection, StoreSubscription};
use crate::error::CoreError;
use crate::facade::{EntityFacade, RelationFacade};
use crate::model::EntityId;
use crate::store::{EntityStore, PageInfo, StateOf};

/// A consumer's handle on a store: subscription, projections, bound
/// actions, and change callbacks.
///
/// Every watcher spawned through the hook is tied to its cancellation
/// token. Dropping the hook cancels the token, so all of them unsubscribe
/// no matter how the consumer goes away.
pub struct StoreHook<F: EntityFacade> {
    store: Arc<EntityStore<F>>,
    subscription: StoreSubscription<F>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

/// Attach a consumer to `store`.
pub fn use_store<F: EntityFacade>(store: &Arc<EntityStore<F>>) -> StoreHook<F> {
    let cancel = store.child_token();
    StoreHook {
        store: Arc::clone(store),
        subscription: StoreSubscription::new(store),
        _guard: cancel.clone().drop_guard(),
        cancel,
    }
}

impl<F: EntityFacade> StoreHook<F> {
    pub fn store(&self) -> &Arc<EntityStore<F>> {
        &self.store
    }

    /// Latest state snapshot.
    pub fn state(&self) -> Arc<StateOf<F>> {
        self.subscription.latest()
    }

    /// Wait for the next state change.
    pub async fn changed(&mut self) -> Option<Arc<StateOf<F>>> {
        self.subscription.changed().await
    }

    // ── Projections ──────────────────────────────────────────────────

    pub fn items(&self) -> Projection<F, Vec<F::Summary>> {
        Projection::new(&self.store, |s| s.items.clone())
    }

    pub fn loading(&self) -> Projection<F, bool> {
        Projection::new(&self.store, |s| s.loading)
    }

    pub fn loading_details(&self) -> Projection<F, bool> {
        Projection::new(&self.store, |s| s.loading_details)
    }

    pub fn error(&self) -> Projection<F, Option<String>> {
        Projection::new(&self.store, |s| s.error.clone())
    }

    pub fn page_info(&self) -> Projection<F, PageInfo> {
        Projection::new(&self.store, StateOf::<F>::page_info)
    }

    pub fn selected(&self) -> Projection<F, Option<F::Detail>> {
        Projection::new(&self.store, |s| s.selected.clone())
    }

    /// Run `callback` on every state change until the hook is dropped.
    pub fn on_change(&self, callback: impl Fn(&StateOf<F>) + Send + Sync + 'static) {
        let mut receiver = self.store.subscribe();
        let cancel = self.cancel.clone();
        let kind = F::KIND;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = receiver.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snap = Arc::clone(&receiver.borrow_and_update());
                        callback(&snap);
                    }
                }
            }
            trace!(%kind, "change watcher released");
        });
    }

    // ── Bound actions ────────────────────────────────────────────────

    pub async fn load_page(&self, page: u32, page_size: u32) {
        self.store.load_page(page, page_size).await;
    }

    pub fn search(&self, term: impl Into<String>) {
        self.store.search(term);
    }

    pub async fn load_detail(&self, id: EntityId) {
        self.store.load_detail(id).await;
    }

    pub async fn create(&self, input: F::CreateInput) -> Result<F::Summary, CoreError> {
        self.store.create(input).await
    }

    pub async fn update(
        &self,
        id: EntityId,
        input: F::UpdateInput,
    ) -> Result<F::Summary, CoreError> {
        self.store.update(id, input).await
    }

    pub async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
        self.store.delete(id).await
    }

    pub async fn next_page(&self) -> bool {
        self.store.next_page().await
    }

    pub async fn previous_page(&self) -> bool {
        self.store.previous_page().await
    }

    pub fn clear_error(&self) {
        self.store.clear_error();
    }

    pub fn clear_selected(&self) {
        self.store.clear_selected();
    }

    pub fn reset(&self) {
        self.store.reset();
    }
}

impl<F: RelationFacade> StoreHook<F> {
    pub async fn link(&self, parent: EntityId, child: EntityId) -> Result<(), CoreError> {
        self.store.link(parent, child).await
    }

    pub async fn unlink(&self, parent: EntityId, child: EntityId) -> Result<(), CoreError> {
        self.store.unlink(parent, child).await
    }
}
