// ── Store subscriptions for UI consumers ──
//
// Adapters that let a front end follow a store: raw snapshot
// subscriptions, value projections, and `use_store`, which bundles both
// with bound actions and guaranteed teardown.

mod projection;
mod store_hook;

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::facade::EntityFacade;
use crate::store::{EntityStore, StateOf};

pub use projection::Projection;
pub use store_hook::{StoreHook, use_store};

/// A subscription to one store's state.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via `changed()` or by converting to a `Stream`.
pub struct StoreSubscription<F: EntityFacade> {
    current: Arc<StateOf<F>>,
    receiver: watch::Receiver<Arc<StateOf<F>>>,
}

impl<F: EntityFacade> StoreSubscription<F> {
    pub fn new(store: &EntityStore<F>) -> Self {
        let receiver = store.subscribe();
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or by the last `changed()`.
    pub fn current(&self) -> &Arc<StateOf<F>> {
        &self.current
    }

    /// The latest snapshot (may have changed since `current`).
    pub fn latest(&self) -> Arc<StateOf<F>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<StateOf<F>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    /// The first item is the current snapshot.
    pub fn into_stream(self) -> StateStream<F> {
        StateStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StateStream<F: EntityFacade> {
    inner: WatchStream<Arc<StateOf<F>>>,
}

impl<F: EntityFacade> Stream for StateStream<F> {
    type Item = Arc<StateOf<F>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin because Arc<_> is Unpin.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
