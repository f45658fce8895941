use std::sync::Arc;

use tokio::sync::watch;

use crate::facade::EntityFacade;
use crate::store::{EntityStore, StateOf};

type Selector<F, T> = Box<dyn Fn(&StateOf<F>) -> T + Send + Sync>;

/// A derived view of a store's state that only yields when the selected
/// value actually changes.
pub struct Projection<F: EntityFacade, T> {
    receiver: watch::Receiver<Arc<StateOf<F>>>,
    select: Selector<F, T>,
    current: T,
}

impl<F, T> Projection<F, T>
where
    F: EntityFacade,
    T: Clone + PartialEq,
{
    pub fn new(
        store: &EntityStore<F>,
        select: impl Fn(&StateOf<F>) -> T + Send + Sync + 'static,
    ) -> Self {
        let mut receiver = store.subscribe();
        let current = select(&receiver.borrow_and_update());
        Self {
            receiver,
            select: Box::new(select),
            current,
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    /// Wait until the projected value differs from `current`.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        loop {
            self.receiver.changed().await.ok()?;
            let next = (self.select)(&self.receiver.borrow_and_update());
            if next != self.current {
                self.current = next.clone();
                return Some(next);
            }
        }
    }
}
