// ── Search debounce pipeline ──
//
// One background task per store. Terms are held until input has been
// quiet for the debounce period, repeated terms are dropped, and a newly
// committed term replaces any fetch still in flight (switch-to-latest).

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::entity_store::{Lane, StoreInner};
use crate::error::CoreError;
use crate::facade::{EntityFacade, PageResult};

#[derive(Debug)]
pub(super) enum SearchInput {
    Term(String),
    /// Forget pending input, the in-flight fetch, and the last committed term.
    Reset,
}

/// Observable progress of the search pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStatus {
    /// Terms sent but not yet received by the pipeline.
    pub queued: usize,
    /// A term is waiting out the debounce period.
    pub debouncing: bool,
    /// A committed term's fetch is in flight.
    pub fetching: bool,
}

impl PipelineStatus {
    pub fn is_idle(&self) -> bool {
        self.queued == 0 && !self.debouncing && !self.fetching
    }
}

struct InFlight<S> {
    generation: u64,
    term: String,
    fetch: BoxFuture<'static, Result<PageResult<S>, CoreError>>,
}

pub(super) async fn search_task<F: EntityFacade>(
    inner: Arc<StoreInner<F>>,
    mut rx: mpsc::UnboundedReceiver<SearchInput>,
    debounce: Duration,
    cancel: CancellationToken,
) {
    let mut pending_term: Option<String> = None;
    let mut deadline: Option<Instant> = None;
    let mut last_committed: Option<String> = None;
    let mut in_flight: Option<InFlight<F::Summary>> = None;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            input = rx.recv() => {
                let Some(input) = input else { break };
                match input {
                    SearchInput::Term(term) => {
                        trace!(kind = %F::KIND, term = %term, "search input");
                        pending_term = Some(term);
                        deadline = Some(Instant::now() + debounce);
                        inner.status.send_modify(|s| {
                            s.queued = s.queued.saturating_sub(1);
                            s.debouncing = true;
                        });
                    }
                    SearchInput::Reset => {
                        pending_term = None;
                        deadline = None;
                        last_committed = None;
                        if let Some(flight) = in_flight.take() {
                            inner.abandon_search(flight.generation);
                        }
                        inner.status.send_modify(|s| {
                            s.debouncing = false;
                            s.fetching = false;
                        });
                    }
                }
            }
            () = async {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => pending().await,
                }
            } => {
                deadline = None;
                let term = pending_term.take();
                let fetch = match term {
                    Some(term) if last_committed.as_ref() != Some(&term) => {
                        last_committed = Some(term.clone());
                        Some(dispatch(&inner, term))
                    }
                    Some(term) => {
                        trace!(kind = %F::KIND, term = %term, "search term unchanged, skipping");
                        None
                    }
                    None => None,
                };
                if let Some(fetch) = fetch {
                    // Dropping the previous fetch discards its result.
                    in_flight = Some(fetch);
                }
                let fetching = in_flight.is_some();
                inner.status.send_modify(|s| {
                    s.debouncing = false;
                    s.fetching = fetching;
                });
            }
            result = async {
                match in_flight.as_mut() {
                    Some(flight) => (&mut flight.fetch).await,
                    None => pending().await,
                }
            } => {
                if let Some(flight) = in_flight.take() {
                    let fallback = format!("Failed to search {}", F::KIND.plural());
                    debug!(kind = %F::KIND, term = %flight.term, "search settled");
                    if !inner.complete_list(flight.generation, 0, result, &fallback) {
                        // Failed or superseded: the same term may be retried.
                        last_committed = None;
                    }
                }
                inner.status.send_modify(|s| s.fetching = false);
            }
        }
    }

    inner.status.send_replace(PipelineStatus::default());
    debug!(kind = %F::KIND, "search pipeline stopped");
}

/// Commit `term`: reset to page zero and start its fetch.
fn dispatch<F: EntityFacade>(inner: &Arc<StoreInner<F>>, term: String) -> InFlight<F::Summary> {
    let generation = inner.begin(Lane::List, |s| {
        s.search_term.clone_from(&term);
        s.current_page = 0;
        s.loading = s.items.is_empty();
        s.error = None;
    });
    let size = inner.page_size();
    debug!(kind = %F::KIND, term = %term, size, generation, "dispatching search");

    let facade = Arc::clone(&inner.facade);
    let query = term.clone();
    let fetch: BoxFuture<'static, _> = Box::pin(async move {
        let filter = crate::validate::non_blank(Some(query.as_str()));
        facade.list(0, size, filter).await
    });

    InFlight {
        generation,
        term,
        fetch,
    }
}
