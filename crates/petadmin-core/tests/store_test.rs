#![allow(clippy::unwrap_used)]
// Behavioral tests for `EntityStore` under paused tokio time.

mod common;

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::sleep;
use tokio_test::{assert_pending, task};

use common::{Item, MockFacade, page_items};
use petadmin_core::{EntityStore, StateOf, StoreOptions, StoreState};

type Store = EntityStore<MockFacade>;

// ── Helpers ─────────────────────────────────────────────────────────

fn setup(facade: MockFacade) -> Arc<Store> {
    EntityStore::new(facade, StoreOptions::default())
}

/// Record every snapshot the store publishes from now on.
fn record(store: &Store) -> Arc<Mutex<Vec<Arc<StateOf<MockFacade>>>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snap = Arc::clone(&rx.borrow_and_update());
            sink.lock().unwrap().push(snap);
        }
    });
    seen
}

fn names(items: &[Item]) -> Vec<String> {
    items.iter().map(|i| i.name.clone()).collect()
}

// ── Pagination ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_load_page_replaces_items_and_cursor_together() {
    let store = setup(MockFacade::default());
    let seen = record(&store);

    store.load_page(0, 2).await;
    store.load_page(3, 2).await;
    tokio::task::yield_now().await;

    let state = store.snapshot();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.current_page, 3);
    assert_eq!(state.total_pages, 5);
    assert!(!state.loading);
    assert!(store.last_loaded().is_some());

    // No published snapshot mixes one page's items with another's cursor.
    for snap in seen.lock().unwrap().iter() {
        let marker = format!(":{}:", snap.current_page);
        assert!(
            snap.items.iter().all(|i| i.name.contains(&marker)),
            "page {} published with items {:?}",
            snap.current_page,
            names(&snap.items)
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_loading_only_raised_on_first_page_load() {
    let store = setup(MockFacade::default());

    let first = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.load_page(0, 10).await }
    });
    sleep(Duration::from_millis(10)).await;
    assert!(store.snapshot().loading);
    first.await.unwrap();

    let second = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.load_page(1, 10).await }
    });
    sleep(Duration::from_millis(10)).await;
    assert!(!store.snapshot().loading);
    second.await.unwrap();
    assert_eq!(store.snapshot().current_page, 1);
}

#[tokio::test(start_paused = true)]
async fn test_next_and_previous_page_are_bounds_checked() {
    let facade = MockFacade::default();
    facade.total_pages.store(2, Ordering::SeqCst);
    let store = setup(facade);

    store.load_page(0, 3).await;
    assert!(!store.previous_page().await);
    assert!(store.next_page().await);
    assert_eq!(store.snapshot().current_page, 1);
    assert!(!store.next_page().await);
    assert!(store.previous_page().await);
    assert_eq!(store.snapshot().current_page, 0);

    // next/previous reuse the page size recorded by load_page
    let calls = store.facade().list_calls();
    assert!(calls.iter().all(|c| c.size == 3));
    assert_eq!(calls.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_uses_fallback_message() {
    let facade = MockFacade::default();
    facade.fail_list.store(true, Ordering::SeqCst);
    let store = setup(facade);

    store.load_page(0, 10).await;

    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("Failed to load pets"));
    assert!(!state.loading);
    assert!(state.items.is_empty());
}

// ── Search pipeline ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_identical_search_terms_fetch_once() {
    let store = setup(MockFacade::default());

    store.search("rex");
    store.search("rex");
    store.search_settled().await;
    assert_eq!(store.facade().calls_for("rex"), 1);

    // Still the committed term, so no refetch.
    store.search("rex");
    store.search_settled().await;
    assert_eq!(store.facade().calls_for("rex"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_terms_commit_only_the_last() {
    let store = setup(MockFacade::default());

    store.search("a");
    sleep(Duration::from_millis(10)).await;
    store.search("ab");
    store.search_settled().await;

    let facade = store.facade();
    assert_eq!(facade.calls_for("a"), 0);
    assert_eq!(facade.calls_for("ab"), 1);

    let state = store.snapshot();
    assert_eq!(state.search_term, "ab");
    assert_eq!(state.items, page_items("ab", 0, 10));
    assert_eq!(state.current_page, 0);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_search_result_is_discarded() {
    let facade = MockFacade::default()
        .with_latency("a", Duration::from_millis(300))
        .with_latency("ab", Duration::from_millis(20));
    let store = setup(facade);

    store.search("a");
    sleep(Duration::from_millis(150)).await;
    assert_eq!(store.facade().calls_for("a"), 1, "first term should be in flight");

    store.search("ab");
    store.search_settled().await;
    sleep(Duration::from_millis(500)).await;

    let state = store.snapshot();
    assert_eq!(state.search_term, "ab");
    assert_eq!(names(&state.items), names(&page_items("ab", 0, 10)));
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn test_search_discards_older_page_load() {
    let facade = MockFacade::default().with_latency("", Duration::from_millis(300));
    let store = setup(facade);

    let slow = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.load_page(2, 10).await }
    });
    sleep(Duration::from_millis(1)).await;
    store.search("x");
    store.search_settled().await;
    slow.await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.search_term, "x");
    assert_eq!(state.current_page, 0);
    assert_eq!(state.items, page_items("x", 0, 10));
}

#[tokio::test(start_paused = true)]
async fn test_refinement_search_never_raises_loading() {
    let store = setup(MockFacade::default());
    store.load_page(0, 10).await;
    let seen = record(&store);

    store.search("re");
    sleep(Duration::from_millis(120)).await;

    let mid = store.snapshot();
    assert_eq!(mid.search_term, "re");
    assert!(!mid.loading);
    assert!(store.search_status().fetching);

    store.search_settled().await;
    tokio::task::yield_now().await;

    assert!(seen.lock().unwrap().iter().all(|s| !s.loading));
    assert_eq!(store.snapshot().items, page_items("re", 0, 10));
}

#[tokio::test(start_paused = true)]
async fn test_search_on_empty_store_shows_loading() {
    let store = setup(MockFacade::default());

    store.search("re");
    sleep(Duration::from_millis(120)).await;
    assert!(store.snapshot().loading);

    store.search_settled().await;
    assert!(!store.snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn test_search_failure_is_recorded() {
    let facade = MockFacade::default();
    facade.fail_list.store(true, Ordering::SeqCst);
    let store = setup(facade);

    store.search("boom");
    store.search_settled().await;

    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("Failed to search pets"));
    assert_eq!(state.search_term, "boom");
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_can_be_retried_with_same_term() {
    let facade = MockFacade::default();
    facade.fail_list.store(true, Ordering::SeqCst);
    let store = setup(facade);

    store.search("rex");
    store.search_settled().await;
    assert_eq!(store.facade().calls_for("rex"), 1);
    assert!(store.snapshot().error.is_some());

    store.facade().fail_list.store(false, Ordering::SeqCst);
    store.search("rex");
    store.search_settled().await;

    assert_eq!(store.facade().calls_for("rex"), 2);
    let state = store.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.items, page_items("rex", 0, 10));
}

#[tokio::test(start_paused = true)]
async fn test_search_settled_waits_for_queued_terms() {
    let store = setup(MockFacade::default());

    store.search("q");
    let mut settled = task::spawn(store.search_settled());
    assert_pending!(settled.poll());

    store.search_settled().await;
    assert!(store.search_status().is_idle());
    assert_eq!(store.facade().calls_for("q"), 1);
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_create_prepends_without_refetch() {
    let store = setup(MockFacade::default());
    store.load_page(0, 2).await;
    let before = store.snapshot().items.clone();

    let created = store.create("Bidu".into()).await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.items[0], created);
    assert_eq!(&state.items[1..], before.as_slice());
    assert_eq!(store.facade().list_calls().len(), 1);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn test_create_wins_over_in_flight_page_load() {
    let facade = MockFacade::default().with_latency("", Duration::from_millis(300));
    let store = setup(facade);

    let slow = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.load_page(0, 10).await }
    });
    sleep(Duration::from_millis(1)).await;
    let created = store.create("Bidu".into()).await.unwrap();
    slow.await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.items, vec![created]);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn test_update_replaces_item_in_place() {
    let store = setup(MockFacade::default());
    store.load_page(0, 10).await;
    let ids: Vec<_> = store.snapshot().items.iter().map(|i| i.id).collect();

    store.update(2, "renamed".into()).await.unwrap();

    let state = store.snapshot();
    let after: Vec<_> = state.items.iter().map(|i| i.id).collect();
    assert_eq!(after, ids);
    assert_eq!(state.items[1].name, "renamed");
}

#[tokio::test(start_paused = true)]
async fn test_failed_update_records_error_and_fails() {
    let store = setup(MockFacade::default());
    store.load_page(0, 10).await;
    store.facade().fail_writes.store(true, Ordering::SeqCst);

    let result = store.update(1, "x".into()).await;

    assert!(result.is_err());
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("name already taken"));
    assert!(!state.loading);
    assert_eq!(state.items, page_items("", 0, 10));
}

#[tokio::test(start_paused = true)]
async fn test_delete_removes_item_and_selection() {
    let store = setup(MockFacade::default());
    store.load_page(0, 10).await;
    store.load_detail(2).await;

    store.delete(2).await.unwrap();

    let state = store.snapshot();
    assert!(state.items.iter().all(|i| i.id != 2));
    assert_eq!(state.items.len(), 2);
    assert!(state.selected.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_failed_delete_keeps_items() {
    let store = setup(MockFacade::default());
    store.load_page(0, 10).await;
    store.facade().fail_writes.store(true, Ordering::SeqCst);

    assert!(store.delete(1).await.is_err());
    assert_eq!(store.snapshot().items.len(), 3);
}

// ── Detail and relations ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_load_detail_not_found() {
    let store = setup(MockFacade::default());

    store.load_detail(404).await;

    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("pet not found: 404"));
    assert!(!state.loading_details);
    assert!(state.selected.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_newer_detail_request_wins() {
    let store = setup(MockFacade::default());
    *store.facade().detail_latency.lock().unwrap() = Duration::from_millis(100);

    let first = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.load_detail(1).await }
    });
    sleep(Duration::from_millis(1)).await;
    *store.facade().detail_latency.lock().unwrap() = Duration::from_millis(10);
    store.load_detail(2).await;
    first.await.unwrap();

    assert_eq!(store.snapshot().selected.as_ref().map(|d| d.id), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_unlink_selected_parent_patches_in_memory() {
    let store = setup(MockFacade::default());
    store.load_detail(5).await;
    assert_eq!(store.facade().detail_calls(), 1);

    store.unlink(5, 2).await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.selected.as_ref().unwrap().children, vec![1]);
    assert!(!state.loading_details);
    assert_eq!(store.facade().detail_calls(), 1);
    assert_eq!(
        *store.facade().relation_calls.lock().unwrap(),
        vec![("unlink", 5, 2)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_unlink_other_parent_refetches() {
    let store = setup(MockFacade::default());
    store.load_detail(5).await;

    store.unlink(6, 1).await.unwrap();

    assert_eq!(store.facade().detail_calls(), 2);
    assert_eq!(store.snapshot().selected.as_ref().map(|d| d.id), Some(6));
}

#[tokio::test(start_paused = true)]
async fn test_link_refreshes_parent_detail() {
    let store = setup(MockFacade::default());
    store.load_detail(5).await;

    store.link(5, 3).await.unwrap();

    assert_eq!(store.facade().detail_calls(), 2);
    assert!(!store.snapshot().loading_details);
}

#[tokio::test(start_paused = true)]
async fn test_failed_link_fails_without_refetch() {
    let store = setup(MockFacade::default());
    store.load_detail(5).await;
    store.facade().fail_writes.store(true, Ordering::SeqCst);

    assert!(store.link(5, 3).await.is_err());

    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("name already taken"));
    assert!(!state.loading_details);
    assert_eq!(store.facade().detail_calls(), 1);
}

// ── Local state ─────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_clear_error_and_selected() {
    let store = setup(MockFacade::default());
    store.load_detail(404).await;
    store.load_detail(1).await;
    store.facade().fail_list.store(true, Ordering::SeqCst);
    store.load_page(0, 10).await;

    store.clear_error();
    store.clear_selected();

    let state = store.snapshot();
    assert!(state.error.is_none());
    assert!(state.selected.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_reset_restores_initial_state() {
    let store = setup(MockFacade::default());
    store.load_page(1, 10).await;
    store.load_detail(3).await;
    store.search("rex");
    store.search_settled().await;
    store.facade().fail_writes.store(true, Ordering::SeqCst);
    let _ = store.create("x".into()).await;

    store.reset();

    assert_eq!(*store.snapshot(), StoreState::default());
    assert!(store.last_loaded().is_none());

    // The pipeline forgot its last term, so the same search fetches again.
    store.search("rex");
    store.search_settled().await;
    assert_eq!(store.facade().calls_for("rex"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_in_flight_search() {
    let store = setup(MockFacade::default().with_latency("slow", Duration::from_millis(300)));

    store.search("slow");
    sleep(Duration::from_millis(150)).await;
    store.reset();
    sleep(Duration::from_millis(500)).await;

    assert_eq!(*store.snapshot(), StoreState::default());
    assert!(store.search_status().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_search_pipeline() {
    let store = setup(MockFacade::default());

    store.shutdown().await;
    store.search("late");
    sleep(Duration::from_millis(500)).await;

    assert_eq!(store.facade().calls_for("late"), 0);
    assert!(store.search_status().is_idle());
}
