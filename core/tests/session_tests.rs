// tests/session_tests.rs
mod common;

use common::*;
use concierge::models::{OrderContext, OrderState};
use concierge::{InMemoryCatalog, ResponseStatus, SessionStore};
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
#[serial]
async fn test_lock_creates_fresh_context_and_persists_writes() {
  setup_tracing();
  let store = SessionStore::new();
  assert!(store.get("alice").is_none());

  {
    let mut guard = store.lock("alice").await;
    assert_eq!(*guard, OrderContext::new());
    guard.state = OrderState::PaymentMethod;
  }

  assert_eq!(store.get("alice").unwrap().state, OrderState::PaymentMethod);
  assert_eq!(store.len(), 1);
  assert!(store.remove("alice"));
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_release_drops_only_idle_fresh_sessions() {
  setup_tracing();
  let store = Arc::new(SessionStore::new());

  let guard = store.lock("fresh").await;
  store.release("fresh", guard);
  assert!(store.is_empty());

  let mut guard = store.lock("ordering").await;
  guard.state = OrderState::AddressCollection;
  store.release("ordering", guard);
  assert_eq!(store.len(), 1);

  // A turn already queued on the session keeps the entry alive.
  let guard = store.lock("queued").await;
  let waiter = {
    let store = store.clone();
    tokio::spawn(async move {
      let guard = store.lock("queued").await;
      let seen = store.len();
      store.release("queued", guard);
      seen
    })
  };
  tokio::time::sleep(Duration::from_millis(20)).await;
  store.release("queued", guard);

  assert_eq!(waiter.await.unwrap(), 2);
  assert_eq!(store.len(), 1);
  assert_eq!(store.get("ordering").unwrap().state, OrderState::AddressCollection);
}

#[tokio::test]
#[serial]
async fn test_get_does_not_wait_for_a_held_session() {
  setup_tracing();
  let store = SessionStore::new();
  let _guard = store.lock("busy").await;
  assert!(store.get("busy").is_none());
}

#[tokio::test]
#[serial]
async fn test_second_lock_waits_for_the_first() {
  setup_tracing();
  let store = Arc::new(SessionStore::new());
  let mut first = store.lock("s").await;

  let waiter = {
    let store = store.clone();
    tokio::spawn(async move {
      let guard = store.lock("s").await;
      guard.state
    })
  };

  tokio::time::sleep(Duration::from_millis(20)).await;
  assert!(!waiter.is_finished());
  first.state = OrderState::Confirmation;
  drop(first);

  assert_eq!(waiter.await.unwrap(), OrderState::Confirmation);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_concurrent_turns_in_one_session_are_serialized() {
  setup_tracing();
  // A small delay on every lookup widens the window for interleaving.
  let h = harness_with_catalog(Arc::new(SlowCatalog {
    inner: InMemoryCatalog::sample(),
    delay: Duration::from_millis(10),
  }));
  let router = Arc::new(h.router);

  let tasks: Vec<_> = (0..8)
    .map(|_| {
      let router = router.clone();
      tokio::spawn(async move { router.handle("I want to buy a Smart Watch", Some(5), Some("shared")).await })
    })
    .collect();

  let mut found = 0;
  for task in tasks {
    let response = task.await.unwrap();
    assert_eq!(response.status, ResponseStatus::Success);
    if response.response_text.starts_with("I found Smart Watch") {
      found += 1;
    }
  }

  // Only the first turn saw Init; the rest saw QuantitySelection and asked for a number.
  assert_eq!(found, 1);
  assert_eq!(
    router.session_context("shared").unwrap().state,
    OrderState::QuantitySelection
  );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_different_sessions_progress_concurrently() {
  setup_tracing();
  let h = sample_harness();
  let router = Arc::new(h.router);

  let tasks: Vec<_> = (0..16)
    .map(|i| {
      let router = router.clone();
      tokio::spawn(async move {
        let session = format!("user-{}", i);
        router.handle("I want to buy a Coffee Maker", Some(i), Some(session.as_str())).await;
        router.handle("2 please", Some(i), Some(session.as_str())).await;
        session
      })
    })
    .collect();

  for task in tasks {
    let session = task.await.unwrap();
    let context = router.session_context(&session).unwrap();
    assert_eq!(context.state, OrderState::AddressCollection);
    assert_eq!(context.total_cents(), Some(2 * 8999));
  }
  router.flush_interactions().await;
  assert_eq!(h.log.records().len(), 32);
}
