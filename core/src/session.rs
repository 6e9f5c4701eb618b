// concierge/src/session.rs

//! Per-session `OrderContext` storage.
//!
//! Each session key owns an async mutex. The router holds it for the whole
//! turn, so two requests for the same session never interleave their
//! read-modify-write, while different sessions run concurrently. Sessions
//! with no order in progress are dropped when their turn ends.

use crate::models::OrderContext;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

#[derive(Debug, Default)]
pub struct SessionStore {
  sessions: Mutex<HashMap<String, Arc<AsyncMutex<OrderContext>>>>,
}

/// Exclusive access to one session's context for the duration of a turn.
pub type SessionGuard = OwnedMutexGuard<OrderContext>;

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Waits until no other turn holds `key`, creating a fresh `Init` context on first use.
  pub async fn lock(&self, key: &str) -> SessionGuard {
    let slot = {
      let mut sessions = self.sessions.lock();
      sessions.entry(key.to_string()).or_default().clone()
    };
    slot.lock_owned().await
  }

  /// Ends a turn. A session whose context is back to a fresh `Init` is dropped
  /// from the table unless another turn is already queued on it.
  pub fn release(&self, key: &str, guard: SessionGuard) {
    if *guard != OrderContext::new() {
      return;
    }
    let slot = OwnedMutexGuard::mutex(&guard).clone();
    let mut sessions = self.sessions.lock();
    drop(guard);
    // Only the table and `slot` hold the mutex: nobody is waiting on it.
    let idle = sessions
      .get(key)
      .is_some_and(|stored| Arc::ptr_eq(stored, &slot) && Arc::strong_count(&slot) == 2);
    if idle {
      sessions.remove(key);
      trace!(session = key, "Idle session released.");
    }
  }

  /// Copy of the stored context, without waiting for an in-flight turn.
  /// `None` if the session is unknown or currently locked.
  pub fn get(&self, key: &str) -> Option<OrderContext> {
    let slot = self.sessions.lock().get(key).cloned()?;
    let guard = slot.try_lock().ok()?;
    Some(guard.clone())
  }

  /// Forgets the session. A turn already holding its lock finishes on the detached context.
  pub fn remove(&self, key: &str) -> bool {
    self.sessions.lock().remove(key).is_some()
  }

  pub fn len(&self) -> usize {
    self.sessions.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.lock().is_empty()
  }
}
