// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset.

use async_trait::async_trait;
use concierge::models::{Faq, InteractionRecord, OrderDraft, OrderId, Product};
use concierge::{
  ContentLookup, ContextData, InMemoryCatalog, InMemoryInteractionLog, InMemoryOrderStore, InteractionLog, OrderStore,
  PipelineControl, PipelineError, Router, RouterConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// --- Pipeline engine fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub stages_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline error: {0}")]
  Pipeline(String), // Stored as Debug text so the enum stays Eq.

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(e: PipelineError) -> Self {
    TestError::Pipeline(format!("{:?}", e))
  }
}

pub fn create_simple_handler(
  stage_name: &'static str,
  message_to_append: &'static str,
) -> concierge::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    let stage_name_owned = stage_name.to_string();
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.stages_executed.push(stage_name_owned.clone());
      if guard.should_stop_at.as_deref() == Some(stage_name_owned.as_str()) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  stage_name: &'static str,
  error_message: &'static str,
) -> concierge::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    let stage_name_owned = stage_name.to_string();
    Box::pin(async move {
      ctx.write().stages_executed.push(stage_name_owned);
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing, once per test binary ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Router fixtures ---
pub struct Harness {
  pub router: Router,
  pub orders: Arc<InMemoryOrderStore>,
  pub log: Arc<InMemoryInteractionLog>,
}

pub fn test_config() -> RouterConfig {
  RouterConfig {
    collaborator_timeout: Duration::from_millis(200),
    ..RouterConfig::default()
  }
}

pub fn harness_with_catalog(catalog: Arc<dyn ContentLookup>) -> Harness {
  let orders = Arc::new(InMemoryOrderStore::new());
  let log = Arc::new(InMemoryInteractionLog::new());
  let router = Router::new(test_config(), catalog, orders.clone(), log.clone());
  Harness { router, orders, log }
}

pub fn sample_harness() -> Harness {
  harness_with_catalog(Arc::new(InMemoryCatalog::sample()))
}

/// A one-product catalog with only five units in stock.
pub fn low_stock_catalog() -> InMemoryCatalog {
  InMemoryCatalog::new(
    vec![Product::new(7, "Desk Lamp", "Home & Kitchen", 2500, 5, "LED desk lamp with dimmer.")],
    vec![Faq::new(1, "What is your return policy?", "30 days.")],
  )
}

/// Every lookup fails.
pub struct BrokenCatalog;

#[async_trait]
impl ContentLookup for BrokenCatalog {
  async fn find_products(&self, _query: &str) -> anyhow::Result<Vec<Product>> {
    anyhow::bail!("catalog database unreachable")
  }
  async fn find_product_by_name(&self, _name: &str) -> anyhow::Result<Option<Product>> {
    anyhow::bail!("catalog database unreachable")
  }
  async fn find_faqs(&self, _query: &str) -> anyhow::Result<Vec<Faq>> {
    anyhow::bail!("catalog database unreachable")
  }
  async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
    anyhow::bail!("catalog database unreachable")
  }
  async fn list_faqs(&self) -> anyhow::Result<Vec<Faq>> {
    anyhow::bail!("catalog database unreachable")
  }
}

/// Delegates to the sample catalog after sleeping; used to trip the collaborator timeout.
pub struct SlowCatalog {
  pub inner: InMemoryCatalog,
  pub delay: Duration,
}

#[async_trait]
impl ContentLookup for SlowCatalog {
  async fn find_products(&self, query: &str) -> anyhow::Result<Vec<Product>> {
    tokio::time::sleep(self.delay).await;
    self.inner.find_products(query).await
  }
  async fn find_product_by_name(&self, name: &str) -> anyhow::Result<Option<Product>> {
    tokio::time::sleep(self.delay).await;
    self.inner.find_product_by_name(name).await
  }
  async fn find_faqs(&self, query: &str) -> anyhow::Result<Vec<Faq>> {
    tokio::time::sleep(self.delay).await;
    self.inner.find_faqs(query).await
  }
  async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
    tokio::time::sleep(self.delay).await;
    self.inner.list_products().await
  }
  async fn list_faqs(&self) -> anyhow::Result<Vec<Faq>> {
    tokio::time::sleep(self.delay).await;
    self.inner.list_faqs().await
  }
}

/// Rejects every write and counts the attempts.
#[derive(Default)]
pub struct RejectingOrderStore {
  pub attempts: AtomicUsize,
}

#[async_trait]
impl OrderStore for RejectingOrderStore {
  async fn create(&self, _draft: OrderDraft) -> anyhow::Result<OrderId> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    anyhow::bail!("orders table is read-only")
  }
}

pub struct BrokenLog;

#[async_trait]
impl InteractionLog for BrokenLog {
  async fn record(&self, _record: InteractionRecord) -> anyhow::Result<()> {
    anyhow::bail!("log sink full")
  }
}

/// Records into `inner` after `delay`.
pub struct SlowLog {
  pub inner: Arc<InMemoryInteractionLog>,
  pub delay: Duration,
}

#[async_trait]
impl InteractionLog for SlowLog {
  async fn record(&self, record: InteractionRecord) -> anyhow::Result<()> {
    tokio::time::sleep(self.delay).await;
    self.inner.record(record).await
  }
}

/// Sends the messages in order within one session and collects every response.
pub async fn converse(router: &Router, session: &str, messages: &[&str]) -> Vec<concierge::RouterResponse> {
  let mut responses = Vec::with_capacity(messages.len());
  for message in messages {
    responses.push(router.handle(message, Some(42), Some(session)).await);
  }
  responses
}
