// concierge/src/collab/memory.rs

//! In-process implementations of the collaborator traits. The demo binary and
//! the test-suite use them; production wires real storage behind the same traits.

use super::{ContentLookup, InteractionLog, OrderStore};
use crate::models::{Faq, InteractionRecord, Order, OrderDraft, OrderId, Product};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
  products: Vec<Product>,
  faqs: Vec<Faq>,
}

impl InMemoryCatalog {
  pub fn new(products: Vec<Product>, faqs: Vec<Faq>) -> Self {
    Self { products, faqs }
  }

  /// A small storefront: four products across three categories and three FAQs.
  pub fn sample() -> Self {
    let products = vec![
      Product::new(
        1,
        "Wireless Headphones",
        "Electronics",
        7999,
        45,
        "High-quality wireless headphones with noise cancellation and 20-hour battery life.",
      )
      .with_feature("color", "black")
      .with_feature("connectivity", "Bluetooth 5.0"),
      Product::new(
        2,
        "Cotton T-Shirt",
        "Clothing",
        1999,
        100,
        "Comfortable 100% cotton t-shirt available in multiple colors.",
      )
      .with_feature("material", "cotton")
      .with_feature("sizes", "S, M, L, XL"),
      Product::new(
        3,
        "Smart Watch",
        "Electronics",
        14999,
        30,
        "Feature-packed smartwatch with heart rate monitor, GPS, and 5-day battery life.",
      )
      .with_feature("water_resistant", "Yes")
      .with_feature("compatibility", "iOS and Android"),
      Product::new(
        4,
        "Coffee Maker",
        "Home & Kitchen",
        8999,
        25,
        "Programmable coffee maker with 12-cup capacity and built-in grinder.",
      )
      .with_feature("capacity", "12 cups")
      .with_feature("programmable", "Yes"),
    ];

    let faqs = vec![
      Faq::new(
        1,
        "What is your return policy?",
        "You can return any product within 30 days of purchase for a full refund.",
      ),
      Faq::new(
        2,
        "How long does shipping take?",
        "Standard shipping takes 3-5 business days. Express shipping is available for an additional fee.",
      ),
      Faq::new(
        3,
        "Do you ship internationally?",
        "Yes, we ship to most countries worldwide. International shipping typically takes 7-14 business days.",
      ),
    ];

    Self::new(products, faqs)
  }

  pub fn products(&self) -> &[Product] {
    &self.products
  }

  pub fn faqs(&self) -> &[Faq] {
    &self.faqs
  }
}

#[async_trait]
impl ContentLookup for InMemoryCatalog {
  async fn find_products(&self, query: &str) -> anyhow::Result<Vec<Product>> {
    let needle = query.to_lowercase();
    Ok(
      self
        .products
        .iter()
        .filter(|p| {
          p.name.to_lowercase().contains(&needle)
            || p.category.to_lowercase().contains(&needle)
            || p.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect(),
    )
  }

  async fn find_product_by_name(&self, name: &str) -> anyhow::Result<Option<Product>> {
    let needle = name.to_lowercase();
    Ok(self.products.iter().find(|p| p.name.to_lowercase().contains(&needle)).cloned())
  }

  async fn find_faqs(&self, query: &str) -> anyhow::Result<Vec<Faq>> {
    let needle = query.to_lowercase();
    Ok(
      self
        .faqs
        .iter()
        .filter(|f| f.question.to_lowercase().contains(&needle) || f.answer.to_lowercase().contains(&needle))
        .cloned()
        .collect(),
    )
  }

  async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
    Ok(self.products.clone())
  }

  async fn list_faqs(&self) -> anyhow::Result<Vec<Faq>> {
    Ok(self.faqs.clone())
  }
}

/// Keeps created orders in memory and hands out sequential ids starting at 1.
#[derive(Debug)]
pub struct InMemoryOrderStore {
  next_id: AtomicI64,
  orders: Mutex<Vec<Order>>,
}

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self {
      next_id: AtomicI64::new(1),
      orders: Mutex::new(Vec::new()),
    }
  }

  pub fn orders(&self) -> Vec<Order> {
    self.orders.lock().clone()
  }
}

impl Default for InMemoryOrderStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
  async fn create(&self, draft: OrderDraft) -> anyhow::Result<OrderId> {
    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    let order = Order::from_draft(id, draft, Utc::now());
    info!(order_id = id, user_id = order.user_id, total_cents = order.total_cents, "Order stored.");
    self.orders.lock().push(order);
    Ok(id)
  }
}

#[derive(Debug, Default)]
pub struct InMemoryInteractionLog {
  records: Mutex<Vec<InteractionRecord>>,
}

impl InMemoryInteractionLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn records(&self) -> Vec<InteractionRecord> {
    self.records.lock().clone()
  }
}

#[async_trait]
impl InteractionLog for InMemoryInteractionLog {
  async fn record(&self, record: InteractionRecord) -> anyhow::Result<()> {
    debug!(user_id = record.user_id, agent = %record.agent, intent = %record.intent, "Interaction recorded.");
    self.records.lock().push(record);
    Ok(())
  }
}
