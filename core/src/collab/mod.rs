// concierge/src/collab/mod.rs

//! Contracts for the components the router depends on but does not implement:
//! content lookup, order persistence, interaction logging and similarity search.
//!
//! Implementations report failures as `anyhow::Error`; the router wraps every
//! call in [`bounded`] so a slow or broken collaborator turns into a
//! `RouterError` instead of a hang.

pub mod memory;
pub mod similarity;

use crate::error::{RouterError, RouterResult};
use crate::models::{Faq, InteractionRecord, OrderDraft, OrderId, Product};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

pub use memory::{InMemoryCatalog, InMemoryInteractionLog, InMemoryOrderStore};
pub use similarity::FlatIndex;

/// Read-only access to products and FAQs.
#[async_trait]
pub trait ContentLookup: Send + Sync {
  /// Products whose name, category or description contains `query` (case-insensitive).
  async fn find_products(&self, query: &str) -> anyhow::Result<Vec<Product>>;

  /// First product whose name contains `name` (case-insensitive).
  async fn find_product_by_name(&self, name: &str) -> anyhow::Result<Option<Product>>;

  /// FAQs whose question or answer contains `query` (case-insensitive).
  async fn find_faqs(&self, query: &str) -> anyhow::Result<Vec<Faq>>;

  /// The whole catalog, in catalog order.
  async fn list_products(&self) -> anyhow::Result<Vec<Product>>;

  async fn list_faqs(&self) -> anyhow::Result<Vec<Faq>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Persists the draft in one write and returns the new order id.
  async fn create(&self, draft: OrderDraft) -> anyhow::Result<OrderId>;
}

#[async_trait]
pub trait InteractionLog: Send + Sync {
  async fn record(&self, record: InteractionRecord) -> anyhow::Result<()>;
}

/// Embedding plus nearest-neighbour lookup over precomputed vectors.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
  async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

  /// Metadata of the `k` stored vectors closest to `vector`, nearest first.
  async fn nearest(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<serde_json::Value>>;
}

/// Awaits a collaborator call for at most `limit`.
pub async fn bounded<T, F>(collaborator: &'static str, limit: Duration, call: F) -> RouterResult<T>
where
  F: Future<Output = anyhow::Result<T>>,
{
  match tokio::time::timeout(limit, call).await {
    Ok(Ok(value)) => Ok(value),
    Ok(Err(source)) => Err(RouterError::Collaborator { collaborator, source }),
    Err(_) => Err(RouterError::Timeout {
      collaborator,
      after: limit,
    }),
  }
}
