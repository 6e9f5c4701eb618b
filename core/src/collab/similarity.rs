// concierge/src/collab/similarity.rs

//! A flat (brute-force) L2 index with a feature-hashing text embedder.
//!
//! It stands in for a real embedding model plus vector store. The embedder
//! hashes lower-cased alphanumeric tokens into a fixed number of buckets and
//! L2-normalises the result, so texts sharing vocabulary land close together.

use super::SimilaritySearch;
use crate::models::{Faq, Product};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const DEFAULT_DIMENSIONS: usize = 256;

#[derive(Debug)]
pub struct FlatIndex {
  dimensions: usize,
  entries: RwLock<Vec<(Vec<f32>, Value)>>,
}

impl FlatIndex {
  pub fn new(dimensions: usize) -> Self {
    Self {
      dimensions: dimensions.max(1),
      entries: RwLock::new(Vec::new()),
    }
  }

  /// Indexes every product (name, category, description) and FAQ (question, answer).
  pub fn from_catalog(products: &[Product], faqs: &[Faq]) -> Self {
    let index = Self::new(DEFAULT_DIMENSIONS);
    for product in products {
      let text = format!("{} {} {}", product.name, product.category, product.description);
      index.add_text(
        &text,
        json!({ "kind": "product", "id": product.id, "name": product.name }),
      );
    }
    for faq in faqs {
      let text = format!("{} {}", faq.question, faq.answer);
      index.add_text(&text, json!({ "kind": "faq", "id": faq.id, "question": faq.question }));
    }
    index
  }

  pub fn dimensions(&self) -> usize {
    self.dimensions
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.read().is_empty()
  }

  pub fn add_text(&self, text: &str, metadata: Value) {
    let vector = self.embed_text(text);
    self.entries.write().push((vector, metadata));
  }

  pub fn add_vector(&self, vector: Vec<f32>, metadata: Value) -> anyhow::Result<()> {
    if vector.len() != self.dimensions {
      anyhow::bail!(
        "vector has {} dimensions, index expects {}",
        vector.len(),
        self.dimensions
      );
    }
    self.entries.write().push((vector, metadata));
    Ok(())
  }

  pub fn embed_text(&self, text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; self.dimensions];
    let lowered = text.to_lowercase();
    for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
      vector[bucket(token, self.dimensions)] += 1.0;
    }
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
      vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
  }
}

#[async_trait]
impl SimilaritySearch for FlatIndex {
  async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
    Ok(self.embed_text(text))
  }

  async fn nearest(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<Value>> {
    if vector.len() != self.dimensions {
      anyhow::bail!(
        "query vector has {} dimensions, index expects {}",
        vector.len(),
        self.dimensions
      );
    }
    let entries = self.entries.read();
    let mut scored: Vec<(f32, &Value)> = entries
      .iter()
      .map(|(stored, metadata)| (squared_l2(stored, vector), metadata))
      .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(scored.into_iter().take(k).map(|(_, metadata)| metadata.clone()).collect())
  }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
  a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// `DefaultHasher::new()` uses fixed keys, so a token maps to the same bucket in every index.
fn bucket(token: &str, buckets: usize) -> usize {
  let mut hasher = DefaultHasher::new();
  token.hash(&mut hasher);
  (hasher.finish() % buckets as u64) as usize
}
