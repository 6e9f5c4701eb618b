// concierge/src/models/product.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ProductId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub category: String,
  pub price_cents: i64,
  pub stock: u32,
  pub description: String,
  /// Free-form key specifications ("color" -> "black", ...).
  #[serde(default)]
  pub features: BTreeMap<String, String>,
}

impl Product {
  pub fn new(
    id: ProductId,
    name: impl Into<String>,
    category: impl Into<String>,
    price_cents: i64,
    stock: u32,
    description: impl Into<String>,
  ) -> Self {
    Self {
      id,
      name: name.into(),
      category: category.into(),
      price_cents: price_cents.max(0),
      stock,
      description: description.into(),
      features: BTreeMap::new(),
    }
  }

  pub fn with_feature(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.features.insert(key.into(), value.into());
    self
  }

  pub fn in_stock(&self) -> bool {
    self.stock > 0
  }

  pub fn price_display(&self) -> String {
    format_cents(self.price_cents)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
  pub id: i64,
  pub question: String,
  pub answer: String,
}

impl Faq {
  pub fn new(id: i64, question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self {
      id,
      question: question.into(),
      answer: answer.into(),
    }
  }
}

/// Renders integer cents as `$D.CC`.
pub fn format_cents(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.unsigned_abs();
  format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}
