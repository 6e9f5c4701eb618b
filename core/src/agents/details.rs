// concierge/src/agents/details.rs

//! Product and FAQ lookup; also the catch-all for messages with no clear intent.

use super::AgentReply;
use crate::collab::{bounded, ContentLookup, SimilaritySearch};
use crate::error::RouterResult;
use crate::models::{Faq, Product};
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const GREETINGS: &[&str] = &["hi", "hello", "hey", "hii"];

const WELCOME: &str =
  "Hello! How can I help you today? You can ask about our products, shipping, or return policy.";

pub struct DetailsResponder {
  catalog: Arc<dyn ContentLookup>,
  similarity: Option<Arc<dyn SimilaritySearch>>,
  similarity_k: usize,
  timeout: Duration,
}

impl DetailsResponder {
  pub fn new(catalog: Arc<dyn ContentLookup>, timeout: Duration) -> Self {
    Self {
      catalog,
      similarity: None,
      similarity_k: 0,
      timeout,
    }
  }

  /// Attaches `similar` neighbours to every non-greeting reply.
  pub fn with_similarity(mut self, similarity: Arc<dyn SimilaritySearch>, k: usize) -> Self {
    self.similarity = Some(similarity);
    self.similarity_k = k;
    self
  }

  #[instrument(name = "DetailsResponder::respond", skip_all, err(Display))]
  pub async fn respond(&self, text: &str) -> RouterResult<AgentReply> {
    let query = text.trim();

    if is_greeting(query) {
      let products = bounded("content_lookup", self.timeout, self.catalog.list_products()).await?;
      let faqs = bounded("content_lookup", self.timeout, self.catalog.list_faqs()).await?;
      let products: Vec<Product> = products.into_iter().take(2).collect();
      let faqs: Vec<Faq> = faqs.into_iter().take(1).collect();

      let mut response = WELCOME.to_string();
      if !faqs.is_empty() {
        response.push_str("\n\n");
        push_faqs(&mut response, &faqs);
      }
      return Ok(AgentReply {
        response: response.trim_end().to_string(),
        extra_data: json!({ "products": products, "faqs": faqs, "similar": [] }),
      });
    }

    let mut products = bounded("content_lookup", self.timeout, self.catalog.find_products(query)).await?;
    if products.is_empty() {
      products = bounded("content_lookup", self.timeout, self.catalog.list_products())
        .await?
        .into_iter()
        .take(1)
        .collect();
    }

    let mut faqs = bounded("content_lookup", self.timeout, self.catalog.find_faqs(query)).await?;
    if faqs.is_empty() {
      faqs = bounded("content_lookup", self.timeout, self.catalog.list_faqs())
        .await?
        .into_iter()
        .take(1)
        .collect();
    }

    let similar = self.similar(query).await?;
    debug!(products = products.len(), faqs = faqs.len(), similar = similar.len(), "Details lookup done.");

    Ok(AgentReply {
      response: compose(query, &products, &faqs),
      extra_data: json!({ "products": products, "faqs": faqs, "similar": similar }),
    })
  }

  async fn similar(&self, query: &str) -> RouterResult<Vec<Value>> {
    let Some(similarity) = &self.similarity else {
      return Ok(Vec::new());
    };
    let vector = bounded("similarity_search", self.timeout, similarity.embed(query)).await?;
    bounded(
      "similarity_search",
      self.timeout,
      similarity.nearest(&vector, self.similarity_k),
    )
    .await
  }
}

fn is_greeting(query: &str) -> bool {
  query.is_empty() || GREETINGS.iter().any(|g| query.eq_ignore_ascii_case(g))
}

fn compose(query: &str, products: &[Product], faqs: &[Faq]) -> String {
  let mut response = String::new();

  match products {
    [] => {}
    [product] => {
      let _ = write!(response, "Here's the information about {}:\n\n", product.name);
      response.push_str(&product_card(product));
    }
    many => {
      let _ = write!(response, "I found {} products that match your query:\n\n", many.len());
      for (i, product) in many.iter().enumerate() {
        let _ = writeln!(response, "{}. **{}** - {}", i + 1, product.name, product.price_display());
      }
      response.push_str("\nPlease specify which product you'd like more information about.");
    }
  }

  if !faqs.is_empty() && products.len() <= 1 {
    if !response.is_empty() {
      response.push_str("\n\n**Related FAQs:**\n\n");
    }
    push_faqs(&mut response, faqs);
  }

  if response.is_empty() {
    return format!(
      "I couldn't find specific information about '{}'. Please try asking about our products, shipping, or return policy.",
      query
    );
  }
  response.trim_end().to_string()
}

/// Markdown card: name, category, price, availability, description, features.
pub fn product_card(product: &Product) -> String {
  let mut card = format!("**{}**\n\n", product.name);
  let _ = writeln!(card, "**Category:** {}", product.category);
  let _ = writeln!(card, "**Price:** {}", product.price_display());
  let availability = if product.in_stock() { "In Stock" } else { "Out of Stock" };
  let _ = write!(card, "**Availability:** {}\n\n", availability);
  let _ = write!(card, "**Description:**\n{}\n\n", product.description);

  if !product.features.is_empty() {
    card.push_str("**Features:**\n");
    for (key, value) in &product.features {
      let _ = writeln!(card, "- {}: {}", capitalize(key), value);
    }
  }
  card
}

fn push_faqs(out: &mut String, faqs: &[Faq]) {
  for faq in faqs {
    let _ = write!(out, "**Q: {}**\nA: {}\n\n", faq.question, faq.answer);
  }
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    None => String::new(),
  }
}
