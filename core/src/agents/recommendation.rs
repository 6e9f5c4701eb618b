// concierge/src/agents/recommendation.rs

//! Preference-driven product suggestions.
//!
//! Preferences are coarse signals pulled out of the message (a category word,
//! price bounds, a wanted feature). The catalog is filtered by them and the
//! survivors get a descending synthetic match score, which only orders the
//! list for display. It is not a relevance model.

use super::{builtin_regex, AgentReply};
use crate::collab::{bounded, ContentLookup};
use crate::error::RouterResult;
use crate::models::{format_cents, Product};
use regex::Regex;
use serde::Serialize;
use serde_json::json;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const CATEGORY_PATTERNS: &[&str] = &[
  r"\b(?:like|prefer|want|looking for) (?:a|an|some) (?P<cat>[\w\s]+) (?:product|item)",
  r"\b(?:interested in|searching for) (?P<cat>[\w\s]+)",
  r"\b(?:recommend|suggest) (?:a|an|some) (?P<cat>[\w\s]+)",
];

/// A captured category ends where price or feature phrasing begins.
const CATEGORY_STOP_WORDS: &[&str] = &[
  "under",
  "below",
  "less",
  "around",
  "about",
  "approximately",
  "between",
  "over",
  "above",
  "more",
  "with",
  "that",
  "for",
];

const PRICE_MAX: &str = r"\b(?:under|less than|below|not more than) \$(\d+)";
const PRICE_AROUND: &str = r"\b(?:around|about|approximately) \$(\d+)";
const PRICE_BETWEEN: &str = r"\bbetween \$(\d+) and \$(\d+)";
const PRICE_MIN: &str = r"\b(?:more than|over|above) \$(\d+)";

const FEATURE_PATTERNS: &[&str] = &[
  r"\b(?:with|has|having) (?P<feat>[\w\s]+)",
  r"\b(?:that is|that's|that are) (?P<feat>[\w\s]+)",
];

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Signals extracted from one message. Prices are in cents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preferences {
  pub category: Option<String>,
  pub min_price_cents: Option<i64>,
  pub max_price_cents: Option<i64>,
  pub features: Option<String>,
}

impl Preferences {
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  fn admits(&self, product: &Product) -> bool {
    let category_ok = self.category.as_deref().map_or(true, |wanted| {
      let wanted = wanted.to_lowercase();
      product.category.to_lowercase().contains(&wanted) || product.name.to_lowercase().contains(&wanted)
    });
    let min_ok = self.min_price_cents.map_or(true, |min| product.price_cents >= min);
    let max_ok = self.max_price_cents.map_or(true, |max| product.price_cents <= max);
    category_ok && min_ok && max_ok
  }

  fn feature_match(&self, product: &Product) -> bool {
    let Some(wanted) = self.features.as_deref() else {
      return false;
    };
    let wanted = wanted.to_lowercase();
    product.description.to_lowercase().contains(&wanted)
      || product
        .features
        .iter()
        .any(|(k, v)| k.to_lowercase().contains(&wanted) || v.to_lowercase().contains(&wanted))
  }
}

pub struct RecommendationResponder {
  catalog: Arc<dyn ContentLookup>,
  limit: usize,
  timeout: Duration,
  category: Vec<Regex>,
  price_max: Regex,
  price_around: Regex,
  price_between: Regex,
  price_min: Regex,
  features: Vec<Regex>,
}

impl RecommendationResponder {
  pub fn new(catalog: Arc<dyn ContentLookup>, limit: usize, timeout: Duration) -> Self {
    Self {
      catalog,
      limit,
      timeout,
      category: CATEGORY_PATTERNS.iter().map(|p| builtin_regex(p)).collect(),
      price_max: builtin_regex(PRICE_MAX),
      price_around: builtin_regex(PRICE_AROUND),
      price_between: builtin_regex(PRICE_BETWEEN),
      price_min: builtin_regex(PRICE_MIN),
      features: FEATURE_PATTERNS.iter().map(|p| builtin_regex(p)).collect(),
    }
  }

  /// Later patterns overwrite what earlier ones set, key by key.
  pub fn extract_preferences(&self, text: &str) -> Preferences {
    let mut prefs = Preferences::default();

    for pattern in &self.category {
      if let Some(cat) = pattern.captures(text).and_then(|c| c.name("cat")) {
        let cleaned = cut_at_stop_word(cat.as_str());
        if !cleaned.is_empty() {
          prefs.category = Some(cleaned);
        }
      }
    }

    if let Some(max) = dollars(&self.price_max, text, 1) {
      prefs.max_price_cents = Some(max);
    }
    if let Some(around) = dollars(&self.price_around, text, 1) {
      prefs.min_price_cents = Some(around / 100 * 80);
      prefs.max_price_cents = Some(around / 100 * 120);
    }
    if let (Some(low), Some(high)) = (
      dollars(&self.price_between, text, 1),
      dollars(&self.price_between, text, 2),
    ) {
      prefs.min_price_cents = Some(low);
      prefs.max_price_cents = Some(high);
    }
    if let Some(min) = dollars(&self.price_min, text, 1) {
      prefs.min_price_cents = Some(min);
    }

    for pattern in &self.features {
      if let Some(feat) = pattern.captures(text).and_then(|c| c.name("feat")) {
        let trimmed = feat.as_str().trim();
        if !trimmed.is_empty() {
          prefs.features = Some(trimmed.to_string());
        }
      }
    }

    prefs
  }

  #[instrument(name = "RecommendationResponder::respond", skip_all, err(Display))]
  pub async fn respond(&self, text: &str) -> RouterResult<AgentReply> {
    let prefs = self.extract_preferences(text);
    let catalog = bounded("content_lookup", self.timeout, self.catalog.list_products()).await?;

    let (mut matching, mut others): (Vec<Product>, Vec<Product>) = catalog
      .iter()
      .filter(|p| prefs.admits(p))
      .cloned()
      .partition(|p| prefs.feature_match(p));
    matching.append(&mut others);
    matching.truncate(self.limit);

    let fallback = matching.is_empty();
    if fallback {
      matching.extend(catalog.into_iter().take(1));
    }
    debug!(preferences = ?prefs, picks = matching.len(), fallback, "Recommendations ranked.");

    let ranked: Vec<serde_json::Value> = matching
      .iter()
      .enumerate()
      .map(|(i, p)| {
        json!({
          "product_id": p.id,
          "name": p.name,
          "category": p.category,
          "price_cents": p.price_cents,
          "price": p.price_display(),
          "description": p.description,
          "match_score": f64::from(match_percent(i)) / 100.0,
        })
      })
      .collect();

    Ok(AgentReply {
      response: format_recommendations(&matching, fallback),
      extra_data: json!({
        "preferences": prefs,
        "recommendations": ranked,
        "fallback": fallback,
      }),
    })
  }
}

/// 100, 90, 80 ... never below zero.
fn match_percent(rank: usize) -> u32 {
  100u32.saturating_sub((rank as u32).saturating_mul(10))
}

fn dollars(pattern: &Regex, text: &str, group: usize) -> Option<i64> {
  let raw = pattern.captures(text)?.get(group)?.as_str();
  raw.parse::<i64>().ok().and_then(|d| d.checked_mul(100))
}

fn cut_at_stop_word(captured: &str) -> String {
  captured
    .split_whitespace()
    .take_while(|w| !CATEGORY_STOP_WORDS.iter().any(|s| w.eq_ignore_ascii_case(s)))
    .collect::<Vec<_>>()
    .join(" ")
}

fn format_recommendations(products: &[Product], fallback: bool) -> String {
  if products.is_empty() {
    return "I couldn't find any products matching your preferences. Could you provide more details about what you're looking for?".to_string();
  }

  let mut out = if fallback {
    String::from("I couldn't find an exact match for your preferences, but you might like this:\n\n")
  } else {
    String::from("Based on your preferences, I recommend the following products:\n\n")
  };

  for (i, product) in products.iter().enumerate() {
    let _ = writeln!(out, "{}. **{}** ({})", i + 1, product.name, format_cents(product.price_cents));
    let _ = writeln!(out, "   {}", preview(&product.description));
    let _ = write!(out, "   Match: {}%\n\n", match_percent(i));
  }
  out.push_str("Would you like more details about any of these products?");
  out
}

fn preview(description: &str) -> String {
  if description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
    return description.to_string();
  }
  let cut: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
  format!("{}...", cut)
}
