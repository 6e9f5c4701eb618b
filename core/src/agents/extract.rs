// concierge/src/agents/extract.rs

//! Best-effort parsers that pull one order field out of free text.
//!
//! Every parser returns `None` when it cannot find its field; the order
//! dialogue answers that with a re-prompt, never with an error.

use super::builtin_regex;
use crate::models::PaymentMethod;
use regex::Regex;

/// Tried in this order; the first match wins and its last capture group is the name.
const PRODUCT_NAME_PATTERNS: &[&str] = &[
  r"\bI want to (?:order|buy|get|purchase) (?:a|an|some) ([\w\s]+)",
  r"\bI(?:'d|’d| would) like to (?:order|buy|get|purchase) (?:a|an|some) ([\w\s]+)",
  r"\bcan I (?:order|buy|get|purchase) (?:(?:a|an|some|the) )?([\w\s]+)",
  r"\b(?:order|buy|get|purchase) (?:(?:a|an|some|the) )?([\w\s]+)",
];

const QUANTITY_PATTERNS: &[&str] = &[
  r"(\d+) (?:of them|items|products|pieces)",
  r"quantity (?:of|is) (\d+)",
  r"(\d+) (?:please|thanks|thank you)",
  r"^(\d+)$",
];

const SPELLED_NUMBERS: &[(&str, u32)] = &[
  ("one", 1),
  ("two", 2),
  ("three", 3),
  ("four", 4),
  ("five", 5),
  ("six", 6),
  ("seven", 7),
  ("eight", 8),
  ("nine", 9),
  ("ten", 10),
];

/// Checked in this order against the lower-cased message; first substring hit wins.
const PAYMENT_SYNONYMS: &[(&str, PaymentMethod)] = &[
  ("credit", PaymentMethod::CreditCard),
  ("credit card", PaymentMethod::CreditCard),
  ("debit", PaymentMethod::DebitCard),
  ("debit card", PaymentMethod::DebitCard),
  ("paypal", PaymentMethod::PayPal),
  ("cash", PaymentMethod::CashOnDelivery),
  ("cash on delivery", PaymentMethod::CashOnDelivery),
  ("cod", PaymentMethod::CashOnDelivery),
];

const MIN_ADDRESS_CHARS: usize = 10;

#[derive(Debug, Clone)]
pub struct FieldExtractor {
  product_name: Vec<Regex>,
  quantity: Vec<Regex>,
  spelled: Vec<(Regex, u32)>,
}

impl FieldExtractor {
  pub fn new() -> Self {
    Self {
      product_name: PRODUCT_NAME_PATTERNS.iter().map(|p| builtin_regex(p)).collect(),
      quantity: QUANTITY_PATTERNS.iter().map(|p| builtin_regex(p)).collect(),
      spelled: SPELLED_NUMBERS
        .iter()
        .map(|(word, n)| (builtin_regex(&format!(r"\b{}\b", word)), *n))
        .collect(),
    }
  }

  /// "I want to buy a Smart Watch" -> "Smart Watch".
  pub fn extract_product_name(&self, text: &str) -> Option<String> {
    self.product_name.iter().find_map(|pattern| {
      let caps = pattern.captures(text)?;
      let name = caps.get(caps.len() - 1)?.as_str().trim();
      (!name.is_empty()).then(|| name.to_string())
    })
  }

  /// Numeric phrasings first, then the words "one" to "ten".
  ///
  /// Zero is returned as-is; rejecting it is the caller's business. Numbers
  /// too large for `u32` do not count as a match.
  pub fn extract_quantity(&self, text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let numeric = self.quantity.iter().find_map(|pattern| {
      pattern
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    });
    numeric.or_else(|| {
      self
        .spelled
        .iter()
        .find(|(pattern, _)| pattern.is_match(trimmed))
        .map(|(_, n)| *n)
    })
  }

  /// Heuristic only: longer than ten characters once trimmed, and at least one
  /// digit somewhere (a house number or zip code). This is not address validation.
  pub fn extract_address(&self, text: &str) -> Option<String> {
    let trimmed = text.trim();
    let long_enough = trimmed.chars().count() > MIN_ADDRESS_CHARS;
    let has_digit = trimmed.chars().any(|c| c.is_ascii_digit());
    (long_enough && has_digit).then(|| trimmed.to_string())
  }

  pub fn extract_payment_method(&self, text: &str) -> Option<PaymentMethod> {
    let lowered = text.to_lowercase();
    PAYMENT_SYNONYMS
      .iter()
      .find(|(phrase, _)| lowered.contains(phrase))
      .map(|(_, method)| *method)
  }
}

impl Default for FieldExtractor {
  fn default() -> Self {
    Self::new()
  }
}
