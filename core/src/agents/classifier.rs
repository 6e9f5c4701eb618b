// concierge/src/agents/classifier.rs

//! Rule-based intent detection: count matching patterns per intent, highest wins.

use crate::models::{Intent, IntentLabel};
use regex::{RegexSet, RegexSetBuilder};
use tracing::debug;

const ORDER_PATTERNS: &[&str] = &[
  r"\b(order|buy|purchase|get|add to cart)\b",
  r"\bhow (can|do) I (order|buy|purchase|get)\b",
  r"\bI want to (order|buy|purchase|get)\b",
  r"\bI would like to (order|buy|purchase|get)\b",
  r"\bI'?d like to (order|buy|purchase|get)\b",
  r"\bcan I (order|buy|purchase|get)\b",
  r"\bplace (an|my) order\b",
  r"\bcheckout\b",
  r"\bshopping cart\b",
  r"\bpayment\b",
];

const DETAILS_PATTERNS: &[&str] = &[
  r"\b(what|tell me about|info|information|details|specs|specifications)\b",
  r"\bhow (does|is|are|can|do)\b",
  r"\bwhat is\b",
  r"\bdescribe\b",
  r"\bfeatures\b",
  r"\bprice\b",
  r"\bcost\b",
  r"\bavailable\b",
  r"\bin stock\b",
  r"\ballerg(y|ies|en)\b",
  r"\bingredients\b",
  r"\bnutrition\b",
  r"\bgluten\b",
  r"\bvegan\b",
  r"\bvegetarian\b",
];

const RECOMMENDATION_PATTERNS: &[&str] = &[
  r"\b(recommend|suggestion|suggest|best|popular|top)\b",
  r"\bwhat (should|would) (I|you) (recommend|suggest)\b",
  r"\bcan you (recommend|suggest)\b",
  r"\bsimilar to\b",
  r"\balternative\b",
  r"\blike\b",
  r"\bprefer\b",
];

#[derive(Debug, Clone)]
pub struct IntentClassifier {
  groups: Vec<(IntentLabel, RegexSet)>,
}

impl IntentClassifier {
  pub fn new() -> Self {
    let groups = [
      (IntentLabel::Order, ORDER_PATTERNS),
      (IntentLabel::Details, DETAILS_PATTERNS),
      (IntentLabel::Recommendation, RECOMMENDATION_PATTERNS),
    ]
    .into_iter()
    .map(|(label, patterns)| {
      let set = RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("built-in {} patterns do not compile: {}", label, e));
      (label, set)
    })
    .collect();
    Self { groups }
  }

  /// Per intent, the number of distinct patterns that match somewhere in `text`.
  pub fn scores(&self, text: &str) -> Vec<(IntentLabel, usize)> {
    self
      .groups
      .iter()
      .map(|(label, set)| (*label, set.matches(text).iter().count()))
      .collect()
  }

  /// The intent with the strictly highest score. A tie for first place, or no
  /// match at all, yields `Unknown`.
  pub fn classify(&self, text: &str) -> Intent {
    let scores = self.scores(text);
    let best = scores.iter().map(|(_, score)| *score).max().unwrap_or(0);
    let leaders: Vec<IntentLabel> = scores
      .iter()
      .filter(|(_, score)| *score == best)
      .map(|(label, _)| *label)
      .collect();

    let intent = match leaders.as_slice() {
      [label] if best > 0 => Intent {
        label: *label,
        score: best,
      },
      _ => Intent::unknown(best),
    };
    debug!(?scores, label = %intent.label, "Message classified.");
    intent
  }
}

impl Default for IntentClassifier {
  fn default() -> Self {
    Self::new()
  }
}
